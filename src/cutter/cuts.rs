/// Pending restriction on one named axis. A missing bound leaves that side
/// open, flows included.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cut {
    pub axis: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Cut {
    pub fn new(axis: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            axis: axis.to_owned(),
            min,
            max,
        }
    }

    pub fn between(axis: &str, min: f64, max: f64) -> Self {
        Self::new(axis, Some(min), Some(max))
    }
}

/// Cuts keyed by axis name, in the order they were first added. Adding a
/// cut for an axis that already has one replaces its bounds.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CutSet {
    cuts: Vec<Cut>,
}

impl CutSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, cut: Cut) {
        match self.cuts.iter_mut().find(|c| c.axis == cut.axis) {
            Some(existing) => {
                existing.min = cut.min;
                existing.max = cut.max;
            }
            None => self.cuts.push(cut),
        }
    }

    pub fn remove(&mut self, axis: &str) -> Option<Cut> {
        let index = self.cuts.iter().position(|c| c.axis == axis)?;
        Some(self.cuts.remove(index))
    }

    pub fn get(&self, axis: &str) -> Option<&Cut> {
        self.cuts.iter().find(|c| c.axis == axis)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn clear(&mut self) {
        self.cuts.clear();
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_bounds() {
        let mut cuts = CutSet::new();
        cuts.upsert(Cut::between("vertexz", -10.0, 10.0));
        cuts.upsert(Cut::between("eta", -0.8, 0.8));
        cuts.upsert(Cut::between("vertexz", -5.0, 5.0));
        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts.get("vertexz"), Some(&Cut::between("vertexz", -5.0, 5.0)));
        assert_eq!(cuts.iter().next().map(|c| c.axis.as_str()), Some("vertexz"));
    }

    #[test]
    fn test_remove() {
        let mut cuts = CutSet::new();
        cuts.upsert(Cut::between("pileup", 1.0, 1.0));
        assert!(cuts.remove("pileup").is_some());
        assert!(cuts.remove("pileup").is_none());
        assert!(cuts.is_empty());
    }
}
