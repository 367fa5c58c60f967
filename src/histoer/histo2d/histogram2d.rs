use fnv::FnvHashMap;

use crate::error::{AnalysisError, Result};
use crate::histoer::WeightedBin;
use crate::histoer::axis::Axis;

/// Two dimensional histogram with sparse bin storage keyed by
/// `(x_bin, y_bin)` in ROOT numbering (flows included).
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Histogram2D {
    pub name: String,
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub bins: FnvHashMap<(usize, usize), WeightedBin>,
    pub entries: f64,
}

impl Histogram2D {
    // Create a new 2D Histogram with specified ranges and number of bins for each axis
    pub fn new(name: &str, bins: (usize, usize), range: ((f64, f64), (f64, f64))) -> Self {
        Self::from_axes(
            name,
            Axis::new("x", bins.0, range.0),
            Axis::new("y", bins.1, range.1),
        )
    }

    pub fn from_axes(name: &str, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            name: name.to_owned(),
            title: String::new(),
            x_axis,
            y_axis,
            bins: FnvHashMap::default(),
            entries: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.bins.clear();
        self.entries = 0.0;
    }

    pub fn fill(&mut self, x_value: f64, y_value: f64) {
        self.fill_weighted(x_value, y_value, 1.0);
    }

    pub fn fill_weighted(&mut self, x_value: f64, y_value: f64, weight: f64) {
        let key = (self.x_axis.find_bin(x_value), self.y_axis.find_bin(y_value));
        self.bins.entry(key).or_default().fill(weight);
        self.entries += 1.0;
    }

    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.bins.get(&(x_bin, y_bin)).map_or(0.0, |b| b.content)
    }

    pub fn bin_error(&self, x_bin: usize, y_bin: usize) -> f64 {
        self.bins.get(&(x_bin, y_bin)).map_or(0.0, |b| b.sumw2.sqrt())
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0.0 && self.bins.values().all(|b| b.content == 0.0)
    }

    pub fn add(&mut self, other: &Histogram2D) -> Result<()> {
        if !self.x_axis.same_binning(&other.x_axis) || !self.y_axis.same_binning(&other.y_axis) {
            return Err(AnalysisError::BinningMismatch(
                self.name.clone(),
                other.name.clone(),
            ));
        }
        for (key, bin) in &other.bins {
            self.bins.entry(*key).or_default().merge(bin);
        }
        self.entries += other.entries;
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        self.bins.values_mut().for_each(|b| b.scale(factor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_add() {
        let mut a = Histogram2D::new("a", (2, 4), ((0.5, 2.5), (-10.0, 10.0)));
        a.fill(1.0, 0.0);
        a.fill(2.0, 0.0);
        let mut b = a.clone();
        b.fill(2.0, -20.0);
        a.add(&b).unwrap();
        assert_eq!(a.bin_content(1, 3), 2.0);
        assert_eq!(a.bin_content(2, 0), 1.0);
        assert_eq!(a.entries, 5.0);
    }
}
