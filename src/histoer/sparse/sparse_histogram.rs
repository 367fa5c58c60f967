use fnv::FnvHashMap;

use crate::error::{AnalysisError, Result};
use crate::histoer::WeightedBin;
use crate::histoer::axis::Axis;

/// N-dimensional histogram storing only filled bins. Keys are the ROOT
/// bin numbers on every axis, so flows are kept as well.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SparseHistogram {
    pub name: String,
    pub title: String,
    pub axes: Vec<Axis>,
    pub bins: FnvHashMap<Vec<usize>, WeightedBin>,
    pub entries: f64,
}

impl SparseHistogram {
    pub fn new(name: &str, axes: Vec<Axis>) -> Self {
        Self {
            name: name.to_owned(),
            title: String::new(),
            axes,
            bins: FnvHashMap::default(),
            entries: 0.0,
        }
    }

    pub fn ndims(&self) -> usize {
        self.axes.len()
    }

    pub fn axis(&self, dimension: usize) -> Result<&Axis> {
        self.axes
            .get(dimension)
            .ok_or(AnalysisError::DimensionOutOfRange {
                dimension,
                ndims: self.axes.len(),
            })
    }

    pub fn axis_mut(&mut self, dimension: usize) -> Result<&mut Axis> {
        let ndims = self.axes.len();
        self.axes
            .get_mut(dimension)
            .ok_or(AnalysisError::DimensionOutOfRange { dimension, ndims })
    }

    pub fn fill(&mut self, values: &[f64]) -> Result<()> {
        self.fill_weighted(values, 1.0)
    }

    pub fn fill_weighted(&mut self, values: &[f64], weight: f64) -> Result<()> {
        if values.len() != self.axes.len() {
            return Err(AnalysisError::DimensionOutOfRange {
                dimension: values.len(),
                ndims: self.axes.len(),
            });
        }
        let key: Vec<usize> = self
            .axes
            .iter()
            .zip(values)
            .map(|(axis, &v)| axis.find_bin(v))
            .collect();
        self.bins.entry(key).or_default().fill(weight);
        self.entries += 1.0;
        Ok(())
    }

    pub fn bin(&self, coordinates: &[usize]) -> WeightedBin {
        self.bins.get(coordinates).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0.0 && self.bins.values().all(|b| b.content == 0.0)
    }

    pub fn same_binning(&self, other: &SparseHistogram) -> bool {
        self.axes.len() == other.axes.len()
            && self
                .axes
                .iter()
                .zip(other.axes.iter())
                .all(|(a, b)| a.same_binning(b))
    }

    pub fn add(&mut self, other: &SparseHistogram) -> Result<()> {
        if !self.same_binning(other) {
            return Err(AnalysisError::BinningMismatch(
                self.name.clone(),
                other.name.clone(),
            ));
        }
        for (key, bin) in &other.bins {
            self.bins.entry(key.clone()).or_default().merge(bin);
        }
        self.entries += other.entries;
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        self.bins.values_mut().for_each(|b| b.scale(factor));
    }

    /// Ranges currently set on the axes, in axis order.
    pub fn ranges(&self) -> Vec<Option<(usize, usize)>> {
        self.axes.iter().map(Axis::range).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_axes() -> Vec<Axis> {
        vec![
            Axis::new("pt", 10, (0.0, 100.0)),
            Axis::new("eta", 4, (-0.8, 0.8)),
        ]
    }

    #[test]
    fn test_fill_dimension_check() {
        let mut hist = SparseHistogram::new("tracks", track_axes());
        assert!(hist.fill(&[1.0]).is_err());
        hist.fill(&[15.0, 0.1]).unwrap();
        hist.fill_weighted(&[15.0, 0.1], 3.0).unwrap();
        let bin = hist.bin(&[2, 3]);
        assert_eq!(bin.content, 4.0);
        assert_eq!(bin.sumw2, 10.0);
    }

    #[test]
    fn test_scale_and_add() {
        let mut a = SparseHistogram::new("a", track_axes());
        a.fill(&[55.0, -0.5]).unwrap();
        let mut b = a.clone();
        b.scale(2.0);
        a.add(&b).unwrap();
        let bin = a.bin(&[6, 1]);
        assert_eq!(bin.content, 3.0);
        assert_eq!(bin.sumw2, 5.0);

        let other = SparseHistogram::new("c", vec![Axis::new("pt", 5, (0.0, 100.0))]);
        assert!(a.add(&other).is_err());
    }
}
