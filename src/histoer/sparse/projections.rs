use fnv::FnvHashMap;

use super::sparse_histogram::SparseHistogram;
use crate::error::{AnalysisError, Result};
use crate::histoer::WeightedBin;
use crate::histoer::histo1d::histogram1d::Histogram;
use crate::histoer::histo2d::histogram2d::Histogram2D;

impl SparseHistogram {
    fn check_dimensions(&self, dimensions: &[usize]) -> Result<()> {
        for (i, &dimension) in dimensions.iter().enumerate() {
            let axis = self.axis(dimension)?;
            if dimensions[..i].contains(&dimension) {
                return Err(AnalysisError::DuplicateProjectionAxis(axis.name.clone()));
            }
        }
        Ok(())
    }

    // Marginalise onto the given dimensions, keeping only bins inside the
    // current range of every axis.
    fn marginalise(&self, dimensions: &[usize]) -> FnvHashMap<Vec<usize>, WeightedBin> {
        let mut projected: FnvHashMap<Vec<usize>, WeightedBin> = FnvHashMap::default();
        for (key, bin) in &self.bins {
            let selected = key
                .iter()
                .zip(self.axes.iter())
                .all(|(&b, axis)| axis.is_in_range(b));
            if !selected {
                continue;
            }
            let target: Vec<usize> = dimensions.iter().map(|&d| key[d]).collect();
            projected.entry(target).or_default().merge(bin);
        }
        projected
    }

    pub fn projection_1d(&self, name: &str, dimension: usize) -> Result<Histogram> {
        self.check_dimensions(&[dimension])?;
        let mut projection = Histogram::from_axis(name, self.axes[dimension].full());
        projection.enable_sumw2();
        for (key, bin) in self.marginalise(&[dimension]) {
            projection.bins[key[0]] += bin.content;
            if let Some(sumw2) = projection.sumw2.as_mut() {
                sumw2[key[0]] += bin.sumw2;
            }
        }
        projection.entries = projection.bins.iter().sum();
        Ok(projection)
    }

    pub fn projection_2d(&self, name: &str, x_dimension: usize, y_dimension: usize) -> Result<Histogram2D> {
        self.check_dimensions(&[x_dimension, y_dimension])?;
        let mut projection = Histogram2D::from_axes(
            name,
            self.axes[x_dimension].full(),
            self.axes[y_dimension].full(),
        );
        for (key, bin) in self.marginalise(&[x_dimension, y_dimension]) {
            projection.entries += bin.content;
            projection.bins.insert((key[0], key[1]), bin);
        }
        Ok(projection)
    }

    /// Projection keeping the dimensions in the order given.
    pub fn projection_nd(&self, name: &str, dimensions: &[usize]) -> Result<SparseHistogram> {
        self.check_dimensions(dimensions)?;
        let axes = dimensions.iter().map(|&d| self.axes[d].full()).collect();
        let mut projection = SparseHistogram::new(name, axes);
        projection.title = self.title.clone();
        projection.bins = self.marginalise(dimensions);
        projection.entries = projection.bins.values().map(|b| b.content).sum();
        Ok(projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histoer::axis::Axis;

    fn filled() -> SparseHistogram {
        let mut hist = SparseHistogram::new(
            "tracks",
            vec![
                Axis::new("pt", 10, (0.0, 100.0)),
                Axis::new("eta", 4, (-0.8, 0.8)),
                Axis::new("vertexz", 20, (-10.0, 10.0)),
            ],
        );
        for (pt, eta, vz) in [
            (5.0, 0.1, 0.0),
            (5.0, -0.7, 0.0),
            (25.0, 0.1, 9.5),
            (25.0, 0.1, -20.0),
            (65.0, 0.5, 3.0),
        ] {
            hist.fill(&[pt, eta, vz]).unwrap();
        }
        hist
    }

    #[test]
    fn test_projection_respects_ranges() {
        let mut hist = filled();
        let all = hist.projection_1d("pt", 0).unwrap();
        assert_eq!(all.total(), 5.0);
        hist.axes[2].set_range_user(-9.99, 9.99);
        let restricted = hist.projection_1d("pt", 0).unwrap();
        assert_eq!(restricted.bin_content(3), 1.0);
        assert_eq!(restricted.total(), 4.0);
        assert!(restricted.x_axis.range().is_none());
    }

    #[test]
    fn test_projection_order_and_duplicates() {
        let hist = filled();
        let swapped = hist.projection_2d("eta_pt", 1, 0).unwrap();
        assert_eq!(swapped.x_axis.name, "eta");
        assert_eq!(swapped.bin_content(3, 1), 1.0);
        assert!(matches!(
            hist.projection_2d("bad", 0, 0),
            Err(AnalysisError::DuplicateProjectionAxis(_))
        ));
        assert!(hist.projection_1d("bad", 3).is_err());
        let reduced = hist.projection_nd("reduced", &[2, 0]).unwrap();
        assert_eq!(reduced.ndims(), 2);
        assert_eq!(reduced.axes[0].name, "vertexz");
        assert_eq!(reduced.entries, 5.0);
    }
}
