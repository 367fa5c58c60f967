use log::{debug, warn};

use super::cuts::{Cut, CutSet};
use crate::catalog::AxisCatalog;
use crate::error::{AnalysisError, Result};
use crate::histoer::{Histogram, Histogram2D, SparseHistogram};

// Bin edges are shifted inwards by this much so a cut exactly on an edge
// does not pick up the neighbouring bin.
pub(crate) const EDGE_EPSILON: f64 = 1e-7;

/// Restricts axis ranges of a histogram for the lifetime of the guard. The
/// range each axis had before its first restriction is put back on drop,
/// whatever way the projection exits.
pub struct RangeGuard<'a> {
    histogram: &'a mut SparseHistogram,
    saved: Vec<(usize, Option<(usize, usize)>)>,
}

impl<'a> RangeGuard<'a> {
    pub fn new(histogram: &'a mut SparseHistogram) -> Self {
        Self {
            histogram,
            saved: Vec::new(),
        }
    }

    pub fn restrict(&mut self, dimension: usize, first: usize, last: usize) -> Result<()> {
        let previous = self.histogram.axis(dimension)?.range();
        if !self.saved.iter().any(|(d, _)| *d == dimension) {
            self.saved.push((dimension, previous));
        }
        self.histogram.axis_mut(dimension)?.set_range(first, last);
        Ok(())
    }

    /// Convert the value bounds of a cut into bins and restrict the axis.
    pub fn apply(&mut self, dimension: usize, cut: &Cut) -> Result<()> {
        let axis = self.histogram.axis(dimension)?;
        for value in [cut.min, cut.max].into_iter().flatten() {
            let tolerance = EDGE_EPSILON * (axis.max() - axis.min()).abs().max(1.0);
            if value < axis.min() - tolerance || value > axis.max() + tolerance {
                return Err(AnalysisError::ValueOutOfAxisRange {
                    axis: cut.axis.clone(),
                    value,
                    min: axis.min(),
                    max: axis.max(),
                });
            }
        }
        let first = cut.min.map_or(0, |min| axis.find_bin(min + EDGE_EPSILON));
        let last = cut
            .max
            .map_or(axis.n_bins() + 1, |max| axis.find_bin(max - EDGE_EPSILON));
        debug!(
            "Restricting axis {} of {} to bins [{first}, {last}]",
            cut.axis, self.histogram.name
        );
        self.restrict(dimension, first, last)
    }

    pub fn histogram(&self) -> &SparseHistogram {
        &*self.histogram
    }
}

impl Drop for RangeGuard<'_> {
    fn drop(&mut self) {
        for (dimension, range) in self.saved.drain(..).rev() {
            if let Some(axis) = self.histogram.axes.get_mut(dimension) {
                axis.restore_range(range);
            }
        }
    }
}

/// A multi-dimensional spectrum together with the catalog naming its axes
/// and the cuts waiting to be applied at the next projection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpectrumHandle {
    histogram: SparseHistogram,
    catalog: AxisCatalog,
    cuts: CutSet,
}

impl SpectrumHandle {
    pub fn new(histogram: SparseHistogram, catalog: AxisCatalog) -> Result<Self> {
        if histogram.ndims() != catalog.len() {
            return Err(AnalysisError::BinningMismatch(
                histogram.name.clone(),
                format!("{catalog:?} with {} axes", catalog.len()),
            ));
        }
        Ok(Self {
            histogram,
            catalog,
            cuts: CutSet::new(),
        })
    }

    pub fn histogram(&self) -> &SparseHistogram {
        &self.histogram
    }

    pub fn histogram_mut(&mut self) -> &mut SparseHistogram {
        &mut self.histogram
    }

    pub fn catalog(&self) -> AxisCatalog {
        self.catalog
    }

    pub fn cuts(&self) -> &CutSet {
        &self.cuts
    }

    pub fn name(&self) -> &str {
        &self.histogram.name
    }

    /// Queue a cut on the named axis. Axes the catalog does not know are
    /// ignored so the same selection works across schema versions.
    pub fn apply_cut(&mut self, axis: &str, min: Option<f64>, max: Option<f64>) {
        if !self.catalog.has_axis(axis) {
            warn!(
                "Ignoring cut on axis {axis}, not part of {:?} ({})",
                self.catalog, self.histogram.name
            );
            return;
        }
        self.cuts.upsert(Cut::new(axis, min, max));
    }

    pub fn remove_cut(&mut self, axis: &str) -> Option<Cut> {
        self.cuts.remove(axis)
    }

    /// Put the named axis back to its full range; unknown names are ignored.
    pub fn reset_axis(&mut self, axis: &str) {
        if let Some(dimension) = self.catalog.find_axis(axis)
            && let Some(axis) = self.histogram.axes.get_mut(dimension)
        {
            axis.reset_range();
        }
    }

    fn resolve(&self, axis: &str) -> Result<usize> {
        self.catalog
            .find_axis(axis)
            .ok_or_else(|| AnalysisError::AxisNotFound(axis.to_owned()))
    }

    fn prepare<'a>(
        catalog: AxisCatalog,
        cuts: &CutSet,
        histogram: &'a mut SparseHistogram,
    ) -> Result<RangeGuard<'a>> {
        let mut guard = RangeGuard::new(histogram);
        for cut in cuts {
            if let Some(dimension) = catalog.find_axis(&cut.axis) {
                guard.apply(dimension, cut)?;
            }
        }
        Ok(guard)
    }

    pub fn project_1d(&mut self, name: &str, axis: &str) -> Result<Histogram> {
        let dimension = self.resolve(axis)?;
        self.project_dimension(name, dimension)
    }

    pub fn project_dimension(&mut self, name: &str, dimension: usize) -> Result<Histogram> {
        if dimension >= self.catalog.len() {
            return Err(AnalysisError::DimensionOutOfRange {
                dimension,
                ndims: self.catalog.len(),
            });
        }
        let guard = Self::prepare(self.catalog, &self.cuts, &mut self.histogram)?;
        let projection = guard.histogram().projection_1d(name, dimension)?;
        debug!("Projected {} onto dimension {dimension} as {name}", guard.histogram().name);
        Ok(projection)
    }

    pub fn project_2d(&mut self, name: &str, x_axis: &str, y_axis: &str) -> Result<Histogram2D> {
        let (x, y) = (self.resolve(x_axis)?, self.resolve(y_axis)?);
        let guard = Self::prepare(self.catalog, &self.cuts, &mut self.histogram)?;
        guard.histogram().projection_2d(name, x, y)
    }

    /// Projection keeping the named axes in the given order.
    pub fn project_nd(&mut self, name: &str, axes: &[&str]) -> Result<SparseHistogram> {
        let dimensions = axes
            .iter()
            .map(|axis| self.resolve(axis))
            .collect::<Result<Vec<_>>>()?;
        let guard = Self::prepare(self.catalog, &self.cuts, &mut self.histogram)?;
        guard.histogram().projection_nd(name, &dimensions)
    }

    /// Projection with one additional cut that only applies to this call.
    pub fn project_nd_with_extra_cut(
        &mut self,
        name: &str,
        axes: &[&str],
        extra: &Cut,
    ) -> Result<SparseHistogram> {
        let dimensions = axes
            .iter()
            .map(|axis| self.resolve(axis))
            .collect::<Result<Vec<_>>>()?;
        let extra_dimension = self.resolve(&extra.axis)?;
        let mut guard = Self::prepare(self.catalog, &self.cuts, &mut self.histogram)?;
        guard.apply(extra_dimension, extra)?;
        guard.histogram().projection_nd(name, &dimensions)
    }

    pub fn add(&mut self, other: &SpectrumHandle) -> Result<()> {
        if self.catalog != other.catalog {
            return Err(AnalysisError::MergeTypeMismatch {
                expected: format!("{:?}", self.catalog),
                found: format!("{:?}", other.catalog),
            });
        }
        self.histogram.add(&other.histogram)
    }

    pub fn scale(&mut self, factor: f64) {
        self.histogram.scale(factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histoer::Axis;

    fn track_handle() -> SpectrumHandle {
        let mut hist = SparseHistogram::new(
            "hTrackHist",
            vec![
                Axis::new("pt", 10, (0.0, 100.0)),
                Axis::new("eta", 4, (-0.8, 0.8)),
                Axis::new("phi", 4, (0.0, 6.4)),
                Axis::new("vertexz", 20, (-10.0, 10.0)),
                Axis::new("mbtrigger", 2, (-0.5, 1.5)),
            ],
        );
        for (pt, eta, vz, mb) in [
            (5.0, 0.1, 0.5, 1.0),
            (15.0, 0.1, 5.5, 0.0),
            (15.0, -0.5, -9.5, 1.0),
            (55.0, 0.5, 0.5, 1.0),
        ] {
            hist.fill(&[pt, eta, 1.0, vz, mb]).unwrap();
        }
        SpectrumHandle::new(hist, AxisCatalog::TracksNew).unwrap()
    }

    #[test]
    fn test_cut_idempotence() {
        let mut once = track_handle();
        once.apply_cut("vertexz", Some(-5.0), Some(5.0));
        let mut twice = track_handle();
        twice.apply_cut("vertexz", Some(-5.0), Some(5.0));
        twice.apply_cut("vertexz", Some(-5.0), Some(5.0));
        assert_eq!(once.cuts(), twice.cuts());
        let a = once.project_1d("pt", "pt").unwrap();
        let b = twice.project_1d("pt", "pt").unwrap();
        assert_eq!(a.bins, b.bins);
        assert_eq!(a.total(), 2.0);
    }

    #[test]
    fn test_unknown_axis_cut_is_ignored() {
        let mut handle = track_handle();
        handle.apply_cut("pileup", Some(1.0), Some(1.0));
        handle.reset_axis("trackcuts");
        assert!(handle.cuts().is_empty());
    }

    #[test]
    fn test_projection_restores_ranges() {
        let mut handle = track_handle();
        handle.histogram_mut().axes[1].set_range(2, 3);
        let before = handle.histogram().ranges();
        handle.apply_cut("vertexz", Some(-10.0), Some(10.0));
        handle.apply_cut("mbtrigger", Some(1.0), Some(1.0));
        handle.apply_cut("eta", Some(-0.4), None);
        let projection = handle.project_1d("pt", "pt").unwrap();
        assert_eq!(projection.total(), 2.0);
        assert_eq!(handle.histogram().ranges(), before);
        let again = handle.project_1d("pt", "pt").unwrap();
        assert_eq!(projection.bins, again.bins);
    }

    #[test]
    fn test_2d_projection_axis_order() {
        let mut handle = track_handle();
        handle.histogram_mut().axes[1].set_range(2, 4);
        let before = handle.histogram().ranges();
        handle.apply_cut("mbtrigger", Some(1.0), Some(1.0));
        let projection = handle.project_2d("vzpt", "vertexz", "pt").unwrap();
        assert_eq!(projection.name, "vzpt");
        assert_eq!(projection.x_axis.name, "vertexz");
        assert_eq!(projection.y_axis.name, "pt");
        assert_eq!(projection.bin_content(11, 1), 1.0);
        assert_eq!(projection.bin_content(11, 6), 1.0);
        // outside the eta range and not seen in minimum bias
        assert_eq!(projection.bin_content(1, 2), 0.0);
        assert_eq!(projection.bin_content(16, 2), 0.0);
        assert_eq!(projection.entries, 2.0);
        assert_eq!(handle.histogram().ranges(), before);

        assert!(matches!(
            handle.project_2d("x", "pt", "pt"),
            Err(AnalysisError::DuplicateProjectionAxis(_))
        ));
        assert_eq!(handle.histogram().ranges(), before);
    }

    #[test]
    fn test_failed_projection_restores_ranges() {
        let mut handle = track_handle();
        let before = handle.histogram().ranges();
        handle.apply_cut("vertexz", Some(-5.0), Some(5.0));
        handle.apply_cut("eta", Some(-3.0), Some(0.8));
        assert!(matches!(
            handle.project_1d("pt", "pt"),
            Err(AnalysisError::ValueOutOfAxisRange { .. })
        ));
        assert_eq!(handle.histogram().ranges(), before);
    }

    #[test]
    fn test_projection_axis_errors() {
        let mut handle = track_handle();
        assert!(matches!(
            handle.project_1d("x", "energy"),
            Err(AnalysisError::AxisNotFound(_))
        ));
        assert!(matches!(
            handle.project_nd("x", &["pt", "pt"]),
            Err(AnalysisError::DuplicateProjectionAxis(_))
        ));
        assert!(matches!(
            handle.project_dimension("x", 5),
            Err(AnalysisError::DimensionOutOfRange { dimension: 5, ndims: 5 })
        ));
    }

    #[test]
    fn test_extra_cut_only_for_one_projection() {
        let mut handle = track_handle();
        let reduced = handle
            .project_nd_with_extra_cut("reduced", &["pt", "vertexz"], &Cut::new("pt", Some(10.0), None))
            .unwrap();
        assert_eq!(reduced.entries, 3.0);
        assert_eq!(handle.project_1d("pt", "pt").unwrap().total(), 4.0);
    }
}
