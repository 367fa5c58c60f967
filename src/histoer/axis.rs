use crate::error::{AnalysisError, Result};

/// Binned axis with ROOT-style numbering: bin 0 is the underflow, bins
/// `1..=n` are the regular bins and bin `n + 1` is the overflow.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Axis {
    pub name: String,
    pub title: String,
    edges: Vec<f64>,
    // Inclusive user range in bin numbers; None means the full axis.
    range: Option<(usize, usize)>,
}

impl Axis {
    pub fn new(name: &str, number_of_bins: usize, range: (f64, f64)) -> Self {
        let bin_width = (range.1 - range.0) / number_of_bins.max(1) as f64;
        Self {
            name: name.to_owned(),
            title: String::new(),
            edges: (0..=number_of_bins.max(1))
                .map(|i| range.0 + i as f64 * bin_width)
                .collect(),
            range: None,
        }
    }

    pub fn with_edges(name: &str, edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AnalysisError::BinningMismatch(
                name.to_owned(),
                "strictly increasing edges".to_owned(),
            ));
        }
        Ok(Self {
            name: name.to_owned(),
            title: String::new(),
            edges,
            range: None,
        })
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.min() {
            0
        } else if x >= self.max() {
            self.n_bins() + 1
        } else {
            // number of edges <= x, which is the 1-based bin number
            self.edges.partition_point(|&edge| edge <= x)
        }
    }

    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        match bin {
            0 => f64::NEG_INFINITY,
            b if b > self.n_bins() => self.max(),
            b => self.edges[b - 1],
        }
    }

    pub fn bin_up_edge(&self, bin: usize) -> f64 {
        match bin {
            0 => self.min(),
            b if b > self.n_bins() => f64::INFINITY,
            b => self.edges[b],
        }
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        0.5 * (self.bin_low_edge(bin) + self.bin_up_edge(bin))
    }

    pub fn bin_width(&self, bin: usize) -> f64 {
        if bin == 0 || bin > self.n_bins() {
            return 0.0;
        }
        self.edges[bin] - self.edges[bin - 1]
    }

    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// First bin of the user range (1 when no range is set).
    pub fn first(&self) -> usize {
        self.range.map(|r| r.0).unwrap_or(1)
    }

    /// Last bin of the user range (n when no range is set).
    pub fn last(&self) -> usize {
        self.range.map(|r| r.1).unwrap_or(self.n_bins())
    }

    /// Restrict to bins `first..=last`; 0 and n+1 select the flows.
    pub fn set_range(&mut self, first: usize, last: usize) {
        let overflow = self.n_bins() + 1;
        self.range = Some((first.min(overflow), last.min(overflow)));
    }

    pub fn set_range_user(&mut self, min: f64, max: f64) {
        let first = self.find_bin(min);
        let last = self.find_bin(max);
        self.set_range(first, last);
    }

    pub fn reset_range(&mut self) {
        self.range = None;
    }

    pub(crate) fn restore_range(&mut self, range: Option<(usize, usize)>) {
        self.range = range;
    }

    /// Whether a bin takes part in projections under the current range.
    /// Without a range every bin counts, flows included.
    pub fn is_in_range(&self, bin: usize) -> bool {
        match self.range {
            None => true,
            Some((first, last)) => bin >= first && bin <= last,
        }
    }

    pub fn same_binning(&self, other: &Axis) -> bool {
        self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(other.edges.iter())
                .all(|(a, b)| (a - b).abs() <= 1e-9 * a.abs().max(1.0))
    }

    /// Copy of the axis without any user range.
    pub fn full(&self) -> Self {
        Self {
            range: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_bin_flows() {
        let axis = Axis::new("pt", 10, (0.0, 10.0));
        assert_eq!(axis.find_bin(-0.1), 0);
        assert_eq!(axis.find_bin(0.0), 1);
        assert_eq!(axis.find_bin(0.99), 1);
        assert_eq!(axis.find_bin(1.0), 2);
        assert_eq!(axis.find_bin(9.999), 10);
        assert_eq!(axis.find_bin(10.0), 11);
    }

    #[test]
    fn test_variable_edges() {
        let axis = Axis::with_edges("pt", vec![0.0, 1.0, 3.0, 7.0]).unwrap();
        assert_eq!(axis.n_bins(), 3);
        assert_eq!(axis.find_bin(2.0), 2);
        assert!((axis.bin_width(3) - 4.0).abs() < 1e-12);
        assert!((axis.bin_center(2) - 2.0).abs() < 1e-12);
        assert!(Axis::with_edges("pt", vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_range_selection() {
        let mut axis = Axis::new("eta", 8, (-0.8, 0.8));
        axis.set_range(2, 5);
        assert_eq!((axis.first(), axis.last()), (2, 5));
        assert!(!axis.is_in_range(6));
        axis.set_range(1, 100);
        assert_eq!(axis.range(), Some((1, 9)));
        assert!(!axis.is_in_range(0));
        axis.reset_range();
        assert!(!axis.has_range());
        assert!(axis.is_in_range(0));
        assert!(axis.is_in_range(9));
    }
}
