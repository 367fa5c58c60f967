use crate::error::{AnalysisError, Result};
use crate::histoer::axis::Axis;

/// One dimensional histogram with weighted bins. The `bins` vector holds
/// `n + 2` entries so that index 0 is the underflow and `n + 1` the overflow.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Histogram {
    pub name: String,
    pub title: String,
    pub x_axis: Axis,
    pub y_title: String,
    pub bins: Vec<f64>,
    pub sumw2: Option<Vec<f64>>,
    pub entries: f64,
}

impl Histogram {
    // Create a new Histogram with specified min, max, and number of bins
    pub fn new(name: &str, number_of_bins: usize, range: (f64, f64)) -> Self {
        Self::from_axis(name, Axis::new("x", number_of_bins, range))
    }

    pub fn with_edges(name: &str, edges: Vec<f64>) -> Result<Self> {
        Ok(Self::from_axis(name, Axis::with_edges("x", edges)?))
    }

    pub fn from_axis(name: &str, axis: Axis) -> Self {
        let n = axis.n_bins();
        Histogram {
            name: name.to_owned(),
            title: String::new(),
            x_axis: axis.full(),
            y_title: String::new(),
            bins: vec![0.0; n + 2],
            sumw2: None,
            entries: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0.0);
        if let Some(sumw2) = self.sumw2.as_mut() {
            sumw2.iter_mut().for_each(|b| *b = 0.0);
        }
        self.entries = 0.0;
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn set_axis_titles(&mut self, x_title: &str, y_title: &str) {
        self.x_axis.title = x_title.to_owned();
        self.y_title = y_title.to_owned();
    }

    pub fn n_bins(&self) -> usize {
        self.x_axis.n_bins()
    }

    pub fn find_bin(&self, x: f64) -> usize {
        self.x_axis.find_bin(x)
    }

    pub fn bin_content(&self, bin: usize) -> f64 {
        self.bins.get(bin).copied().unwrap_or(0.0)
    }

    pub fn set_bin_content(&mut self, bin: usize, content: f64) {
        if let Some(b) = self.bins.get_mut(bin) {
            *b = content;
        }
    }

    pub fn bin_error(&self, bin: usize) -> f64 {
        match &self.sumw2 {
            Some(sumw2) => sumw2.get(bin).copied().unwrap_or(0.0).sqrt(),
            None => self.bin_content(bin).abs().sqrt(),
        }
    }

    pub fn set_bin_error(&mut self, bin: usize, error: f64) {
        self.enable_sumw2();
        if let Some(w) = self.sumw2.as_mut().and_then(|s| s.get_mut(bin)) {
            *w = error * error;
        }
    }

    /// Store squared errors explicitly. Until now the errors were the
    /// square root of the content, so that is what gets stored.
    pub fn enable_sumw2(&mut self) {
        if self.sumw2.is_none() {
            self.sumw2 = Some(self.bins.iter().map(|c| c.abs()).collect());
        }
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.x_axis.bin_center(bin)
    }

    pub fn bin_width(&self, bin: usize) -> f64 {
        self.x_axis.bin_width(bin)
    }

    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        self.x_axis.bin_low_edge(bin)
    }

    pub fn bin_up_edge(&self, bin: usize) -> f64 {
        self.x_axis.bin_up_edge(bin)
    }

    // Get the bin edges
    pub fn get_bin_edges(&self) -> Vec<f64> {
        self.x_axis.edges().to_vec()
    }

    // Get the regular bins whose centers lie between start_x and end_x (inclusive)
    pub fn get_bins_between(&self, start_x: f64, end_x: f64) -> Vec<usize> {
        (1..=self.n_bins())
            .filter(|&bin| {
                let center = self.bin_center(bin);
                center >= start_x && center <= end_x
            })
            .collect()
    }

    pub fn get_bin_centers_between(&self, start_x: f64, end_x: f64) -> Vec<f64> {
        self.get_bins_between(start_x, end_x)
            .into_iter()
            .map(|bin| self.bin_center(bin))
            .collect()
    }

    pub fn get_bin_counts_between(&self, start_x: f64, end_x: f64) -> Vec<f64> {
        self.get_bins_between(start_x, end_x)
            .into_iter()
            .map(|bin| self.bin_content(bin))
            .collect()
    }

    pub fn same_binning(&self, other: &Histogram) -> bool {
        self.x_axis.same_binning(&other.x_axis)
    }

    pub(crate) fn check_binning(&self, other: &Histogram) -> Result<()> {
        if self.same_binning(other) {
            Ok(())
        } else {
            Err(AnalysisError::BinningMismatch(
                self.name.clone(),
                other.name.clone(),
            ))
        }
    }

    /// No entries and no content in any bin.
    pub fn is_empty(&self) -> bool {
        self.entries == 0.0 && self.bins.iter().all(|&b| b == 0.0)
    }
}
