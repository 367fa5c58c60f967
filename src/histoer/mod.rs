pub mod axis;
pub mod histo1d;
pub mod histo2d;
pub mod sparse;

pub use axis::Axis;
pub use histo1d::histogram1d::Histogram;
pub use histo2d::histogram2d::Histogram2D;
pub use sparse::sparse_histogram::SparseHistogram;

/// Content and sum of squared weights of a single bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WeightedBin {
    pub content: f64,
    pub sumw2: f64,
}

impl WeightedBin {
    pub fn fill(&mut self, weight: f64) {
        self.content += weight;
        self.sumw2 += weight * weight;
    }

    pub fn merge(&mut self, other: &WeightedBin) {
        self.content += other.content;
        self.sumw2 += other.sumw2;
    }

    pub fn scale(&mut self, factor: f64) {
        self.content *= factor;
        self.sumw2 *= factor * factor;
    }
}
