pub mod builder;
pub mod data_container;
pub mod data_set;
pub mod event_histogram;
pub mod jet_container;
pub mod result_data;

use crate::error::Result;
use crate::histoer::Histogram;

/// Aggregates that can be summed bin by bin and rescaled, as needed to
/// combine runs and weighted Monte-Carlo sub-samples.
pub trait Mergeable {
    fn merge(&mut self, other: &Self) -> Result<()>;
    fn scale(&mut self, factor: f64);

    fn rename(&mut self, _name: &str) {}
}

impl Mergeable for Histogram {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add(other)
    }

    fn scale(&mut self, factor: f64) {
        Histogram::scale(self, factor);
    }

    fn rename(&mut self, name: &str) {
        self.set_name(name);
    }
}
