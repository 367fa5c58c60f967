pub mod projections;
pub mod sparse_histogram;
