pub mod spectra_sum;
pub mod weighted_merger;
pub mod weights;
