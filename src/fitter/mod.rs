pub mod common;
pub mod constrained;
pub mod levmar;
pub mod linear;
pub mod models;
pub mod spectrum_fitter;

pub use constrained::ConstrainedSpectrumFitter;
pub use models::FitModel;
pub use spectrum_fitter::SpectrumFitter;
