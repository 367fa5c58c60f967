#![warn(clippy::all, rust_2018_idioms)]
//! Spectrum analysis per trigger class on top of sparse multi-dimensional
//! histograms: named-axis cuts and projections, event normalised spectra,
//! merging of runs and weighted pt-hard bins, and parametric spectrum fits
//! used for trigger efficiencies and turn-on curves.

pub mod catalog;
pub mod config;
pub mod containers;
pub mod correction;
pub mod cutter;
pub mod error;
pub mod fitter;
pub mod histoer;
pub mod merger;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
