use log::debug;

use super::data_collection::{DataCollection, Datapoint, ErrorPoint};
use crate::error::Result;
use crate::fitter::SpectrumFitter;
use crate::histoer::Histogram;

/// Bins starting below this pt are left out of the curve.
pub const TURNON_MIN_PT: f64 = 15.0;

/// Triggered spectrum divided by the minimum-bias parameterisation,
/// averaged over each bin.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TriggerTurnonCurve {
    name: String,
    min_bias_fitter: SpectrumFitter,
    values: DataCollection,
}

impl TriggerTurnonCurve {
    pub fn new(name: &str, triggered: &Histogram, min_bias: &Histogram, fit_min: f64) -> Result<Self> {
        let min_bias_fitter = SpectrumFitter::min_bias_from("mbfitter", min_bias, fit_min)?;
        let mut values = DataCollection::new(&format!("turnonCurve{name}"));
        for bin in 1..=triggered.n_bins() {
            let low = triggered.bin_low_edge(bin);
            if low < TURNON_MIN_PT {
                continue;
            }
            let high = triggered.bin_up_edge(bin);
            let binned_min_bias = min_bias_fitter.calculate_bin_mean(low, high)?;
            if binned_min_bias == 0.0 || !binned_min_bias.is_finite() {
                debug!("Skipping bin [{low}, {high}] of {name}, no min-bias reference");
                continue;
            }
            let stat = triggered.bin_error(bin) / binned_min_bias;
            let mut point = Datapoint::new(
                triggered.bin_center(bin),
                triggered.bin_content(bin) / binned_min_bias,
                triggered.bin_width(bin) / 2.0,
            );
            point.add_error_source("stat", stat, stat);
            values.add_point(point);
        }
        Ok(Self {
            name: name.to_owned(),
            min_bias_fitter,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &DataCollection {
        &self.values
    }

    /// Points with their statistical errors.
    pub fn points(&self) -> Vec<ErrorPoint> {
        self.values.error_graph("stat")
    }

    pub fn min_bias_fitter(&self) -> &SpectrumFitter {
        &self.min_bias_fitter
    }
}
