use log::info;

use crate::config::FitterConfig;
use crate::error::{AnalysisError, Result};
use crate::fitter::SpectrumFitter;
use crate::histoer::Histogram;

/// Points in the overlap of both fit ranges where the fits are compared.
pub const PROBE_POINTS: [f64; 6] = [60.0, 65.0, 70.0, 75.0, 80.0, 85.0];

/// Scales a triggered spectrum down to the minimum-bias level using the
/// ratio of the two fitted parameterisations.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TriggeredSpectrumScaler {
    min_bias_fitter: SpectrumFitter,
    triggered_fitter: SpectrumFitter,
    triggered: Histogram,
    scale_factor: Option<f64>,
}

impl TriggeredSpectrumScaler {
    pub fn new(min_bias: &Histogram, triggered: Histogram) -> Result<Self> {
        Self::with_config(min_bias, triggered, &FitterConfig::default())
    }

    pub fn with_config(min_bias: &Histogram, triggered: Histogram, config: &FitterConfig) -> Result<Self> {
        Ok(Self {
            min_bias_fitter: SpectrumFitter::min_bias_with("minbiasfitter", min_bias, config)?,
            triggered_fitter: SpectrumFitter::triggered_with("triggeredfitter", &triggered, config)?,
            triggered,
            scale_factor: None,
        })
    }

    /// Scale the triggered spectrum by the mean min-bias over triggered ratio
    /// at the probe points. Only the first call touches the spectrum.
    pub fn scale_down_triggered_spectrum(&mut self) -> Result<f64> {
        if let Some(factor) = self.scale_factor {
            return Ok(factor);
        }
        let mut sum = 0.0;
        for point in PROBE_POINTS {
            let triggered = self.triggered_fitter.parameterised_value_at(point)?;
            if triggered == 0.0 {
                return Err(AnalysisError::FitFailure(format!(
                    "triggered parameterisation vanishes at {point}"
                )));
            }
            sum += self.min_bias_fitter.parameterised_value_at(point)? / triggered;
        }
        let factor = sum / PROBE_POINTS.len() as f64;
        info!("Using scaling factor {factor:.4e}");
        self.triggered.scale(factor);
        self.scale_factor = Some(factor);
        Ok(factor)
    }

    pub fn scaled_triggered_spectrum(&mut self) -> Result<&Histogram> {
        self.scale_down_triggered_spectrum()?;
        Ok(&self.triggered)
    }

    pub fn scale_factor(&self) -> Option<f64> {
        self.scale_factor
    }

    pub fn min_bias_fitter(&self) -> &SpectrumFitter {
        &self.min_bias_fitter
    }

    pub fn triggered_fitter(&self) -> &SpectrumFitter {
        &self.triggered_fitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::spectrum_fitter::tests::power_law_spectrum;

    #[test]
    fn test_scale_applied_once() {
        let min_bias = power_law_spectrum("mb", 1e4, -4.0);
        let triggered = power_law_spectrum("emc", 5e5, -4.0);
        let mut scaler = TriggeredSpectrumScaler::new(&min_bias, triggered.clone()).unwrap();
        assert_eq!(scaler.scale_factor(), None);

        let factor = scaler.scale_down_triggered_spectrum().unwrap();
        assert!((factor - 0.02).abs() < 1e-6);
        let once = scaler.scaled_triggered_spectrum().unwrap().clone();
        assert!((once.bin_content(70) / triggered.bin_content(70) - factor).abs() < 1e-12);

        assert_eq!(scaler.scale_down_triggered_spectrum().unwrap(), factor);
        assert_eq!(scaler.scaled_triggered_spectrum().unwrap(), &once);
    }
}
