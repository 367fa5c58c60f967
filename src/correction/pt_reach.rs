use log::{debug, info};

use crate::config::{FitterConfig, PtReachConfig};
use crate::error::{AnalysisError, Result};
use crate::fitter::SpectrumFitter;
use crate::histoer::Histogram;

const MIN_PT: f64 = 1e-3;
const MAX_BISECTIONS: usize = 200;

/// Transverse momentum up to which a number of events still yields the
/// required number of particles per unit pt.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PtReachCalculator {
    fitter: SpectrumFitter,
    config: PtReachConfig,
}

impl PtReachCalculator {
    /// Fit `data` with the minimum-bias or the triggered preset.
    pub fn new(name: &str, data: &Histogram, is_min_bias: bool, limit: f64) -> Result<Self> {
        let config = PtReachConfig {
            limit,
            ..Default::default()
        };
        Self::with_config(name, data, is_min_bias, &FitterConfig::default(), &config)
    }

    pub fn with_config(
        name: &str,
        data: &Histogram,
        is_min_bias: bool,
        fitter_config: &FitterConfig,
        config: &PtReachConfig,
    ) -> Result<Self> {
        let fitter = if is_min_bias {
            SpectrumFitter::min_bias_with(name, data, fitter_config)?
        } else {
            SpectrumFitter::triggered_with(name, data, fitter_config)?
        };
        Ok(Self::from_fitter(fitter, config))
    }

    pub fn from_fitter(fitter: SpectrumFitter, config: &PtReachConfig) -> Self {
        Self {
            fitter,
            config: config.clone(),
        }
    }

    pub fn fitter(&self) -> &SpectrumFitter {
        &self.fitter
    }

    fn excess(&self, pt: f64, n_events: f64) -> Result<f64> {
        Ok(n_events * self.fitter.parameterised_value_at(pt)? - self.config.limit)
    }

    /// Root of `n_events * f(pt) - limit`, bracketed outward from the
    /// initial guess and refined by bisection.
    pub fn pt_reach(&self, n_events: f64) -> Result<f64> {
        let start = self.config.initial_guess;
        let at_start = self.excess(start, n_events)?;
        if at_start == 0.0 {
            return Ok(start);
        }

        let (mut low, mut high) = (start, start);
        let mut low_value = at_start;
        if at_start > 0.0 {
            // still above the limit, the reach lies at higher pt
            loop {
                high = (high * 1.5).min(self.config.max_pt);
                let value = self.excess(high, n_events)?;
                if value <= 0.0 {
                    break;
                }
                low = high;
                low_value = value;
                if high >= self.config.max_pt {
                    return Err(AnalysisError::RootNotFound { low: start, high });
                }
            }
        } else {
            loop {
                low = (low / 1.5).max(MIN_PT);
                low_value = self.excess(low, n_events)?;
                if low_value > 0.0 {
                    break;
                }
                high = low;
                if low <= MIN_PT {
                    return Err(AnalysisError::RootNotFound { low, high: start });
                }
            }
        }

        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (low + high);
            let value = self.excess(mid, n_events)?;
            if (value > 0.0) == (low_value > 0.0) {
                low = mid;
                low_value = value;
            } else {
                high = mid;
            }
            if high - low <= self.config.tolerance * mid.abs().max(1.0) {
                break;
            }
        }
        let reach = 0.5 * (low + high);
        debug!("pt reach for {n_events} events: {reach}");
        Ok(reach)
    }

    /// Number of events after which the spectrum at `pt` reaches the limit.
    pub fn events_needed(&self, pt: f64) -> Result<f64> {
        let value = self.fitter.parameterised_value_at(pt)?;
        if value <= 0.0 {
            return Err(AnalysisError::FitFailure(format!(
                "parameterisation not positive at {pt}"
            )));
        }
        let events = self.config.limit / value;
        info!("{events:.3e} events needed to reach {pt}");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::spectrum_fitter::tests::power_law_spectrum;

    #[test]
    fn test_reach_of_power_law() {
        // 1e4 * pt^-4 * 256 = 1 at pt = 40
        let calculator = PtReachCalculator::new("mb", &power_law_spectrum("mb", 1e4, -4.0), true, 1.0).unwrap();
        let reach = calculator.pt_reach(256.0).unwrap();
        assert!((reach - 40.0).abs() < 1e-3);
        assert!((calculator.events_needed(40.0).unwrap() / 256.0 - 1.0).abs() < 1e-4);

        // the root below the starting point is found as well
        let low = calculator.pt_reach(1e-2).unwrap();
        assert!((low - 10.0_f64.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_unreachable_limit() {
        let calculator =
            PtReachCalculator::new("emc", &power_law_spectrum("emc", 1e4, -4.0), false, 1.0).unwrap();
        assert!(matches!(calculator.pt_reach(1e20), Err(AnalysisError::RootNotFound { .. })));
    }
}
