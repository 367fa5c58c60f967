use log::debug;

use super::scaler::TriggeredSpectrumScaler;
use crate::error::Result;
use crate::histoer::Histogram;

/// Stitches the minimum-bias spectrum and the scaled triggered spectrum
/// together at a swap point.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SpectrumCombiner {
    min_bias: Histogram,
    triggered: Histogram,
}

impl SpectrumCombiner {
    pub fn new(min_bias: &Histogram, triggered: Histogram) -> Result<Self> {
        let mut scaler = TriggeredSpectrumScaler::new(min_bias, triggered)?;
        Self::from_scaler(min_bias, &mut scaler)
    }

    pub fn from_scaler(min_bias: &Histogram, scaler: &mut TriggeredSpectrumScaler) -> Result<Self> {
        let triggered = scaler.scaled_triggered_spectrum()?.clone();
        min_bias.check_binning(&triggered)?;
        Ok(Self {
            min_bias: min_bias.clone(),
            triggered,
        })
    }

    /// Bins ending at or below `swap_pt` come from the minimum-bias
    /// spectrum, all others from the scaled triggered spectrum.
    pub fn make_combined_spectrum(&self, swap_pt: f64) -> Histogram {
        let mut result = self.min_bias.clone();
        result.set_name(&format!("{}_combined", self.min_bias.name));
        result.enable_sumw2();
        for bin in 1..=result.n_bins() {
            let input = if result.bin_up_edge(bin) <= swap_pt {
                &self.min_bias
            } else {
                &self.triggered
            };
            result.set_bin_content(bin, input.bin_content(bin));
            result.set_bin_error(bin, input.bin_error(bin));
        }
        debug!("Combined spectrum {} swapping at {swap_pt}", result.name);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::spectrum_fitter::tests::power_law_spectrum;

    #[test]
    fn test_stitch_point() {
        let min_bias = power_law_spectrum("mb", 1e4, -4.0);
        let triggered = power_law_spectrum("emc", 3e5, -4.2);
        let mut scaler = TriggeredSpectrumScaler::new(&min_bias, triggered).unwrap();
        let combiner = SpectrumCombiner::from_scaler(&min_bias, &mut scaler).unwrap();
        let scaled = scaler.scaled_triggered_spectrum().unwrap();

        let combined = combiner.make_combined_spectrum(50.0);
        // bin 50 is [49, 50], bin 51 is [50, 51]
        for bin in 1..=50 {
            assert_eq!(combined.bin_content(bin), min_bias.bin_content(bin));
            assert!((combined.bin_error(bin) - min_bias.bin_error(bin)).abs() < 1e-12 * min_bias.bin_error(bin));
        }
        for bin in 51..=100 {
            assert_eq!(combined.bin_content(bin), scaled.bin_content(bin));
            assert!((combined.bin_error(bin) - scaled.bin_error(bin)).abs() < 1e-12 * scaled.bin_error(bin));
        }
    }

    #[test]
    fn test_binning_must_match() {
        let min_bias = power_law_spectrum("mb", 1e4, -4.0);
        let mut scaler =
            TriggeredSpectrumScaler::new(&min_bias, power_law_spectrum("emc", 1e5, -4.0)).unwrap();
        let other = Histogram::new("other", 10, (0.0, 100.0));
        assert!(SpectrumCombiner::from_scaler(&other, &mut scaler).is_err());
    }
}
