use super::histogram1d::Histogram;
use crate::error::Result;

impl Histogram {
    /// Bin-by-bin sum, errors added in quadrature.
    pub fn add(&mut self, other: &Histogram) -> Result<()> {
        self.check_binning(other)?;
        if self.sumw2.is_some() || other.sumw2.is_some() {
            self.enable_sumw2();
        }
        for bin in 0..self.bins.len() {
            self.bins[bin] += other.bins[bin];
            if let Some(sumw2) = self.sumw2.as_mut() {
                sumw2[bin] += other.bin_error(bin).powi(2);
            }
        }
        self.entries += other.entries;
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        if factor != 1.0 {
            self.enable_sumw2();
        }
        self.bins.iter_mut().for_each(|b| *b *= factor);
        if let Some(sumw2) = self.sumw2.as_mut() {
            sumw2.iter_mut().for_each(|w| *w *= factor * factor);
        }
    }

    /// Divide every regular bin by its width.
    pub fn normalise_bin_width(&mut self) {
        self.enable_sumw2();
        for bin in 1..=self.n_bins() {
            let width = self.bin_width(bin);
            self.bins[bin] /= width;
            if let Some(sumw2) = self.sumw2.as_mut() {
                sumw2[bin] /= width * width;
            }
        }
    }

    /// Ratio where the numerator is a subset of the denominator, with
    /// binomial errors. Bins with an empty denominator are left at zero.
    pub fn divide_binomial(&self, denominator: &Histogram, name: &str) -> Result<Histogram> {
        self.check_binning(denominator)?;
        let mut result = Histogram::from_axis(name, self.x_axis.clone());
        result.enable_sumw2();
        for bin in 0..self.bins.len() {
            let (b1, b2) = (self.bins[bin], denominator.bins[bin]);
            if b2 == 0.0 {
                continue;
            }
            let ratio = b1 / b2;
            let e1sq = self.bin_error(bin).powi(2);
            let e2sq = denominator.bin_error(bin).powi(2);
            result.bins[bin] = ratio;
            if let Some(sumw2) = result.sumw2.as_mut() {
                sumw2[bin] = (((1.0 - 2.0 * ratio) * e1sq + ratio * ratio * e2sq) / (b2 * b2)).abs();
            }
        }
        result.entries = self.entries;
        Ok(result)
    }
}
