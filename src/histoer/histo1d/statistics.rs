use super::histogram1d::Histogram;

impl Histogram {
    /// Sum of contents of bins `first..=last`.
    pub fn integral(&self, first: usize, last: usize) -> f64 {
        let last = last.min(self.bins.len().saturating_sub(1));
        if first > last {
            return 0.0;
        }
        self.bins[first..=last].iter().sum()
    }

    /// Sum of content times bin width over bins `first..=last`.
    pub fn integral_width(&self, first: usize, last: usize) -> f64 {
        let last = last.min(self.n_bins());
        (first.max(1)..=last)
            .map(|bin| self.bin_content(bin) * self.bin_width(bin))
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.integral(1, self.n_bins())
    }

    // Calculate the weighted mean and standard deviation between start_x and end_x.
    pub fn get_statistics(&self, start_x: f64, end_x: f64) -> (f64, f64, f64) {
        let bins = self.get_bins_between(start_x, end_x);
        let total: f64 = bins.iter().map(|&b| self.bin_content(b)).sum();
        if total == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let mean = bins
            .iter()
            .map(|&b| self.bin_content(b) * self.bin_center(b))
            .sum::<f64>()
            / total;
        let variance = bins
            .iter()
            .map(|&b| self.bin_content(b) * (self.bin_center(b) - mean).powi(2))
            .sum::<f64>()
            / total;
        (total, mean, variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_ranges() {
        let mut hist = Histogram::new("h", 4, (0.0, 8.0));
        hist.set_counts(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.total(), 10.0);
        assert_eq!(hist.integral(2, 3), 5.0);
        assert_eq!(hist.integral(3, 2), 0.0);
        assert_eq!(hist.integral_width(1, 4), 20.0);
    }

    #[test]
    fn test_statistics() {
        let mut hist = Histogram::new("h", 2, (0.0, 2.0));
        hist.set_counts(&[1.0, 1.0]);
        let (total, mean, stdev) = hist.get_statistics(0.0, 2.0);
        assert_eq!(total, 2.0);
        assert!((mean - 1.0).abs() < 1e-12);
        assert!((stdev - 0.5).abs() < 1e-12);
    }
}
