use super::histogram1d::Histogram;

impl Histogram {
    pub fn fill(&mut self, value: f64) {
        self.fill_weighted(value, 1.0);
    }

    pub fn fill_weighted(&mut self, value: f64, weight: f64) {
        let bin = self.find_bin(value);
        self.bins[bin] += weight;
        if let Some(sumw2) = self.sumw2.as_mut() {
            sumw2[bin] += weight * weight;
        } else if weight != 1.0 {
            self.enable_sumw2();
            if let Some(sumw2) = self.sumw2.as_mut() {
                // enable_sumw2 already counted |w| for this fill
                sumw2[bin] += weight * weight - weight.abs();
            }
        }
        self.entries += 1.0;
    }

    pub fn set_counts(&mut self, counts: &[f64]) {
        for (bin, &count) in counts.iter().enumerate() {
            self.set_bin_content(bin + 1, count);
        }
        self.entries += counts.iter().sum::<f64>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_flows() {
        let mut hist = Histogram::new("h", 5, (0.0, 5.0));
        hist.fill(-1.0);
        hist.fill(2.5);
        hist.fill(7.0);
        assert_eq!(hist.bin_content(0), 1.0);
        assert_eq!(hist.bin_content(3), 1.0);
        assert_eq!(hist.bin_content(6), 1.0);
        assert_eq!(hist.entries, 3.0);
    }

    #[test]
    fn test_weighted_fill_tracks_sumw2() {
        let mut hist = Histogram::new("h", 5, (0.0, 5.0));
        hist.fill(1.5);
        hist.fill_weighted(1.5, 2.0);
        assert!((hist.bin_content(2) - 3.0).abs() < 1e-12);
        assert!((hist.bin_error(2) - 5.0_f64.sqrt()).abs() < 1e-12);
    }
}
