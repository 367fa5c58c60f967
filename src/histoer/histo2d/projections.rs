use super::histogram2d::Histogram2D;
use crate::histoer::histo1d::histogram1d::Histogram;

impl Histogram2D {
    /// Project onto x, summing the y bins `y_first..=y_last` (flows are
    /// bins 0 and n+1).
    pub fn projection_x(&self, name: &str, y_first: usize, y_last: usize) -> Histogram {
        let mut projection = Histogram::from_axis(name, self.x_axis.clone());
        projection.enable_sumw2();
        for (&(x_bin, y_bin), bin) in &self.bins {
            if y_bin >= y_first && y_bin <= y_last {
                projection.bins[x_bin] += bin.content;
                if let Some(sumw2) = projection.sumw2.as_mut() {
                    sumw2[x_bin] += bin.sumw2;
                }
            }
        }
        projection.entries = projection.bins.iter().sum();
        projection
    }

    /// Project onto x over all y bins, flows included.
    pub fn projection_x_full(&self, name: &str) -> Histogram {
        self.projection_x(name, 0, self.y_axis.n_bins() + 1)
    }

    /// Project onto x restricting y to the bins containing `y_min` and `y_max`.
    pub fn projection_x_between(&self, name: &str, y_min: f64, y_max: f64) -> Histogram {
        self.projection_x(
            name,
            self.y_axis.find_bin(y_min),
            self.y_axis.find_bin(y_max),
        )
    }

    pub fn projection_y(&self, name: &str, x_first: usize, x_last: usize) -> Histogram {
        let mut projection = Histogram::from_axis(name, self.y_axis.clone());
        projection.enable_sumw2();
        for (&(x_bin, y_bin), bin) in &self.bins {
            if x_bin >= x_first && x_bin <= x_last {
                projection.bins[y_bin] += bin.content;
                if let Some(sumw2) = projection.sumw2.as_mut() {
                    sumw2[y_bin] += bin.sumw2;
                }
            }
        }
        projection.entries = projection.bins.iter().sum();
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_x_respects_y_window() {
        let mut hist = Histogram2D::new("events", (2, 20), ((0.5, 2.5), (-10.0, 10.0)));
        for vz in [-9.5, -5.5, 0.5, 5.5, 9.5] {
            hist.fill(1.0, vz);
        }
        hist.fill(2.0, 0.5);
        let all = hist.projection_x_full("all");
        assert_eq!(all.bin_content(1), 5.0);
        assert_eq!(all.bin_content(2), 1.0);
        let central = hist.projection_x_between("central", -6.0, 6.0);
        assert_eq!(central.bin_content(1), 3.0);
        let y = hist.projection_y("y", 1, 1);
        assert_eq!(y.total(), 5.0);
    }
}
