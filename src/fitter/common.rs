use crate::histoer::Histogram;

/// Points entering a least-squares fit, with the uncertainty of each point.
#[derive(PartialEq, Default, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Data {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl Data {
    /// Collect the bins whose centre lies in `[min, max]`. Bins without an
    /// error carry no information for a chi-square fit and are skipped.
    pub fn from_histogram(histogram: &Histogram, min: f64, max: f64) -> Self {
        let mut data = Data::default();
        for bin in histogram.get_bins_between(min, max) {
            let sigma = histogram.bin_error(bin);
            if sigma <= 0.0 || !sigma.is_finite() {
                continue;
            }
            data.x.push(histogram.bin_center(bin));
            data.y.push(histogram.bin_content(bin));
            data.sigma.push(sigma);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Split the points at `x`, both halves keep their uncertainties.
    pub fn split_at(&self, x: f64) -> (Data, Data) {
        let mut below = Data::default();
        let mut above = Data::default();
        for i in 0..self.len() {
            let target = if self.x[i] < x { &mut below } else { &mut above };
            target.x.push(self.x[i]);
            target.y.push(self.y[i]);
            target.sigma.push(self.sigma[i]);
        }
        (below, above)
    }
}

#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Parameter {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub initial_guess: f64,
    pub vary: bool,
    pub value: Option<f64>,
    pub uncertainty: Option<f64>,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            initial_guess: 0.0,
            vary: true,
            value: None,
            uncertainty: None,
        }
    }
}

impl Parameter {
    pub fn new(name: &str, initial_guess: f64) -> Self {
        Self {
            name: name.to_owned(),
            initial_guess,
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Fix the parameter: it keeps `value` during the fit.
    pub fn fix(&mut self, value: f64) {
        self.vary = false;
        self.initial_guess = value;
        self.value = Some(value);
        self.uncertainty = Some(0.0);
    }

    pub fn release(&mut self) {
        self.vary = true;
    }

    /// Fitted value if there is one, the starting value otherwise.
    pub fn current(&self) -> f64 {
        self.value.unwrap_or(self.initial_guess)
    }

    /// Guesses from the data only replace the start value of free parameters.
    pub fn guess(&mut self, value: f64) {
        if self.vary && value.is_finite() {
            self.initial_guess = self.clamp(value);
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn clear(&mut self) {
        if self.vary {
            self.value = None;
            self.uncertainty = None;
        }
    }
}

/// Adaptive Simpson quadrature for models without a closed-form integral.
pub fn adaptive_simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, tolerance: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = (b - a) / 6.0 * (fa + 4.0 * fm + fb);
    if !whole.is_finite() {
        return f64::NAN;
    }
    simpson_step(f, (a, fa), (m, fm), (b, fb), whole, tolerance, 40)
}

fn simpson_step<F: Fn(f64) -> f64>(
    f: &F,
    (a, fa): (f64, f64),
    (m, fm): (f64, f64),
    (b, fb): (f64, f64),
    whole: f64,
    tolerance: f64,
    depth: u32,
) -> f64 {
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = (m - a) / 6.0 * (fa + 4.0 * flm + fm);
    let right = (b - m) / 6.0 * (fm + 4.0 * frm + fb);
    let delta = left + right - whole;
    if !delta.is_finite() {
        return f64::NAN;
    }
    if depth == 0 || delta.abs() <= 15.0 * tolerance {
        return left + right + delta / 15.0;
    }
    simpson_step(f, (a, fa), (lm, flm), (m, fm), left, 0.5 * tolerance, depth - 1)
        + simpson_step(f, (m, fm), (rm, frm), (b, fb), right, 0.5 * tolerance, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_skips_empty_bins() {
        let mut hist = Histogram::new("spectrum", 10, (0.0, 10.0));
        hist.set_counts(&[4.0, 0.0, 9.0, 16.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let data = Data::from_histogram(&hist, 0.0, 5.0);
        assert_eq!(data.x, vec![0.5, 2.5, 3.5]);
        assert_eq!(data.sigma, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_fixed_parameter_ignores_guess() {
        let mut p = Parameter::new("slope", 1.0).with_bounds(0.0, 10.0);
        p.guess(20.0);
        assert_eq!(p.initial_guess, 10.0);
        p.fix(3.0);
        p.guess(5.0);
        assert_eq!(p.current(), 3.0);
        p.clear();
        assert_eq!(p.value, Some(3.0));
    }

    #[test]
    fn test_simpson_integral() {
        let value = adaptive_simpson(&|x: f64| (-x).exp(), 0.0, 5.0, 1e-10);
        assert!((value - (1.0 - (-5.0f64).exp())).abs() < 1e-8);
        assert_eq!(adaptive_simpson(&|x: f64| x, 2.0, 2.0, 1e-10), 0.0);
    }
}
