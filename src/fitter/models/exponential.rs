use crate::fitter::common::{Data, Parameter};
use crate::fitter::linear::log_regression;

#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ExponentialParameters {
    pub amplitude: Parameter,
    pub slope: Parameter,
}

impl Default for ExponentialParameters {
    fn default() -> Self {
        Self {
            amplitude: Parameter::new("amplitude", 1.0),
            slope: Parameter::new("slope", 1.0).with_bounds(1e-6, f64::INFINITY),
        }
    }
}

impl ExponentialParameters {
    /// `A * exp(-x / T)`
    pub fn evaluate(x: f64, values: &[f64]) -> f64 {
        values[0] * (-x / values[1]).exp()
    }

    pub fn integral(values: &[f64], xmin: f64, xmax: f64) -> Option<f64> {
        let (a, t) = (values[0], values[1]);
        if t == 0.0 {
            return None;
        }
        Some(a * t * ((-xmin / t).exp() - (-xmax / t).exp()))
    }

    /// `ln y` is linear in `x` with slope `-1/T`.
    pub fn guess(&mut self, data: &Data) {
        if let Some((slope, intercept)) = log_regression(&data.x, &data.y, |x| x)
            && slope < 0.0
        {
            self.slope.guess(-1.0 / slope);
            self.amplitude.guess(intercept.exp());
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.amplitude, &self.slope]
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.amplitude, &mut self.slope]
    }
}
