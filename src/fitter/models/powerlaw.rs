use crate::fitter::common::{Data, Parameter};
use crate::fitter::linear::log_regression;

#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct PowerLawParameters {
    pub amplitude: Parameter,
    pub exponent: Parameter,
}

impl Default for PowerLawParameters {
    fn default() -> Self {
        Self {
            amplitude: Parameter::new("amplitude", 1.0),
            exponent: Parameter::new("exponent", -1.0),
        }
    }
}

impl PowerLawParameters {
    /// `A * x^B`
    pub fn evaluate(x: f64, values: &[f64]) -> f64 {
        values[0] * x.powf(values[1])
    }

    pub fn integral(values: &[f64], xmin: f64, xmax: f64) -> Option<f64> {
        if xmin <= 0.0 {
            return None;
        }
        let (a, b) = (values[0], values[1]);
        if (b + 1.0).abs() < 1e-12 {
            Some(a * (xmax / xmin).ln())
        } else {
            Some(a / (b + 1.0) * (xmax.powf(b + 1.0) - xmin.powf(b + 1.0)))
        }
    }

    /// Straight line in log-log space.
    pub fn guess(&mut self, data: &Data) {
        if let Some((slope, intercept)) = log_regression(&data.x, &data.y, f64::ln) {
            self.exponent.guess(slope);
            self.amplitude.guess(intercept.exp());
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.amplitude, &self.exponent]
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.amplitude, &mut self.exponent]
    }
}
