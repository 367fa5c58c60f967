use crate::fitter::common::{Data, Parameter};
use crate::fitter::linear::log_regression;

/// Modified Hagedorn function, exponential at low x and a power law at high x.
#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct HagedornParameters {
    pub amplitude: Parameter,
    pub a: Parameter,
    pub b: Parameter,
    pub p0: Parameter,
    pub n: Parameter,
}

impl Default for HagedornParameters {
    fn default() -> Self {
        Self {
            amplitude: Parameter::new("amplitude", 1.0),
            a: Parameter::new("a", 0.0),
            b: Parameter::new("b", 0.0),
            p0: Parameter::new("p0", 1.0).with_bounds(1e-6, f64::INFINITY),
            n: Parameter::new("n", 5.0).with_bounds(0.0, f64::INFINITY),
        }
    }
}

impl HagedornParameters {
    /// `A / (exp(-a*x - b*x^2) + x/p0)^n`
    pub fn evaluate(x: f64, values: &[f64]) -> f64 {
        let [amplitude, a, b, p0, n] = [values[0], values[1], values[2], values[3], values[4]];
        amplitude / ((-a * x - b * x * x).exp() + x / p0).powf(n)
    }

    /// With `a = b = 0` the function is a power law in `1 + x/p0`.
    pub fn guess(&mut self, data: &Data) {
        let p0 = self.p0.current();
        if let Some((slope, intercept)) = log_regression(&data.x, &data.y, |x| (1.0 + x / p0).ln())
        {
            self.n.guess(-slope);
            self.amplitude.guess(intercept.exp());
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.amplitude, &self.a, &self.b, &self.p0, &self.n]
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![
            &mut self.amplitude,
            &mut self.a,
            &mut self.b,
            &mut self.p0,
            &mut self.n,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduces_to_power_law() {
        let values = [10.0, 0.0, 0.0, 2.0, 3.0];
        let y = HagedornParameters::evaluate(2.0, &values);
        assert!((y - 10.0 / 8.0).abs() < 1e-12);

        let x: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let data = Data {
            y: x.iter().map(|&x| 10.0 * (1.0 + x).powf(-4.0)).collect(),
            sigma: vec![1.0; x.len()],
            x,
        };
        let mut params = HagedornParameters::default();
        params.guess(&data);
        assert!((params.n.initial_guess - 4.0).abs() < 1e-9);
        assert!((params.amplitude.initial_guess - 10.0).abs() < 1e-6);
    }
}
