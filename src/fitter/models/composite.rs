use super::exponential::ExponentialParameters;
use super::hagedorn::HagedornParameters;
use crate::fitter::common::{Data, Parameter};

/// Sum of an exponential (soft part) and a modified Hagedorn function.
#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CompositeParameters {
    pub exponential: ExponentialParameters,
    pub hagedorn: HagedornParameters,
    /// Below this x the data seeds the exponential guess, above it the Hagedorn one.
    pub split: f64,
}

impl Default for CompositeParameters {
    fn default() -> Self {
        let mut exponential = ExponentialParameters::default();
        exponential.amplitude.name = "exp_amplitude".to_owned();
        exponential.slope.name = "exp_slope".to_owned();
        Self {
            exponential,
            hagedorn: HagedornParameters::default(),
            split: 2.0,
        }
    }
}

impl CompositeParameters {
    pub fn evaluate(x: f64, values: &[f64]) -> f64 {
        ExponentialParameters::evaluate(x, &values[..2]) + HagedornParameters::evaluate(x, &values[2..])
    }

    pub fn guess(&mut self, data: &Data) {
        let (soft, hard) = data.split_at(self.split);
        self.exponential.guess(&soft);
        self.hagedorn.guess(&hard);
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        let mut params = self.exponential.parameters();
        params.extend(self.hagedorn.parameters());
        params
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = self.exponential.parameters_mut();
        params.extend(self.hagedorn.parameters_mut());
        params
    }
}
