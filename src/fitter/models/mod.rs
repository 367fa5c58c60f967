pub mod composite;
pub mod exponential;
pub mod hagedorn;
pub mod powerlaw;

use composite::CompositeParameters;
use exponential::ExponentialParameters;
use hagedorn::HagedornParameters;
use powerlaw::PowerLawParameters;

use super::common::{Data, Parameter, adaptive_simpson};
use super::levmar::LevMarSolution;

#[derive(PartialEq, Debug, Clone, serde::Deserialize, serde::Serialize)]
pub enum FitModel {
    PowerLaw(PowerLawParameters),
    Exponential(ExponentialParameters),
    ModifiedHagedorn(HagedornParameters),
    Composite(CompositeParameters),
}

impl Default for FitModel {
    fn default() -> Self {
        FitModel::PowerLaw(PowerLawParameters::default())
    }
}

impl FitModel {
    pub fn power_law() -> Self {
        Self::default()
    }

    pub fn exponential() -> Self {
        FitModel::Exponential(ExponentialParameters::default())
    }

    pub fn modified_hagedorn() -> Self {
        FitModel::ModifiedHagedorn(HagedornParameters::default())
    }

    pub fn composite() -> Self {
        FitModel::Composite(CompositeParameters::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            FitModel::PowerLaw(_) => "power law",
            FitModel::Exponential(_) => "exponential",
            FitModel::ModifiedHagedorn(_) => "modified Hagedorn",
            FitModel::Composite(_) => "exponential + modified Hagedorn",
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        match self {
            FitModel::PowerLaw(p) => p.parameters(),
            FitModel::Exponential(p) => p.parameters(),
            FitModel::ModifiedHagedorn(p) => p.parameters(),
            FitModel::Composite(p) => p.parameters(),
        }
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        match self {
            FitModel::PowerLaw(p) => p.parameters_mut(),
            FitModel::Exponential(p) => p.parameters_mut(),
            FitModel::ModifiedHagedorn(p) => p.parameters_mut(),
            FitModel::Composite(p) => p.parameters_mut(),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters().into_iter().find(|p| p.name == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters_mut().into_iter().find(|p| p.name == name)
    }

    /// Current parameter values in model order.
    pub fn values(&self) -> Vec<f64> {
        self.parameters().iter().map(|p| p.current()).collect()
    }

    pub fn evaluate_with(&self, x: f64, values: &[f64]) -> f64 {
        match self {
            FitModel::PowerLaw(_) => PowerLawParameters::evaluate(x, values),
            FitModel::Exponential(_) => ExponentialParameters::evaluate(x, values),
            FitModel::ModifiedHagedorn(_) => HagedornParameters::evaluate(x, values),
            FitModel::Composite(_) => CompositeParameters::evaluate(x, values),
        }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.evaluate_with(x, &self.values())
    }

    pub fn guess(&mut self, data: &Data) {
        match self {
            FitModel::PowerLaw(p) => p.guess(data),
            FitModel::Exponential(p) => p.guess(data),
            FitModel::ModifiedHagedorn(p) => p.guess(data),
            FitModel::Composite(p) => p.guess(data),
        }
    }

    /// Integral over `[xmin, xmax]` at the current parameter values.
    pub fn integral(&self, xmin: f64, xmax: f64) -> f64 {
        let values = self.values();
        let closed_form = match self {
            FitModel::PowerLaw(_) => PowerLawParameters::integral(&values, xmin, xmax),
            FitModel::Exponential(_) => ExponentialParameters::integral(&values, xmin, xmax),
            _ => None,
        };
        closed_form.unwrap_or_else(|| {
            let f = |x: f64| self.evaluate_with(x, &values);
            let scale = f(xmin).abs().max(f(xmax).abs()).max(f64::MIN_POSITIVE);
            adaptive_simpson(&f, xmin, xmax, 1e-10 * scale * (xmax - xmin).abs())
        })
    }

    pub fn set_result(&mut self, solution: &LevMarSolution) {
        for ((param, value), uncertainty) in self
            .parameters_mut()
            .into_iter()
            .zip(&solution.values)
            .zip(&solution.uncertainties)
        {
            param.value = Some(*value);
            if param.vary {
                param.uncertainty = Some(*uncertainty);
            }
        }
    }

    /// Forget the results of the free parameters.
    pub fn clear(&mut self) {
        self.parameters_mut().into_iter().for_each(Parameter::clear);
    }
}
