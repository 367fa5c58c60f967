use log::info;

use super::models::FitModel;
use super::spectrum_fitter::SpectrumFitter;
use crate::error::{AnalysisError, Result};
use crate::histoer::Histogram;

/// Two stage fit: a constrain model is fitted over its own range first and
/// the mapped parameters of the primary model are fixed to its results.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ConstrainedSpectrumFitter {
    primary: SpectrumFitter,
    constrain: SpectrumFitter,
    constrain_range: (f64, f64),
    /// (constrain parameter, primary parameter)
    mapping: Vec<(String, String)>,
}

impl ConstrainedSpectrumFitter {
    pub fn new(
        name: &str,
        spectrum: &Histogram,
        primary: FitModel,
        constrain: FitModel,
        constrain_range: (f64, f64),
    ) -> Self {
        Self {
            primary: SpectrumFitter::with_model(name, spectrum, primary),
            constrain: SpectrumFitter::with_model(&format!("{name}_constrain"), spectrum, constrain),
            constrain_range,
            mapping: Vec::new(),
        }
    }

    /// Fix `primary_param` to the fitted value of `constrain_param`.
    pub fn map_parameter(&mut self, constrain_param: &str, primary_param: &str) -> Result<()> {
        if self.constrain.model().parameter(constrain_param).is_none() {
            return Err(AnalysisError::FitFailure(format!(
                "no parameter {constrain_param} in {} model",
                self.constrain.model().name()
            )));
        }
        if self.primary.model().parameter(primary_param).is_none() {
            return Err(AnalysisError::FitFailure(format!(
                "no parameter {primary_param} in {} model",
                self.primary.model().name()
            )));
        }
        self.mapping.push((constrain_param.to_owned(), primary_param.to_owned()));
        Ok(())
    }

    pub fn fit(&mut self, min: f64, max: f64) -> Result<()> {
        let (cmin, cmax) = self.constrain_range;
        self.constrain.fit(cmin, cmax)?;

        let constrain_model = self.constrain.parameterisation()?;
        let fixed: Vec<(String, f64)> = self
            .mapping
            .iter()
            .filter_map(|(from, to)| {
                constrain_model
                    .parameter(from)
                    .map(|p| (to.clone(), p.current()))
            })
            .collect();

        let primary = self.primary.model_mut();
        for (name, value) in &fixed {
            if let Some(param) = primary.parameter_mut(name) {
                info!("Fixing {name} to {value:.4e} from the constrain fit");
                param.fix(*value);
            }
        }
        self.primary.fit(min, max)
    }

    pub fn primary(&self) -> &SpectrumFitter {
        &self.primary
    }

    pub fn constrain(&self) -> &SpectrumFitter {
        &self.constrain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::spectrum_fitter::tests::{composite_spectrum, power_law_spectrum};

    fn without_quadratic_terms(mut model: FitModel) -> FitModel {
        for name in ["a", "b"] {
            if let Some(param) = model.parameter_mut(name) {
                param.fix(0.0);
            }
        }
        model
    }

    #[test]
    fn test_constrained_parameters_are_fixed() {
        let spectrum = power_law_spectrum("mb", 2e4, -5.0);
        let mut fitter = ConstrainedSpectrumFitter::new(
            "mb",
            &spectrum,
            FitModel::power_law(),
            FitModel::power_law(),
            (50.0, 90.0),
        );
        fitter.map_parameter("exponent", "exponent").unwrap();
        assert!(fitter.map_parameter("slope", "exponent").is_err());

        assert!(matches!(
            fitter.primary().parameterisation(),
            Err(AnalysisError::FitNotPerformed)
        ));
        fitter.fit(15.0, 50.0).unwrap();

        let constrain_exponent = fitter
            .constrain()
            .parameterisation()
            .unwrap()
            .parameter("exponent")
            .unwrap()
            .current();
        let primary = fitter.primary().parameterisation().unwrap();
        let exponent = primary.parameter("exponent").unwrap();
        assert!(!exponent.vary);
        assert_eq!(exponent.current(), constrain_exponent);
        assert!((primary.parameter("amplitude").unwrap().current() / 2e4 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_hagedorn_tail_fixes_composite() {
        let spectrum = composite_spectrum("full", true);
        let mut fitter = ConstrainedSpectrumFitter::new(
            "full",
            &spectrum,
            without_quadratic_terms(FitModel::composite()),
            without_quadratic_terms(FitModel::modified_hagedorn()),
            (8.0, 80.0),
        );
        fitter.map_parameter("n", "n").unwrap();
        fitter.map_parameter("p0", "p0").unwrap();
        fitter.fit(0.0, 20.0).unwrap();

        let tail = fitter.constrain().parameterisation().unwrap();
        let tail_n = tail.parameter("n").unwrap().current();
        assert!((tail_n - 6.0).abs() < 5e-2);

        let primary = fitter.primary().parameterisation().unwrap();
        for name in ["n", "p0"] {
            let param = primary.parameter(name).unwrap();
            assert!(!param.vary);
            assert_eq!(param.current(), tail.parameter(name).unwrap().current());
        }
        assert!(primary.parameter("exp_slope").unwrap().vary);
        assert!(fitter.primary().is_fit());
    }
}
