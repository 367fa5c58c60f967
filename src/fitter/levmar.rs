use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use super::common::{Data, Parameter};
use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LevMarSettings {
    pub max_iterations: usize,
    /// Relative change of chi-square below which the fit counts as converged.
    pub tolerance: f64,
    pub initial_lambda: f64,
}

impl Default for LevMarSettings {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
            initial_lambda: 1e-3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LevMarSolution {
    /// All parameter values, fixed ones included, in model order.
    pub values: Vec<f64>,
    /// Zero for fixed parameters.
    pub uncertainties: Vec<f64>,
    pub chi2: f64,
    pub ndf: usize,
    pub iterations: usize,
    pub converged: bool,
}

struct Problem<'a, F> {
    model: F,
    data: &'a Data,
    free: Vec<usize>,
    bounds: Vec<(f64, f64)>,
}

impl<F: Fn(f64, &[f64]) -> f64> Problem<'_, F> {
    fn residuals(&self, values: &[f64]) -> DVector<f64> {
        DVector::from_iterator(
            self.data.len(),
            (0..self.data.len()).map(|i| {
                (self.data.y[i] - (self.model)(self.data.x[i], values)) / self.data.sigma[i]
            }),
        )
    }

    fn chi2(&self, values: &[f64]) -> f64 {
        self.residuals(values).norm_squared()
    }

    // Central differences of the scaled model with respect to the free parameters.
    fn jacobian(&self, values: &[f64]) -> DMatrix<f64> {
        let mut jacobian = DMatrix::zeros(self.data.len(), self.free.len());
        let mut shifted = values.to_vec();
        for (column, &index) in self.free.iter().enumerate() {
            let h = 1e-6 * values[index].abs().max(1e-6);
            shifted[index] = values[index] + h;
            let up: Vec<f64> = self.data.x.iter().map(|&x| (self.model)(x, &shifted)).collect();
            shifted[index] = values[index] - h;
            let down: Vec<f64> = self.data.x.iter().map(|&x| (self.model)(x, &shifted)).collect();
            shifted[index] = values[index];
            for row in 0..self.data.len() {
                jacobian[(row, column)] = (up[row] - down[row]) / (2.0 * h * self.data.sigma[row]);
            }
        }
        jacobian
    }

    fn step(&self, values: &[f64], delta: &DVector<f64>) -> Vec<f64> {
        let mut next = values.to_vec();
        for (column, &index) in self.free.iter().enumerate() {
            let (min, max) = self.bounds[index];
            next[index] = (values[index] + delta[column]).max(min).min(max);
        }
        next
    }
}

/// Weighted least-squares minimisation of `sum ((y - model(x)) / sigma)^2`
/// with the Levenberg-Marquardt algorithm. Parameters with `vary == false`
/// stay at their current value.
pub fn minimise<F>(
    model: F,
    data: &Data,
    parameters: &[Parameter],
    settings: &LevMarSettings,
) -> Result<LevMarSolution>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let free: Vec<usize> = parameters
        .iter()
        .enumerate()
        .filter(|(_, p)| p.vary)
        .map(|(i, _)| i)
        .collect();
    if data.len() <= free.len() {
        return Err(AnalysisError::FitFailure(format!(
            "{} points for {} free parameters",
            data.len(),
            free.len()
        )));
    }

    let problem = Problem {
        model,
        data,
        bounds: parameters.iter().map(|p| (p.min, p.max)).collect(),
        free,
    };
    let mut values: Vec<f64> = parameters
        .iter()
        .map(|p| if p.vary { p.clamp(p.initial_guess) } else { p.current() })
        .collect();
    let mut chi2 = problem.chi2(&values);
    if !chi2.is_finite() {
        return Err(AnalysisError::FitFailure(
            "model is not finite at the initial parameters".to_owned(),
        ));
    }

    let mut lambda = settings.initial_lambda;
    let mut converged = problem.free.is_empty();
    let mut iterations = 0;

    while !converged && iterations < settings.max_iterations {
        iterations += 1;
        let jacobian = problem.jacobian(&values);
        let gradient = jacobian.transpose() * problem.residuals(&values);
        let curvature = jacobian.transpose() * &jacobian;

        let mut improved = false;
        while lambda < 1e16 {
            let mut damped = curvature.clone();
            for i in 0..damped.nrows() {
                damped[(i, i)] += lambda * curvature[(i, i)].max(1e-12);
            }
            let Some(delta) = damped.lu().solve(&gradient) else {
                lambda *= 10.0;
                continue;
            };
            let candidate = problem.step(&values, &delta);
            let candidate_chi2 = problem.chi2(&candidate);
            if candidate_chi2.is_finite() && candidate_chi2 <= chi2 {
                let change = chi2 - candidate_chi2;
                values = candidate;
                converged = change <= settings.tolerance * chi2.max(f64::MIN_POSITIVE);
                chi2 = candidate_chi2;
                lambda = (lambda / 10.0).max(1e-12);
                improved = true;
                break;
            }
            lambda *= 10.0;
        }
        if !improved {
            // No downhill step left at any damping: this is the minimum.
            converged = true;
        }
    }
    if !converged {
        warn!("Fit did not converge after {iterations} iterations (chi2 = {chi2})");
    }
    debug!("Fit finished after {iterations} iterations, chi2 = {chi2}");

    let mut uncertainties = vec![0.0; parameters.len()];
    if !problem.free.is_empty() {
        let jacobian = problem.jacobian(&values);
        let curvature = jacobian.transpose() * &jacobian;
        match curvature.try_inverse() {
            Some(covariance) => {
                for (column, &index) in problem.free.iter().enumerate() {
                    uncertainties[index] = covariance[(column, column)].abs().sqrt();
                }
            }
            None => warn!("Covariance matrix is singular, parameter errors set to 0"),
        }
    }

    Ok(LevMarSolution {
        ndf: data.len() - problem.free.len(),
        values,
        uncertainties,
        chi2,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_data() -> Data {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        Data {
            y: x.iter().map(|x| 2.0 * x + 1.0).collect(),
            sigma: vec![1.0; x.len()],
            x,
        }
    }

    #[test]
    fn test_straight_line_fit() {
        let params = [Parameter::new("slope", 0.5), Parameter::new("offset", 0.0)];
        let solution = minimise(
            |x, p| p[0] * x + p[1],
            &line_data(),
            &params,
            &LevMarSettings::default(),
        )
        .unwrap();
        assert!(solution.converged);
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!((solution.values[1] - 1.0).abs() < 1e-6);
        assert!(solution.chi2 < 1e-8);
        assert_eq!(solution.ndf, 8);
        assert!(solution.uncertainties[0] > 0.0);
    }

    #[test]
    fn test_fixed_parameter_is_kept() {
        let mut offset = Parameter::new("offset", 0.0);
        offset.fix(3.0);
        let params = [Parameter::new("slope", 0.5), offset];
        let solution = minimise(
            |x, p| p[0] * x + p[1],
            &line_data(),
            &params,
            &LevMarSettings::default(),
        )
        .unwrap();
        assert_eq!(solution.values[1], 3.0);
        assert_eq!(solution.uncertainties[1], 0.0);
        assert!(solution.chi2 > 0.0);
    }

    #[test]
    fn test_too_few_points() {
        let data = Data {
            x: vec![1.0],
            y: vec![1.0],
            sigma: vec![1.0],
        };
        let params = [Parameter::new("a", 1.0), Parameter::new("b", 1.0)];
        assert!(matches!(
            minimise(|x, p| p[0] * x + p[1], &data, &params, &LevMarSettings::default()),
            Err(AnalysisError::FitFailure(_))
        ));
    }
}
