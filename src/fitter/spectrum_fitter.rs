use log::{info, warn};

use super::common::Data;
use super::levmar::{LevMarSolution, minimise};
use super::models::FitModel;
use crate::config::FitterConfig;
use crate::error::{AnalysisError, Result};
use crate::histoer::{Axis, Histogram};

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum FitState {
    NotFit,
    Fit {
        range: (f64, f64),
        chi2: f64,
        ndf: usize,
    },
}

/// Parametric fit of a 1-D spectrum. The data histogram is never modified;
/// every query about the parameterisation needs a completed fit.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SpectrumFitter {
    name: String,
    data: Histogram,
    model: FitModel,
    config: FitterConfig,
    state: FitState,
}

impl SpectrumFitter {
    /// Power-law fitter for `spectrum`.
    pub fn new(name: &str, spectrum: &Histogram) -> Self {
        Self::with_model(name, spectrum, FitModel::default())
    }

    pub fn with_model(name: &str, spectrum: &Histogram, model: FitModel) -> Self {
        Self {
            name: name.to_owned(),
            data: spectrum.clone(),
            model,
            config: FitterConfig::default(),
            state: FitState::NotFit,
        }
    }

    pub fn with_config(mut self, config: &FitterConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Power law fitted over the steeply falling part of a minimum-bias spectrum.
    pub fn min_bias(name: &str, spectrum: &Histogram) -> Result<Self> {
        Self::min_bias_with(name, spectrum, &FitterConfig::default())
    }

    /// Like [`SpectrumFitter::min_bias`] with a different lower fit edge.
    pub fn min_bias_from(name: &str, spectrum: &Histogram, low: f64) -> Result<Self> {
        let mut config = FitterConfig::default();
        config.min_bias_range.0 = low;
        Self::min_bias_with(name, spectrum, &config)
    }

    pub fn min_bias_with(name: &str, spectrum: &Histogram, config: &FitterConfig) -> Result<Self> {
        let mut fitter = Self::new(name, spectrum).with_config(config);
        let (min, max) = config.min_bias_range;
        fitter.fit(min, max)?;
        Ok(fitter)
    }

    /// Power law fitted over the trigger enhanced tail.
    pub fn triggered(name: &str, spectrum: &Histogram) -> Result<Self> {
        Self::triggered_with(name, spectrum, &FitterConfig::default())
    }

    pub fn triggered_with(name: &str, spectrum: &Histogram, config: &FitterConfig) -> Result<Self> {
        let mut fitter = Self::new(name, spectrum).with_config(config);
        let (min, max) = config.triggered_range;
        fitter.fit(min, max)?;
        Ok(fitter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Histogram {
        &self.data
    }

    pub fn model(&self) -> &FitModel {
        &self.model
    }

    /// Change parameter settings before a fit. Any previous result is dropped.
    pub fn model_mut(&mut self) -> &mut FitModel {
        self.state = FitState::NotFit;
        &mut self.model
    }

    pub fn state(&self) -> &FitState {
        &self.state
    }

    pub fn is_fit(&self) -> bool {
        matches!(self.state, FitState::Fit { .. })
    }

    fn solve(&self, data: &Data) -> Result<LevMarSolution> {
        let parameters: Vec<_> = self.model.parameters().into_iter().cloned().collect();
        minimise(
            |x, values| self.model.evaluate_with(x, values),
            data,
            &parameters,
            &self.config.levmar,
        )
    }

    /// Weighted least-squares fit over the bins with centres in `[min, max]`.
    pub fn fit(&mut self, min: f64, max: f64) -> Result<()> {
        self.state = FitState::NotFit;
        self.model.clear();

        let data = Data::from_histogram(&self.data, min, max);
        if data.is_empty() {
            return Err(AnalysisError::FitFailure(format!(
                "{}: no points with errors in [{min}, {max}]",
                self.name
            )));
        }
        self.model.guess(&data);
        let solution = self.solve(&data)?;
        if !solution.converged {
            warn!("{}: {} fit did not converge", self.name, self.model.name());
        }
        self.model.set_result(&solution);

        let summary = self
            .model
            .parameters()
            .iter()
            .map(|p| format!("{} = {:.4e} +- {:.2e}", p.name, p.current(), p.uncertainty.unwrap_or(0.0)))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "{}: {} fit in [{min}, {max}], chi2/ndf = {:.2}/{}: {summary}",
            self.name,
            self.model.name(),
            solution.chi2,
            solution.ndf
        );
        self.state = FitState::Fit {
            range: (min, max),
            chi2: solution.chi2,
            ndf: solution.ndf,
        };
        Ok(())
    }

    pub fn fit_range(&self) -> Result<(f64, f64)> {
        match self.state {
            FitState::Fit { range, .. } => Ok(range),
            FitState::NotFit => Err(AnalysisError::FitNotPerformed),
        }
    }

    /// The fitted model.
    pub fn parameterisation(&self) -> Result<&FitModel> {
        self.fit_range()?;
        Ok(&self.model)
    }

    pub fn parameterised_value_at(&self, x: f64) -> Result<f64> {
        Ok(self.parameterisation()?.value_at(x))
    }

    pub fn calculate_integral(&self, xmin: f64, xmax: f64) -> Result<f64> {
        Ok(self.parameterisation()?.integral(xmin, xmax))
    }

    pub fn calculate_bin_mean(&self, xmin: f64, xmax: f64) -> Result<f64> {
        Ok(self.calculate_integral(xmin, xmax)? / (xmax - xmin))
    }

    /// Integral from `x` up to the cutoff, summed in fixed steps.
    pub fn calculate_integral_above(&self, x: f64) -> Result<f64> {
        let model = self.parameterisation()?;
        let step = self.config.integral_step;
        let cutoff = self.config.integral_cutoff;
        let mut sum = 0.0;
        let mut low = x;
        while low < cutoff {
            let high = (low + step).min(cutoff);
            sum += model.integral(low, high);
            low = high;
        }
        Ok(sum)
    }

    /// Fraction of the yield above the fit range minimum that lies above `x`.
    pub fn calculate_normalised_yield_above(&self, x: f64) -> Result<f64> {
        let (min, _) = self.fit_range()?;
        Ok(self.calculate_integral_above(x)? / self.calculate_integral_above(min)?)
    }

    /// Histogram of the model with `nbins` bins in `[xmin, xmax]`, filled
    /// with the bin mean (`norm_bin_width`) or the bin integral.
    pub fn make_binned_parameterisation(
        &self,
        nbins: usize,
        xmin: f64,
        xmax: f64,
        norm_bin_width: bool,
    ) -> Result<Histogram> {
        self.binned(Axis::new("x", nbins, (xmin, xmax)), norm_bin_width)
    }

    /// Same as [`SpectrumFitter::make_binned_parameterisation`] in the binning of the data.
    pub fn make_binned_parameterisation_default(&self, norm_bin_width: bool) -> Result<Histogram> {
        self.binned(self.data.x_axis.clone(), norm_bin_width)
    }

    fn binned(&self, axis: Axis, norm_bin_width: bool) -> Result<Histogram> {
        self.fit_range()?;
        let mut result = Histogram::from_axis(&format!("{}_binned", self.name), axis);
        result.set_axis_titles(&self.data.x_axis.title, &self.data.y_title);
        result.enable_sumw2();
        for bin in 1..=result.n_bins() {
            let (low, high) = (result.bin_low_edge(bin), result.bin_up_edge(bin));
            let value = if norm_bin_width {
                self.calculate_bin_mean(low, high)?
            } else {
                self.calculate_integral(low, high)?
            };
            result.set_bin_content(bin, if value.is_finite() { value } else { 0.0 });
            result.set_bin_error(bin, 0.0);
        }
        Ok(result)
    }
}
