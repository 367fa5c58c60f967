use std::path::Path;

use log::info;

use crate::catalog::SchemaVersion;
use crate::containers::data_container::DataContainer;
use crate::error::{AnalysisError, Result};
use crate::fitter::levmar::LevMarSettings;

/// Standard event and track selection applied before building spectra.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct EventSelection {
    pub vertex_range: (f64, f64),
    pub pileup_rejection: bool,
    pub track_cuts: u32,
    pub eta_range: Option<(f64, f64)>,
    pub phi_range: Option<(f64, f64)>,
}

impl Default for EventSelection {
    fn default() -> Self {
        Self {
            vertex_range: (-10.0, 10.0),
            pileup_rejection: true,
            track_cuts: 1,
            eta_range: None,
            phi_range: None,
        }
    }
}

impl EventSelection {
    pub fn apply(&self, container: &mut DataContainer) {
        container.set_vertex_range(self.vertex_range.0, self.vertex_range.1);
        container.set_pileup_rejection(self.pileup_rejection);
        container.select_track_cuts(self.track_cuts);
        if let Some((min, max)) = self.eta_range {
            container.set_eta_range(min, max);
        }
        if let Some((min, max)) = self.phi_range {
            container.set_phi_range(min, max);
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct FitterConfig {
    pub min_bias_range: (f64, f64),
    pub triggered_range: (f64, f64),
    /// Width of the steps summed for yields above a threshold.
    pub integral_step: f64,
    pub integral_cutoff: f64,
    pub levmar: LevMarSettings,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            min_bias_range: (15.0, 50.0),
            triggered_range: (50.0, 100.0),
            integral_step: 10.0,
            integral_cutoff: 1000.0,
            levmar: LevMarSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PtReachConfig {
    /// Number of particles required at the reach point.
    pub limit: f64,
    pub initial_guess: f64,
    pub max_pt: f64,
    pub tolerance: f64,
}

impl Default for PtReachConfig {
    fn default() -> Self {
        Self {
            limit: 1.0,
            initial_guess: 10.0,
            max_pt: 1000.0,
            tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema_version: SchemaVersion,
    pub selection: EventSelection,
    pub fitter: FitterConfig,
    pub pt_reach: PtReachConfig,
}

impl AnalysisConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration file, JSON for `.json` files and YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("yaml" | "yml") | None => Self::from_yaml_str(&text)?,
            Some(other) => {
                return Err(AnalysisError::Config(format!(
                    "unsupported configuration format .{other}"
                )));
            }
        };
        info!("Loaded analysis configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
