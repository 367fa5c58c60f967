use std::collections::BTreeMap;

use log::info;

use crate::error::{AnalysisError, Result};
use crate::histoer::Histogram;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightEntry {
    pub cross_section: f64,
    pub trials: f64,
}

impl WeightEntry {
    pub fn weight(&self) -> f64 {
        self.cross_section / self.trials
    }
}

/// Cross section and number of trials for each pt-hard bin of a
/// simulation production.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightTable {
    entries: BTreeMap<i32, WeightEntry>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, pt_hard_bin: i32, cross_section: f64, trials: f64) -> Result<()> {
        if !cross_section.is_finite() || cross_section < 0.0 {
            return Err(AnalysisError::InvalidWeight {
                bin: pt_hard_bin,
                reason: format!("cross section {cross_section}"),
            });
        }
        if !trials.is_finite() || trials <= 0.0 {
            return Err(AnalysisError::InvalidWeight {
                bin: pt_hard_bin,
                reason: format!("number of trials {trials}"),
            });
        }
        self.entries.insert(
            pt_hard_bin,
            WeightEntry {
                cross_section,
                trials,
            },
        );
        Ok(())
    }

    /// Read the cross section and trials from the bookkeeping histograms
    /// of a production, which only have the bin of this sample filled.
    pub fn add_entry_from_histograms(
        &mut self,
        pt_hard_bin: i32,
        cross_section: &Histogram,
        trials: &Histogram,
    ) -> Result<()> {
        self.add_entry(pt_hard_bin, cross_section.total(), trials.total())
    }

    pub fn entry(&self, pt_hard_bin: i32) -> Option<&WeightEntry> {
        self.entries.get(&pt_hard_bin)
    }

    pub fn weight(&self, pt_hard_bin: i32) -> Option<f64> {
        self.entries.get(&pt_hard_bin).map(WeightEntry::weight)
    }

    pub fn bins(&self) -> Vec<i32> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scale a spectrum of one pt-hard bin by its weight.
    pub fn reweight_spectrum(&self, pt_hard_bin: i32, spectrum: &mut Histogram) -> Result<()> {
        let weight = self.weight(pt_hard_bin).ok_or_else(|| AnalysisError::InvalidWeight {
            bin: pt_hard_bin,
            reason: "no entry".to_owned(),
        })?;
        info!("Reweighting {} with {weight:e} (pt-hard bin {pt_hard_bin})", spectrum.name);
        spectrum.scale(weight);
        Ok(())
    }
}
