use std::collections::BTreeMap;

use log::{error, info};

use super::Mergeable;
use super::data_set::DataSet;
use crate::cutter::projection::SpectrumHandle;
use crate::error::{AnalysisError, Result};

/// Data sets of one input, keyed by trigger class, plus the generator
/// level spectrum for simulated inputs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultData {
    name: String,
    data: BTreeMap<String, DataSet>,
    mc_truth: Option<SpectrumHandle>,
}

impl ResultData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            data: BTreeMap::new(),
            mc_truth: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn set_data(&mut self, trigger: &str, data: DataSet) {
        self.data.insert(trigger.to_owned(), data);
    }

    pub fn get_data(&self, trigger: &str) -> Result<&DataSet> {
        self.data
            .get(trigger)
            .ok_or_else(|| AnalysisError::TriggerClassNotFound(trigger.to_owned()))
    }

    pub fn get_data_mut(&mut self, trigger: &str) -> Result<&mut DataSet> {
        self.data
            .get_mut(trigger)
            .ok_or_else(|| AnalysisError::TriggerClassNotFound(trigger.to_owned()))
    }

    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.data.contains_key(trigger)
    }

    pub fn triggers(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataSet)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_mc_truth(&mut self, spectrum: SpectrumHandle) {
        self.mc_truth = Some(spectrum);
    }

    pub fn mc_truth(&self) -> Option<&SpectrumHandle> {
        self.mc_truth.as_ref()
    }

    pub fn mc_truth_mut(&mut self) -> Option<&mut SpectrumHandle> {
        self.mc_truth.as_mut()
    }

    /// Merge data sets trigger class by trigger class, and the MC truth.
    /// Everything that has a counterpart is merged before the missing ones
    /// are reported.
    pub fn add(&mut self, other: &ResultData) -> Result<()> {
        let mut missing = Vec::new();
        for (trigger, data) in &mut self.data {
            let Some(theirs) = other.data.get(trigger) else {
                missing.push(trigger.clone());
                continue;
            };
            match data.add(theirs) {
                Ok(()) => {}
                Err(AnalysisError::MergeIncomplete(containers)) => {
                    missing.extend(containers.into_iter().map(|c| format!("{trigger}/{c}")));
                }
                Err(err) => return Err(err),
            }
        }
        match (self.mc_truth.as_mut(), other.mc_truth.as_ref()) {
            (Some(mine), Some(theirs)) => mine.add(theirs)?,
            (Some(_), None) => missing.push("MCTruth".to_owned()),
            (None, Some(theirs)) => self.mc_truth = Some(theirs.clone()),
            (None, None) => {}
        }
        if missing.is_empty() {
            info!("Merged {} into {}", other.name, self.name);
            Ok(())
        } else {
            error!("Unmerged content in {}: {}", self.name, missing.join(", "));
            Err(AnalysisError::MergeIncomplete(missing))
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.data.values_mut().for_each(|d| d.scale(factor));
        if let Some(mc_truth) = self.mc_truth.as_mut() {
            mc_truth.scale(factor);
        }
    }
}

impl Mergeable for ResultData {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add(other)
    }

    fn scale(&mut self, factor: f64) {
        ResultData::scale(self, factor);
    }

    fn rename(&mut self, name: &str) {
        self.set_name(name);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::AxisCatalog;
    use crate::containers::data_container::DataContainer;
    use crate::containers::data_container::tests::{event_histogram, track_spectrum};
    use crate::histoer::{Axis, SparseHistogram};

    pub(crate) fn mc_truth(counts: usize) -> SpectrumHandle {
        let mut hist = SparseHistogram::new(
            "hMCtrueParticles",
            vec![
                Axis::new("pt", 10, (0.0, 100.0)),
                Axis::new("eta", 4, (-0.8, 0.8)),
                Axis::new("phi", 4, (0.0, 6.4)),
                Axis::new("vertexz", 20, (-10.0, 10.0)),
            ],
        );
        for _ in 0..counts {
            hist.fill(&[25.0, 0.1, 1.0, 0.5]).unwrap();
        }
        SpectrumHandle::new(hist, AxisCatalog::McTruthNew).unwrap()
    }

    pub(crate) fn result_data(name: &str, triggers: &[&str], tracks: usize) -> ResultData {
        let mut result = ResultData::new(name);
        for trigger in triggers {
            let mut set = DataSet::new();
            let fills = vec![(25.0, 1.0); tracks];
            set.add_track_container(
                "tracksAll",
                DataContainer::tracks(event_histogram(10, 10), track_spectrum("h", &fills)),
            )
            .unwrap();
            result.set_data(trigger, set);
        }
        result.set_mc_truth(mc_truth(tracks));
        result
    }

    #[test]
    fn test_trigger_lookup() {
        let result = result_data("run", &["MinBias", "EMCJHigh"], 1);
        assert_eq!(result.triggers(), vec!["EMCJHigh", "MinBias"]);
        assert!(result.has_trigger("MinBias"));
        assert!(matches!(
            result.get_data("EMCGLow"),
            Err(AnalysisError::TriggerClassNotFound(_))
        ));
    }

    #[test]
    fn test_add_includes_mc_truth() {
        let mut a = result_data("a", &["MinBias"], 2);
        let b = result_data("b", &["MinBias"], 3);
        a.add(&b).unwrap();
        let truth = a.mc_truth_mut().unwrap().project_1d("pt", "pt").unwrap();
        assert_eq!(truth.bin_content(3), 5.0);
    }

    #[test]
    fn test_add_reports_missing_trigger() {
        let mut a = result_data("a", &["MinBias", "EMCJHigh"], 1);
        let b = result_data("b", &["MinBias"], 1);
        match a.add(&b) {
            Err(AnalysisError::MergeIncomplete(missing)) => assert_eq!(missing, vec!["EMCJHigh"]),
            other => panic!("unexpected result {other:?}"),
        }
        let merged = a
            .get_data_mut("MinBias")
            .unwrap()
            .find_track_container_mut("tracksAll")
            .unwrap()
            .make_projection(0, "pt", "", "", false)
            .unwrap();
        assert_eq!(merged.bin_content(3), 2.0);
    }

    #[test]
    fn test_scale_includes_mc_truth() {
        let mut a = result_data("a", &["MinBias"], 4);
        a.scale(0.25);
        let truth = a.mc_truth_mut().unwrap().project_1d("pt", "pt").unwrap();
        assert!((truth.bin_content(3) - 1.0).abs() < 1e-12);
    }
}
