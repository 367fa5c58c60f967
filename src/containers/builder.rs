use log::{info, warn};
use regex::Regex;

use super::data_container::DataContainer;
use super::data_set::DataSet;
use super::event_histogram::EventHistogram;
use super::result_data::ResultData;
use crate::catalog::{AxisCatalog, Observable, SchemaVersion};
use crate::cutter::projection::SpectrumHandle;
use crate::error::{AnalysisError, Result};
use crate::histoer::{Histogram, Histogram2D, SparseHistogram};

/// Named histogram as stored in an input list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HistogramObject {
    OneD(Histogram),
    TwoD(Histogram2D),
    Sparse(SparseHistogram),
}

impl HistogramObject {
    pub fn name(&self) -> &str {
        match self {
            HistogramObject::OneD(h) => &h.name,
            HistogramObject::TwoD(h) => &h.name,
            HistogramObject::Sparse(h) => &h.name,
        }
    }
}

/// Keyed list of histograms, the in-memory form of one analysis output.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistogramList {
    objects: Vec<HistogramObject>,
}

impl HistogramList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: HistogramObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(HistogramObject::name)
    }

    pub fn find(&self, name: &str) -> Option<&HistogramObject> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn find_1d(&self, name: &str) -> Option<&Histogram> {
        match self.find(name) {
            Some(HistogramObject::OneD(h)) => Some(h),
            _ => None,
        }
    }

    pub fn find_2d(&self, name: &str) -> Option<&Histogram2D> {
        match self.find(name) {
            Some(HistogramObject::TwoD(h)) => Some(h),
            _ => None,
        }
    }

    pub fn find_sparse(&self, name: &str) -> Option<&SparseHistogram> {
        match self.find(name) {
            Some(HistogramObject::Sparse(h)) => Some(h),
            _ => None,
        }
    }
}

// Optional track spectra per trigger and the container they end up in.
const TRACK_SPECTRA: [(&str, &str); 3] = [
    ("hTrackInAcceptanceHist", "tracksWithClusters"),
    ("hMCTrackHist", "tracksMCKine"),
    ("hMCTrackInAcceptanceHist", "tracksMCKineWithClusters"),
];

const CLUSTER_SPECTRA: [(&str, &str); 2] = [("hClusterCalibHist", "Calib"), ("hClusterUncalibHist", "Uncalib")];

/// Sorts the histograms of one output into a `ResultData`, one data set per
/// trigger class found among the event histograms.
#[derive(Debug, Clone)]
pub struct ResultDataBuilder {
    version: SchemaVersion,
    is_mc: bool,
    event_pattern: Regex,
}

impl ResultDataBuilder {
    pub fn new(version: SchemaVersion, is_mc: bool) -> Result<Self> {
        let event_pattern = Regex::new(r"^hEventHist(\w+)$")
            .map_err(|err| AnalysisError::Config(err.to_string()))?;
        Ok(Self {
            version,
            is_mc,
            event_pattern,
        })
    }

    pub fn triggers(&self, list: &HistogramList) -> Vec<String> {
        list.names()
            .filter_map(|name| self.event_pattern.captures(name))
            .filter_map(|captures| captures.get(1).map(|m| m.as_str().to_owned()))
            .collect()
    }

    fn spectrum(&self, histogram: &SparseHistogram, observable: Observable) -> Result<SpectrumHandle> {
        SpectrumHandle::new(
            histogram.clone(),
            AxisCatalog::for_observable(observable, self.version),
        )
    }

    pub fn build(&self, name: &str, list: &HistogramList) -> Result<ResultData> {
        if list.is_empty() {
            return Err(AnalysisError::DataMissing(format!(
                "histograms in {name}"
            )));
        }
        let mut result = ResultData::new(name);

        if self.is_mc {
            let truth = list
                .find_sparse("hMCtrueParticles")
                .ok_or_else(|| AnalysisError::DataMissing("hMCtrueParticles".to_owned()))?;
            result.set_mc_truth(self.spectrum(truth, Observable::McTruth)?);
        }

        let triggers = self.triggers(list);
        info!("Found the following triggers: {}", triggers.join(", "));

        for trigger in &triggers {
            let event_name = format!("hEventHist{trigger}");
            let events = list
                .find_2d(&event_name)
                .map(|h| EventHistogram::new(h.clone()))
                .ok_or_else(|| AnalysisError::DataMissing(event_name.clone()))?;

            let track_name = format!("hTrackHist{trigger}");
            let tracks = list
                .find_sparse(&track_name)
                .ok_or(AnalysisError::DataMissing(track_name))?;

            let mut data = DataSet::new();
            data.add_track_container(
                "tracksAll",
                DataContainer::tracks(events.clone(), self.spectrum(tracks, Observable::Tracks)?),
            )?;
            for (prefix, container) in TRACK_SPECTRA {
                if let Some(hist) = list.find_sparse(&format!("{prefix}{trigger}")) {
                    data.add_track_container(
                        container,
                        DataContainer::tracks(events.clone(), self.spectrum(hist, Observable::Tracks)?),
                    )?;
                }
            }
            for (prefix, container) in CLUSTER_SPECTRA {
                if let Some(hist) = list.find_sparse(&format!("{prefix}{trigger}")) {
                    data.add_cluster_container(
                        container,
                        DataContainer::clusters(events.clone(), self.spectrum(hist, Observable::Clusters)?),
                    )?;
                }
            }
            result.set_data(trigger, data);
        }
        if triggers.is_empty() {
            warn!("No event histograms found in {name}");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histoer::Axis;

    fn sparse(name: &str, axes: &[&str]) -> HistogramObject {
        let mut hist = SparseHistogram::new(
            name,
            axes.iter().map(|a| Axis::new(a, 10, (0.0, 100.0))).collect(),
        );
        let values = vec![15.0; axes.len()];
        hist.fill(&values).unwrap();
        HistogramObject::Sparse(hist)
    }

    fn events(trigger: &str) -> HistogramObject {
        let mut hist = Histogram2D::new(
            &format!("hEventHist{trigger}"),
            (2, 20),
            ((0.5, 2.5), (-10.0, 10.0)),
        );
        hist.fill(1.0, 0.0);
        HistogramObject::TwoD(hist)
    }

    fn output() -> HistogramList {
        let tracks = AxisCatalog::TracksNew.axes();
        let clusters = AxisCatalog::ClustersNew.axes();
        let mut list = HistogramList::new();
        for trigger in ["MinBias", "EMCJHigh"] {
            list.add(events(trigger));
            list.add(sparse(&format!("hTrackHist{trigger}"), tracks));
            list.add(sparse(&format!("hClusterCalibHist{trigger}"), clusters));
        }
        list.add(sparse("hMCTrackHistMinBias", tracks));
        list.add(sparse("hMCtrueParticles", AxisCatalog::McTruthNew.axes()));
        list
    }

    #[test]
    fn test_trigger_discovery() {
        let builder = ResultDataBuilder::new(SchemaVersion::New, false).unwrap();
        assert_eq!(builder.triggers(&output()), vec!["MinBias", "EMCJHigh"]);
    }

    #[test]
    fn test_build_result_data() {
        let builder = ResultDataBuilder::new(SchemaVersion::New, true).unwrap();
        let result = builder.build("lego", &output()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.mc_truth().is_some());
        let min_bias = result.get_data("MinBias").unwrap();
        assert_eq!(min_bias.list_of_track_containers(), vec!["tracksAll", "tracksMCKine"]);
        assert_eq!(min_bias.list_of_cluster_containers(), vec!["Calib"]);
        let high = result.get_data("EMCJHigh").unwrap();
        assert_eq!(high.list_of_track_containers(), vec!["tracksAll"]);
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let builder = ResultDataBuilder::new(SchemaVersion::Old, false).unwrap();
        assert!(matches!(
            builder.build("lego", &output()),
            Err(AnalysisError::BinningMismatch(..))
        ));
        assert!(builder.build("empty", &HistogramList::new()).is_err());
    }
}
