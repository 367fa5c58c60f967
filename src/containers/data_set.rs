use std::collections::BTreeMap;

use log::error;

use super::Mergeable;
use super::data_container::DataContainer;
use super::event_histogram::EventHistogram;
use super::jet_container::JetContainer;
use crate::error::{AnalysisError, Result};
use crate::histoer::SparseHistogram;

/// All containers recorded for one trigger class.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataSet {
    track_containers: BTreeMap<String, DataContainer>,
    cluster_containers: BTreeMap<String, DataContainer>,
    jet_container: JetContainer,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track_container(&mut self, name: &str, container: DataContainer) -> Result<()> {
        if self.track_containers.contains_key(name) {
            return Err(AnalysisError::ContentExists(format!("TrackContainer {name}")));
        }
        self.track_containers.insert(name.to_owned(), container);
        Ok(())
    }

    pub fn add_cluster_container(&mut self, name: &str, container: DataContainer) -> Result<()> {
        if self.cluster_containers.contains_key(name) {
            return Err(AnalysisError::ContentExists(format!("ClusterContainer {name}")));
        }
        self.cluster_containers.insert(name.to_owned(), container);
        Ok(())
    }

    pub fn add_jet_spectrum(&mut self, spectrum: SparseHistogram, jet_pt: f64, mc_kine: bool) -> Result<()> {
        self.jet_container.set_jet_pt_spectrum(jet_pt, spectrum, mc_kine)
    }

    pub fn add_event_hist_for_jets(&mut self, events: EventHistogram) {
        self.jet_container.set_event_histogram(events);
    }

    pub fn find_track_container(&self, name: &str) -> Option<&DataContainer> {
        self.track_containers.get(name)
    }

    pub fn find_track_container_mut(&mut self, name: &str) -> Option<&mut DataContainer> {
        self.track_containers.get_mut(name)
    }

    pub fn find_cluster_container(&self, name: &str) -> Option<&DataContainer> {
        self.cluster_containers.get(name)
    }

    pub fn find_cluster_container_mut(&mut self, name: &str) -> Option<&mut DataContainer> {
        self.cluster_containers.get_mut(name)
    }

    pub fn jet_container(&self) -> &JetContainer {
        &self.jet_container
    }

    pub fn jet_container_mut(&mut self) -> &mut JetContainer {
        &mut self.jet_container
    }

    pub fn list_of_track_containers(&self) -> Vec<&str> {
        self.track_containers.keys().map(String::as_str).collect()
    }

    pub fn list_of_cluster_containers(&self) -> Vec<&str> {
        self.cluster_containers.keys().map(String::as_str).collect()
    }

    /// Merge the same-named containers of `other` into this set. Every
    /// container with a counterpart is merged; containers without one are
    /// reported together afterwards. Jet spectra are not merged.
    pub fn add(&mut self, other: &DataSet) -> Result<()> {
        let mut missing = Vec::new();
        for (name, container) in &mut self.track_containers {
            match other.track_containers.get(name) {
                Some(theirs) => container.add(theirs)?,
                None => missing.push(name.clone()),
            }
        }
        for (name, container) in &mut self.cluster_containers {
            match other.cluster_containers.get(name) {
                Some(theirs) => container.add(theirs)?,
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            error!("Containers without counterpart: {}", missing.join(", "));
            Err(AnalysisError::MergeIncomplete(missing))
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.track_containers
            .values_mut()
            .chain(self.cluster_containers.values_mut())
            .for_each(|c| c.scale(factor));
    }
}

impl Mergeable for DataSet {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add(other)
    }

    fn scale(&mut self, factor: f64) {
        DataSet::scale(self, factor);
    }
}
