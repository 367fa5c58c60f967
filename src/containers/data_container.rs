use log::{debug, info};

use super::Mergeable;
use super::event_histogram::EventHistogram;
use crate::cutter::projection::SpectrumHandle;
use crate::error::{AnalysisError, Result};
use crate::histoer::Histogram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContainerKind {
    Tracks,
    Clusters,
}

impl ContainerKind {
    fn spectrum_label(self) -> &'static str {
        match self {
            ContainerKind::Tracks => "TrackHist",
            ContainerKind::Clusters => "ClusterHist",
        }
    }
}

/// Event counter plus the multi-dimensional spectrum of one observable,
/// producing event normalised 1-D spectra.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataContainer {
    kind: ContainerKind,
    events: Option<EventHistogram>,
    spectrum: Option<SpectrumHandle>,
    vertex_range: Option<(f64, f64)>,
    pileup_rejection: bool,
    scaled: bool,
}

impl DataContainer {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            events: None,
            spectrum: None,
            vertex_range: None,
            pileup_rejection: false,
            scaled: false,
        }
    }

    pub fn with_data(kind: ContainerKind, events: EventHistogram, spectrum: SpectrumHandle) -> Self {
        let mut container = Self::new(kind);
        container.events = Some(events);
        container.spectrum = Some(spectrum);
        container
    }

    pub fn tracks(events: EventHistogram, spectrum: SpectrumHandle) -> Self {
        Self::with_data(ContainerKind::Tracks, events, spectrum)
    }

    pub fn clusters(events: EventHistogram, spectrum: SpectrumHandle) -> Self {
        Self::with_data(ContainerKind::Clusters, events, spectrum)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn set_event_histogram(&mut self, events: EventHistogram) {
        self.events = Some(events);
    }

    pub fn set_spectrum(&mut self, spectrum: SpectrumHandle) {
        self.spectrum = Some(spectrum);
    }

    pub fn event_histogram(&self) -> Option<&EventHistogram> {
        self.events.as_ref()
    }

    pub fn spectrum(&self) -> Option<&SpectrumHandle> {
        self.spectrum.as_ref()
    }

    pub fn spectrum_mut(&mut self) -> Option<&mut SpectrumHandle> {
        self.spectrum.as_mut()
    }

    /// Both the event counter and the spectrum are present.
    pub fn is_bound(&self) -> bool {
        self.events.is_some() && self.spectrum.is_some()
    }

    pub fn is_scaled(&self) -> bool {
        self.scaled
    }

    pub fn pileup_rejection(&self) -> bool {
        self.pileup_rejection
    }

    fn cut(&mut self, axis: &str, min: Option<f64>, max: Option<f64>) {
        match self.spectrum.as_mut() {
            Some(spectrum) => spectrum.apply_cut(axis, min, max),
            None => debug!("No spectrum to apply cut on {axis} to"),
        }
    }

    /// Select the vertex window for both the spectrum and the event count.
    pub fn set_vertex_range(&mut self, min: f64, max: f64) {
        self.cut("vertexz", Some(min), Some(max));
        self.vertex_range = Some((min, max));
    }

    pub fn set_pileup_rejection(&mut self, on: bool) {
        self.pileup_rejection = on;
        if let Some(spectrum) = self.spectrum.as_mut()
            && spectrum.catalog().has_axis("pileup")
        {
            if on {
                spectrum.apply_cut("pileup", Some(1.0), Some(1.0));
            } else {
                spectrum.remove_cut("pileup");
            }
        }
    }

    pub fn select_track_cuts(&mut self, cut_id: u32) {
        let id = f64::from(cut_id);
        self.cut("trackcuts", Some(id), Some(id));
    }

    pub fn set_eta_range(&mut self, min: f64, max: f64) {
        self.cut("eta", Some(min), Some(max));
    }

    pub fn set_phi_range(&mut self, min: f64, max: f64) {
        self.cut("phi", Some(min), Some(max));
    }

    pub fn request_seen_in_min_bias(&mut self) {
        self.cut("mbtrigger", Some(1.0), Some(1.0));
    }

    pub fn event_count(&self) -> Result<f64> {
        let events = self
            .events
            .as_ref()
            .ok_or_else(|| AnalysisError::DataMissing("EventHist".to_owned()))?;
        Ok(events.event_count(self.vertex_range, self.pileup_rejection))
    }

    /// Project the spectrum onto `dimension`. With `normalize` the result is
    /// divided by the bin width and by the number of selected events. An
    /// empty `name` names the projection after the spectrum.
    pub fn make_projection(
        &mut self,
        dimension: usize,
        name: &str,
        x_title: &str,
        y_title: &str,
        normalize: bool,
    ) -> Result<Histogram> {
        let label = self.kind.spectrum_label();
        if self.spectrum.is_none() {
            return Err(AnalysisError::DataMissing(label.to_owned()));
        }
        if self.events.is_none() {
            return Err(AnalysisError::DataMissing("EventHist".to_owned()));
        }
        if normalize && self.scaled {
            return Err(AnalysisError::NormalisationAfterScale(label.to_owned()));
        }
        let event_count = if normalize { self.event_count()? } else { 1.0 };
        let spectrum = self
            .spectrum
            .as_mut()
            .ok_or_else(|| AnalysisError::DataMissing(label.to_owned()))?;
        let name = if name.is_empty() {
            format!("{}/", spectrum.name())
        } else {
            name.to_owned()
        };
        let mut projected = spectrum.project_dimension(&name, dimension)?;
        projected.set_axis_titles(x_title, y_title);
        projected.enable_sumw2();
        if normalize {
            if event_count <= 0.0 {
                return Err(AnalysisError::NoSelectedEvents(name));
            }
            projected.normalise_bin_width();
            projected.scale(1.0 / event_count);
        }
        Ok(projected)
    }

    pub fn is_empty(&self) -> bool {
        let no_events = self.events.as_ref().is_none_or(EventHistogram::is_empty);
        let no_spectrum = self
            .spectrum
            .as_ref()
            .is_none_or(|s| s.histogram().is_empty());
        no_events && no_spectrum
    }

    pub fn add(&mut self, other: &DataContainer) -> Result<()> {
        if self.kind != other.kind {
            return Err(AnalysisError::MergeTypeMismatch {
                expected: format!("{:?}", self.kind),
                found: format!("{:?}", other.kind),
            });
        }
        if self.is_empty() {
            // the selection made on this container wins over the copied one
            let cuts = self.spectrum.as_ref().map(|s| s.cuts().clone());
            let (vertex_range, pileup_rejection) = (self.vertex_range, self.pileup_rejection);
            *self = other.clone();
            if let (Some(cuts), Some(spectrum)) = (cuts, self.spectrum.as_mut()) {
                for cut in &cuts {
                    spectrum.apply_cut(&cut.axis, cut.min, cut.max);
                }
            }
            self.vertex_range = vertex_range.or(self.vertex_range);
            self.pileup_rejection |= pileup_rejection;
            return Ok(());
        }
        match (self.events.as_mut(), other.events.as_ref()) {
            (Some(mine), Some(theirs)) => mine.add(theirs)?,
            (None, Some(theirs)) => self.events = Some(theirs.clone()),
            _ => {}
        }
        match (self.spectrum.as_mut(), other.spectrum.as_ref()) {
            (Some(mine), Some(theirs)) => mine.add(theirs)?,
            (None, Some(theirs)) => self.spectrum = Some(theirs.clone()),
            _ => {}
        }
        self.scaled |= other.scaled;
        Ok(())
    }

    /// Scale the spectrum; the event counter keeps the raw number of events.
    pub fn scale(&mut self, factor: f64) {
        if let Some(spectrum) = self.spectrum.as_mut() {
            info!("Scaling {} by {factor}", spectrum.name());
            spectrum.scale(factor);
        }
        self.scaled = true;
    }
}

impl Mergeable for DataContainer {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add(other)
    }

    fn scale(&mut self, factor: f64) {
        DataContainer::scale(self, factor);
    }
}
