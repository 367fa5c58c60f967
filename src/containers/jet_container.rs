use super::event_histogram::EventHistogram;
use crate::catalog::AxisCatalog;
use crate::cutter::cuts::Cut;
use crate::cutter::projection::SpectrumHandle;
use crate::error::{AnalysisError, Result};
use crate::histoer::{Histogram, SparseHistogram};

/// Reconstructed and generator level track spectra for tracks in jets above
/// one jet-pt threshold.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JetPtBin {
    jet_pt: f64,
    rec: Option<SpectrumHandle>,
    mc_kine: Option<SpectrumHandle>,
}

impl JetPtBin {
    pub fn new(jet_pt: f64) -> Self {
        Self {
            jet_pt,
            rec: None,
            mc_kine: None,
        }
    }

    pub fn jet_pt(&self) -> f64 {
        self.jet_pt
    }

    pub fn rec_spectrum(&self) -> Option<&SpectrumHandle> {
        self.rec.as_ref()
    }

    pub fn mc_kine_spectrum(&self) -> Option<&SpectrumHandle> {
        self.mc_kine.as_ref()
    }

    fn for_each_spectrum(&mut self, mut action: impl FnMut(&mut SpectrumHandle)) {
        self.rec.iter_mut().chain(self.mc_kine.iter_mut()).for_each(|s| action(s));
    }

    fn spectrum_mut(&mut self, mc_kine: bool) -> Result<&mut SpectrumHandle> {
        let jet_pt = self.jet_pt;
        let spectrum = if mc_kine {
            self.mc_kine.as_mut()
        } else {
            self.rec.as_mut()
        };
        spectrum.ok_or_else(|| {
            AnalysisError::DataMissing(format!(
                "{} jet spectrum for jet pt {jet_pt}",
                if mc_kine { "MC kine" } else { "reconstructed" }
            ))
        })
    }
}

/// Jet dependent track spectra sharing one event counter.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JetContainer {
    jet_pts: Vec<JetPtBin>,
    vertex_range: Option<(f64, f64)>,
    events: Option<EventHistogram>,
}

impl JetContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_event_histogram(&mut self, events: EventHistogram) {
        self.events = Some(events);
    }

    pub fn event_histogram(&self) -> Option<&EventHistogram> {
        self.events.as_ref()
    }

    pub fn add_jet_pt(&mut self, jet_pt: f64) {
        if self.find_jet_pt(jet_pt).is_none() {
            self.jet_pts.push(JetPtBin::new(jet_pt));
        }
    }

    pub fn set_jet_pt_spectrum(
        &mut self,
        jet_pt: f64,
        spectrum: SparseHistogram,
        mc_kine: bool,
    ) -> Result<()> {
        let handle = SpectrumHandle::new(spectrum, AxisCatalog::Jets)?;
        self.add_jet_pt(jet_pt);
        if let Some(bin) = self.find_jet_pt_mut(jet_pt) {
            if mc_kine {
                bin.mc_kine = Some(handle);
            } else {
                bin.rec = Some(handle);
            }
        }
        Ok(())
    }

    pub fn find_jet_pt(&self, jet_pt: f64) -> Option<&JetPtBin> {
        self.jet_pts.iter().find(|b| (b.jet_pt - jet_pt).abs() < 1e-9)
    }

    fn find_jet_pt_mut(&mut self, jet_pt: f64) -> Option<&mut JetPtBin> {
        self.jet_pts
            .iter_mut()
            .find(|b| (b.jet_pt - jet_pt).abs() < 1e-9)
    }

    pub fn list_of_jet_pts(&self) -> Vec<f64> {
        self.jet_pts.iter().map(JetPtBin::jet_pt).collect()
    }

    pub fn set_vertex_range(&mut self, min: f64, max: f64) {
        self.vertex_range = Some((min, max));
        for bin in &mut self.jet_pts {
            bin.for_each_spectrum(|s| s.apply_cut("vertexz", Some(min), Some(max)));
        }
    }

    pub fn set_eta_range(&mut self, min: f64, max: f64) {
        for bin in &mut self.jet_pts {
            bin.for_each_spectrum(|s| s.apply_cut("tracketa", Some(min), Some(max)));
        }
    }

    pub fn set_phi_range(&mut self, min: f64, max: f64) {
        for bin in &mut self.jet_pts {
            bin.for_each_spectrum(|s| s.apply_cut("trackphi", Some(min), Some(max)));
        }
    }

    /// Only keep tracks from jets with at least `min_jet_pt`.
    pub fn set_min_jet_pt(&mut self, min_jet_pt: f64) {
        for bin in &mut self.jet_pts {
            bin.for_each_spectrum(|s| s.apply_cut("jetpt", Some(min_jet_pt), None));
        }
    }

    pub fn request_seen_in_min_bias(&mut self) {
        for bin in &mut self.jet_pts {
            bin.for_each_spectrum(|s| s.apply_cut("mbtrigger", Some(1.0), Some(1.0)));
        }
    }

    pub fn event_count(&self) -> Result<f64> {
        let events = self
            .events
            .as_ref()
            .ok_or_else(|| AnalysisError::DataMissing("EventHist for jets".to_owned()))?;
        Ok(events.event_count(self.vertex_range, false))
    }

    fn make_projection(
        &mut self,
        jet_pt: f64,
        dimension: usize,
        name: &str,
        normalize: bool,
        mc_kine: bool,
    ) -> Result<Histogram> {
        let event_count = if normalize { self.event_count()? } else { 1.0 };
        let bin = self
            .find_jet_pt_mut(jet_pt)
            .ok_or_else(|| AnalysisError::DataMissing(format!("jet pt bin {jet_pt}")))?;
        let mut projected = bin.spectrum_mut(mc_kine)?.project_dimension(name, dimension)?;
        projected.enable_sumw2();
        if normalize {
            if event_count <= 0.0 {
                return Err(AnalysisError::NoSelectedEvents(name.to_owned()));
            }
            projected.normalise_bin_width();
            projected.scale(1.0 / event_count);
        }
        Ok(projected)
    }

    pub fn make_projection_rec_kine(
        &mut self,
        jet_pt: f64,
        dimension: usize,
        name: &str,
        normalize: bool,
    ) -> Result<Histogram> {
        self.make_projection(jet_pt, dimension, name, normalize, false)
    }

    pub fn make_projection_mc_kine(
        &mut self,
        jet_pt: f64,
        dimension: usize,
        name: &str,
        normalize: bool,
    ) -> Result<Histogram> {
        self.make_projection(jet_pt, dimension, name, normalize, true)
    }

    /// Collapse the jet pt axis of the reconstructed spectrum, keeping only
    /// tracks from jets above `min_jet_pt`. The result uses the reduced jet
    /// layout.
    pub fn project_min_jet_pt(&mut self, jet_pt: f64, min_jet_pt: f64) -> Result<SpectrumHandle> {
        let bin = self
            .find_jet_pt_mut(jet_pt)
            .ok_or_else(|| AnalysisError::DataMissing(format!("jet pt bin {jet_pt}")))?;
        let spectrum = bin.spectrum_mut(false)?;
        let name = format!("{}jetpt{:03}", spectrum.name(), min_jet_pt.round());
        let reduced = spectrum.project_nd_with_extra_cut(
            &name,
            AxisCatalog::JetsReduced.axes(),
            &Cut::new("jetpt", Some(min_jet_pt), None),
        )?;
        SpectrumHandle::new(reduced, AxisCatalog::JetsReduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histoer::{Axis, Histogram2D};

    fn jet_spectrum() -> SparseHistogram {
        let mut hist = SparseHistogram::new(
            "hTrackJetHist",
            vec![
                Axis::new("trackpt", 10, (0.0, 100.0)),
                Axis::new("jetpt", 20, (0.0, 200.0)),
                Axis::new("tracketa", 4, (-0.8, 0.8)),
                Axis::new("trackphi", 4, (0.0, 6.4)),
                Axis::new("vertexz", 20, (-10.0, 10.0)),
                Axis::new("mbtrigger", 2, (-0.5, 1.5)),
            ],
        );
        for (pt, jet_pt) in [(5.0, 25.0), (15.0, 45.0), (15.0, 65.0), (35.0, 95.0)] {
            hist.fill(&[pt, jet_pt, 0.1, 1.0, 0.5, 1.0]).unwrap();
        }
        hist
    }

    fn container() -> JetContainer {
        let mut container = JetContainer::new();
        let mut events = Histogram2D::new("hEventHist", (2, 20), ((0.5, 2.5), (-10.0, 10.0)));
        for _ in 0..4 {
            events.fill(1.0, 0.5);
        }
        container.set_event_histogram(EventHistogram::new(events));
        container.set_jet_pt_spectrum(20.0, jet_spectrum(), false).unwrap();
        container
    }

    #[test]
    fn test_min_jet_pt_projection() {
        let mut container = container();
        container.set_min_jet_pt(40.0);
        let projected = container.make_projection_rec_kine(20.0, 0, "tracks", true).unwrap();
        // two tracks at 15 GeV, 10 GeV wide bins, 4 events
        assert!((projected.bin_content(2) - 0.05).abs() < 1e-12);
        assert_eq!(projected.bin_content(1), 0.0);
        assert!(container.make_projection_mc_kine(20.0, 0, "mc", false).is_err());
        assert!(container.make_projection_rec_kine(30.0, 0, "x", false).is_err());
    }

    #[test]
    fn test_reduced_projection() {
        let mut container = container();
        let mut reduced = container.project_min_jet_pt(20.0, 60.0).unwrap();
        assert_eq!(reduced.catalog(), AxisCatalog::JetsReduced);
        assert_eq!(reduced.name(), "hTrackJetHistjetpt060");
        let tracks = reduced.project_1d("pt", "trackpt").unwrap();
        assert_eq!(tracks.total(), 2.0);
        assert_eq!(container.list_of_jet_pts(), vec![20.0]);
    }
}
