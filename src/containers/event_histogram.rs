use crate::cutter::projection::EDGE_EPSILON;
use crate::error::Result;
use crate::histoer::Histogram2D;

// Bins of the event-selection axis.
const ALL_EVENTS_BIN: usize = 1;
const PILEUP_REJECTED_BIN: usize = 2;

/// Event counter: x is the event-selection bin, y the z position of the
/// primary vertex.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventHistogram {
    histogram: Histogram2D,
}

impl EventHistogram {
    pub fn new(histogram: Histogram2D) -> Self {
        Self { histogram }
    }

    pub fn histogram(&self) -> &Histogram2D {
        &self.histogram
    }

    pub fn name(&self) -> &str {
        &self.histogram.name
    }

    /// Number of selected events, optionally only for vertices inside
    /// `vertex_range`.
    pub fn event_count(&self, vertex_range: Option<(f64, f64)>, pileup_rejection: bool) -> f64 {
        let projection = match vertex_range {
            Some((min, max)) => {
                let y_axis = &self.histogram.y_axis;
                self.histogram.projection_x(
                    "events",
                    y_axis.find_bin(min + EDGE_EPSILON),
                    y_axis.find_bin(max - EDGE_EPSILON),
                )
            }
            None => self.histogram.projection_x_full("events"),
        };
        let bin = if pileup_rejection {
            PILEUP_REJECTED_BIN
        } else {
            ALL_EVENTS_BIN
        };
        projection.bin_content(bin)
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    pub fn add(&mut self, other: &EventHistogram) -> Result<()> {
        self.histogram.add(&other.histogram)
    }
}
