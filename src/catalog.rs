use serde::{Deserialize, Serialize};

/// Observable a multi-dimensional spectrum was filled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Observable {
    Tracks,
    Clusters,
    Jets,
    JetsReduced,
    McTruth,
}

/// On-disk layout generation of the input histograms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    Old,
    #[default]
    New,
}

/// Mapping from symbolic axis names to axis indices of a spectrum. One
/// variant per observable and schema generation; names are unique within
/// a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AxisCatalog {
    TracksOld,
    TracksNew,
    ClustersOld,
    ClustersNew,
    Jets,
    JetsReduced,
    McTruthOld,
    McTruthNew,
}

impl AxisCatalog {
    pub fn for_observable(observable: Observable, version: SchemaVersion) -> Self {
        match (observable, version) {
            (Observable::Tracks, SchemaVersion::Old) => Self::TracksOld,
            (Observable::Tracks, SchemaVersion::New) => Self::TracksNew,
            (Observable::Clusters, SchemaVersion::Old) => Self::ClustersOld,
            (Observable::Clusters, SchemaVersion::New) => Self::ClustersNew,
            (Observable::Jets, _) => Self::Jets,
            (Observable::JetsReduced, _) => Self::JetsReduced,
            (Observable::McTruth, SchemaVersion::Old) => Self::McTruthOld,
            (Observable::McTruth, SchemaVersion::New) => Self::McTruthNew,
        }
    }

    pub fn axes(&self) -> &'static [&'static str] {
        match self {
            Self::TracksOld => &[
                "pt", "eta", "phi", "vertexz", "pileup", "trackcuts", "mbtrigger",
            ],
            Self::TracksNew => &["pt", "eta", "phi", "vertexz", "mbtrigger"],
            Self::ClustersOld => &["energy", "vertexz", "pileup", "mbtrigger"],
            Self::ClustersNew => &["energy", "eta", "phi", "vertexz", "mbtrigger"],
            Self::Jets => &[
                "trackpt", "jetpt", "tracketa", "trackphi", "vertexz", "mbtrigger",
            ],
            Self::JetsReduced => &["trackpt", "tracketa", "trackphi", "vertexz", "mbtrigger"],
            Self::McTruthOld => &["pt", "eta", "phi", "vertexz", "ispileup"],
            Self::McTruthNew => &["pt", "eta", "phi", "vertexz"],
        }
    }

    /// Index of the named axis, `None` when the catalog does not know it.
    pub fn find_axis(&self, name: &str) -> Option<usize> {
        self.axes().iter().position(|&axis| axis == name)
    }

    /// Index of the named axis with -1 marking an unknown name.
    pub fn find_axis_index(&self, name: &str) -> i32 {
        self.find_axis(name)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn axis_name(&self, index: usize) -> Option<&'static str> {
        self.axes().get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.axes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes().is_empty()
    }

    pub fn has_axis(&self, name: &str) -> bool {
        self.find_axis(name).is_some()
    }
}
