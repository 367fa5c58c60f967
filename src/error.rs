use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0} not available")]
    DataMissing(String),

    #[error("Requested dimension {dimension} outside the {ndims} dimensions of the spectrum")]
    DimensionOutOfRange { dimension: usize, ndims: usize },

    #[error("Value {value} outside range [{min}, {max}] of axis {axis}")]
    ValueOutOfAxisRange {
        axis: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Content with name {0} already exists")]
    ContentExists(String),

    #[error("Cannot merge {found} into {expected}")]
    MergeTypeMismatch { expected: String, found: String },

    #[error("Several containers have not been found: {}", .0.join(", "))]
    MergeIncomplete(Vec<String>),

    #[error("Fit has not been performed")]
    FitNotPerformed,

    #[error("Failed summing weighted data: {0}")]
    SummingFailure(String),

    #[error("Axis {0} is not known to the catalog")]
    AxisNotFound(String),

    #[error("Axis {0} requested more than once in a projection")]
    DuplicateProjectionAxis(String),

    #[error("Histograms {0} and {1} have incompatible binning")]
    BinningMismatch(String, String),

    #[error("Data for trigger class {0} not found")]
    TriggerClassNotFound(String),

    #[error("No events selected for {0}")]
    NoSelectedEvents(String),

    #[error("Container {0} has been scaled, event normalisation is no longer valid")]
    NormalisationAfterScale(String),

    #[error("Invalid weight for pt-hard bin {bin}: {reason}")]
    InvalidWeight { bin: i32, reason: String },

    #[error("Fit failed: {0}")]
    FitFailure(String),

    #[error("No root found in [{low}, {high}]")]
    RootNotFound { low: f64, high: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for AnalysisError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
