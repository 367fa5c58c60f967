pub mod combiner;
pub mod data_collection;
pub mod pt_reach;
pub mod scaler;
pub mod trigger_efficiency;
pub mod turnon;

pub use combiner::SpectrumCombiner;
pub use pt_reach::PtReachCalculator;
pub use scaler::TriggeredSpectrumScaler;
pub use trigger_efficiency::TriggerEfficiency;
pub use turnon::TriggerTurnonCurve;
