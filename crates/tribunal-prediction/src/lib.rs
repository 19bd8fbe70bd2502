pub mod engine;
pub mod store;

pub use engine::{Forecast, PredictionEngine, MIN_SAMPLE_SIZE};
pub use store::{OutcomePattern, PatternKey, PatternStore};
