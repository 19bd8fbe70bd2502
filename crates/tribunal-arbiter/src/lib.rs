pub mod registry;

pub use registry::{vote_weight, Arbitrator, ArbitratorRegistry, INITIAL_REPUTATION, REPUTATION_STEP};
