use crate::amount::StakeAmount;
use serde::{Deserialize, Serialize};

/// Operational parameters consumed by every component of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribunalParams {
    /// Minimum stake for dispute creation and arbitrator registration.
    pub min_stake: StakeAmount,

    /// Reputation floor an arbitrator must hold to be assignable.
    pub min_arbitrator_reputation: u64,

    /// Confidence (0-100) a pattern must reach before a prediction is accepted.
    pub confidence_threshold: u64,

    /// Resolution fee retained by the house, as a percentage of the stake.
    pub fee_percent: u64,

    /// Global switch for the predictive engine.
    pub predictions_enabled: bool,

    /// Cap on the specialization tags an arbitrator may register with.
    pub max_specializations: usize,
}

impl Default for TribunalParams {
    fn default() -> Self {
        Self {
            min_stake: StakeAmount::from_units(1_000_000),
            min_arbitrator_reputation: 50,
            confidence_threshold: 75,
            fee_percent: 5,
            predictions_enabled: true,
            max_specializations: 5,
        }
    }
}
