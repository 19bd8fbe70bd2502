use crate::amount::StakeAmount;
use crate::status::DisputeStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TribunalError {
    #[error("Operation restricted to the contract owner")]
    OwnerOnly,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid status: expected {expected}, got {actual}")]
    InvalidStatus {
        expected: DisputeStatus,
        actual: DisputeStatus,
    },

    #[error("Insufficient stake: required {required}, available {available}")]
    InsufficientStake {
        required: StakeAmount,
        available: StakeAmount,
    },

    #[error("Vote already recorded for {0}")]
    AlreadyVoted(String),

    #[error("Dispute is closed")]
    DisputeClosed,

    #[error("Invalid prediction: {0}")]
    InvalidPrediction(String),

    #[error("Arbitrator not qualified: {0}")]
    ArbitratorNotQualified(String),

    #[error("Escrow error: {0}")]
    Escrow(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TribunalError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TribunalError>;
