use crate::error::{Result, TribunalError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a dispute.
///
/// Pending disputes currently have no transition into EvidenceCollection;
/// staging past that point is done through `DisputeEngine::force_status`.
/// Appealed is modeled but no in-scope operation produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    Pending,
    EvidenceCollection,
    PredictionPhase,
    Arbitration,
    Resolved,
    Appealed,
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisputeStatus::Pending => "pending",
            DisputeStatus::EvidenceCollection => "evidence-collection",
            DisputeStatus::PredictionPhase => "prediction-phase",
            DisputeStatus::Arbitration => "arbitration",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Appealed => "appealed",
        };
        write!(f, "{}", name)
    }
}

/// Guarded operations against a dispute's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeOp {
    SubmitEvidence,
    GeneratePrediction,
    AssignArbitrator,
    SubmitVote,
    Resolve,
}

impl DisputeOp {
    /// The single status each operation is allowed to run in.
    pub fn required_status(&self) -> DisputeStatus {
        match self {
            DisputeOp::SubmitEvidence => DisputeStatus::EvidenceCollection,
            DisputeOp::GeneratePrediction => DisputeStatus::EvidenceCollection,
            DisputeOp::AssignArbitrator => DisputeStatus::PredictionPhase,
            DisputeOp::SubmitVote => DisputeStatus::Arbitration,
            DisputeOp::Resolve => DisputeStatus::Arbitration,
        }
    }
}

impl DisputeStatus {
    /// Transition table: status x operation -> next status, or InvalidStatus.
    pub fn apply(self, op: DisputeOp) -> Result<DisputeStatus> {
        if self != op.required_status() {
            return Err(TribunalError::InvalidStatus {
                expected: op.required_status(),
                actual: self,
            });
        }

        let next = match op {
            DisputeOp::SubmitEvidence => DisputeStatus::EvidenceCollection,
            DisputeOp::GeneratePrediction => DisputeStatus::PredictionPhase,
            DisputeOp::AssignArbitrator => DisputeStatus::Arbitration,
            DisputeOp::SubmitVote => DisputeStatus::Arbitration,
            DisputeOp::Resolve => DisputeStatus::Resolved,
        };
        Ok(next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DisputeStatus::Resolved | DisputeStatus::Appealed)
    }
}
