pub mod dispute;
pub mod engine;
pub mod evidence;
pub mod voting;

pub use dispute::{Dispute, Resolution};
pub use engine::{DisputeEngine, GENERAL_EVIDENCE_KIND};
pub use evidence::{EvidenceLog, EvidenceRecord};
pub use voting::{Vote, VotingLedger};
