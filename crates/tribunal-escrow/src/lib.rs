pub mod ledger;
pub mod settlement;
pub mod storage;

pub use ledger::EscrowLedger;
pub use settlement::Settlement;
pub use storage::{EscrowStorage, MemoryStorage, TransferRecord};
