//! Store-level error contract and the in-process store implementation.

mod memory;

pub use memory::{MemoryCampaignDirectory, MemoryStore};

/// Failures raised by store implementations, including conditional-write rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("an active record already exists for this key")]
    Duplicate,
    #[error("capacity of {max} admitted applications reached")]
    CapacityReached { max: u32 },
    #[error("record changed concurrently (current status `{current}`)")]
    StaleState { current: String },
    #[error("requested {requested} exceeds available balance {available}")]
    BalanceExceeded { available: u64, requested: u64 },
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
