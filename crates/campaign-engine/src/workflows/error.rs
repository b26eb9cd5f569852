use serde::Serialize;

use super::store::RepositoryError;

/// Reason codes reported with every conflict so callers know what to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    Duplicate,
    Full,
    Closed,
    StateConflict,
}

impl ConflictReason {
    pub const fn code(self) -> &'static str {
        match self {
            ConflictReason::Duplicate => "duplicate",
            ConflictReason::Full => "full",
            ConflictReason::Closed => "closed",
            ConflictReason::StateConflict => "state_conflict",
        }
    }
}

/// Input problems reported before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("review requires a blog url or at least one image")]
    MissingReviewEvidence,
    #[error("`{field}` must be an http(s) url")]
    InvalidUrl { field: &'static str },
    #[error("withdrawal amount {requested} is below the minimum of {minimum}")]
    AmountBelowMinimum { minimum: u64, requested: u64 },
    #[error("withdrawal amount {requested} exceeds available balance {available}")]
    AmountExceedsBalance { available: u64, requested: u64 },
    #[error("resident number must contain exactly 13 digits (found {digits})")]
    MalformedResidentNumber { digits: usize },
    #[error("privacy collection, tax reporting and withholding agreements are all required")]
    AgreementsIncomplete,
    #[error("bank account field `{field}` is missing or malformed")]
    InvalidBankAccount { field: &'static str },
    #[error("a non-blank reason is required")]
    MissingReason,
    #[error("`{value}` is not a YYYY-MM-DD date")]
    InvalidDate { value: String },
}

/// Request-scoped failure returned by every workflow operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} conflict: {detail}", .reason.code())]
    Conflict {
        reason: ConflictReason,
        detail: String,
    },
    #[error("dependency unavailable: {0}")]
    Dependency(String),
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error("actor is not permitted to perform this action")]
    Forbidden,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl WorkflowError {
    pub(crate) fn conflict(reason: ConflictReason, detail: impl Into<String>) -> Self {
        Self::Conflict {
            reason,
            detail: detail.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict_reason(&self) -> Option<ConflictReason> {
        match self {
            WorkflowError::Conflict { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl From<RepositoryError> for WorkflowError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Duplicate => Self::conflict(
                ConflictReason::Duplicate,
                "an active record already exists",
            ),
            RepositoryError::CapacityReached { max } => Self::conflict(
                ConflictReason::Full,
                format!("campaign already admitted {max} participants"),
            ),
            RepositoryError::StaleState { current } => Self::conflict(
                ConflictReason::StateConflict,
                format!("record is now `{current}`, refresh and retry"),
            ),
            RepositoryError::BalanceExceeded {
                available,
                requested,
            } => Self::Validation(ValidationError::AmountExceedsBalance {
                available,
                requested,
            }),
            other => Self::Repository(other),
        }
    }
}
