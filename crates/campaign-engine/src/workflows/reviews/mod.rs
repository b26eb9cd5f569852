//! Review evidence submission, resubmission after rejection, and staff review decisions.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ReviewContent, ReviewDraft, ReviewId, ReviewStatus, ReviewSubmission};
pub use repository::ReviewRepository;
pub use router::review_router;
pub use service::{ReviewOutcome, ReviewReceipt, ReviewService};
