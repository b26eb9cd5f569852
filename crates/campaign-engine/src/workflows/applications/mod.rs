//! Application intake, admission and the lifecycle state machine.

pub mod admission;
pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use admission::{AdmissionGuard, AdmissionRejection};
pub use domain::{
    ApplicantProfile, ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationStatusView,
    ApplicationSubmission, SnsHandles, StatusChange,
};
pub use lifecycle::{available_transitions, next_status, Transition, TransitionError};
pub(crate) use lifecycle::StatusWriter;
pub use repository::{ApplicationFilter, ApplicationRepository, WriteCondition};
pub use router::application_router;
pub use service::{ApplicationService, FulfillmentMilestone};
