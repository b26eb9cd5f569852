//! Campaign participation workflows: admission, lifecycle, reviews, points and withdrawals.

pub mod actors;
pub mod applications;
pub mod campaigns;
pub mod clock;
pub mod error;
pub(crate) mod http;
pub mod notifications;
pub mod points;
pub mod reviews;
pub mod store;
pub mod withdrawals;

mod engine;
#[cfg(test)]
pub(crate) mod testing;

pub use engine::{engine_router, EngineServices, EngineStores};
pub use error::{ConflictReason, ValidationError, WorkflowError};
