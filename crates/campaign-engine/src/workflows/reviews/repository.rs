use crate::workflows::applications::ApplicationId;
use crate::workflows::store::RepositoryError;

use super::domain::ReviewSubmission;

/// Review evidence store keyed by application. There is no delete.
pub trait ReviewRepository: Send + Sync {
    /// `Duplicate` when the application already has a submission.
    fn insert(&self, review: ReviewSubmission) -> Result<ReviewSubmission, RepositoryError>;

    fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ReviewSubmission>, RepositoryError>;

    /// Replaces the stored submission; `StaleState` when its revision is no longer
    /// `expected_revision`.
    fn update(
        &self,
        review: ReviewSubmission,
        expected_revision: u32,
    ) -> Result<ReviewSubmission, RepositoryError>;
}
