pub(super) use crate::workflows::testing::*;

use crate::workflows::applications::ApplicationId;
use crate::workflows::reviews::{ReviewRepository, ReviewSubmission};
use crate::workflows::store::RepositoryError;

/// Review store that is reachable for reads but refuses every write.
pub(super) struct ReadOnlyReviews;

impl ReviewRepository for ReadOnlyReviews {
    fn insert(&self, _review: ReviewSubmission) -> Result<ReviewSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("review store read only".to_string()))
    }

    fn find_by_application(
        &self,
        _application_id: &ApplicationId,
    ) -> Result<Option<ReviewSubmission>, RepositoryError> {
        Ok(None)
    }

    fn update(
        &self,
        _review: ReviewSubmission,
        _expected_revision: u32,
    ) -> Result<ReviewSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("review store read only".to_string()))
    }
}
