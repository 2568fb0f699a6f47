use uuid::Uuid;

use crate::domain::{CheckIn, DayWindow};

#[mockall::automock]
#[async_trait::async_trait]
pub trait CheckInsPort {
    async fn find_by_id(&self, check_in_id: Uuid) -> Result<Option<CheckIn>, Error>;
    /// Any check-in from the user created within the given day
    async fn find_by_user_id_on_date(
        &self,
        user_id: Uuid,
        day: DayWindow,
    ) -> Result<Option<CheckIn>, Error>;
    /// Check-ins from the user ordered by creation time, one page at a time
    ///
    /// Pages start at 1.
    async fn find_many_by_user_id(&self, user_id: Uuid, page: u32)
        -> Result<Vec<CheckIn>, Error>;
    async fn count_by_user_id(&self, user_id: Uuid) -> Result<u64, Error>;
    async fn create(&self, check_in: CheckIn) -> Result<CheckIn, Error>;
    /// Overwrite an existing check-in
    async fn save(&self, check_in: CheckIn) -> Result<CheckIn, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trying to save a check-in that was never created
    #[error("check-in {0} does not exist")]
    CheckInDoesNotExist(Uuid),

    /// Trying to create a check-in with an identifier that is already taken
    #[error("check-in {0} already exists")]
    CheckInAlreadyExists(Uuid),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
