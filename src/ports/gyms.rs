use uuid::Uuid;

use crate::domain::{Coordinate, Gym};

#[mockall::automock]
#[async_trait::async_trait]
pub trait GymsPort {
    async fn find_by_id(&self, gym_id: Uuid) -> Result<Option<Gym>, Error>;
    async fn create(&self, gym: Gym) -> Result<Gym, Error>;
    /// Gyms whose title contains `query`, one page at a time
    ///
    /// Pages start at 1.
    async fn search_many(&self, query: String, page: u32) -> Result<Vec<Gym>, Error>;
    async fn find_many_nearby(&self, origin: Coordinate, radius_km: f64)
        -> Result<Vec<Gym>, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trying to create a gym with an identifier that is already taken
    #[error("gym {0} already exists")]
    GymAlreadyExists(Uuid),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
