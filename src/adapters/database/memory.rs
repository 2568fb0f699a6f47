use crate::{
    domain::{page_offset, CheckIn, Coordinate, DayWindow, Gym, PAGE_SIZE},
    ports::{
        check_ins::{self, CheckInsPort},
        gyms::{self, GymsPort},
    },
};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// In-memory storage for gyms and check-ins
///
/// Listings are paginated in the same order as the PostgreSQL adapter: gyms by title then id,
/// check-ins by creation time.
#[derive(Clone, Debug)]
pub struct MemoryDatabase {
    gyms: Arc<Mutex<Vec<Gym>>>,
    check_ins: Arc<Mutex<Vec<CheckIn>>>,
}

#[async_trait::async_trait]
impl GymsPort for MemoryDatabase {
    async fn find_by_id(&self, gym_id: Uuid) -> Result<Option<Gym>, gyms::Error> {
        let gym = self
            .gyms
            .lock()?
            .iter()
            .find(|gym| gym.gym_id == gym_id)
            .cloned();

        Ok(gym)
    }

    async fn create(&self, gym: Gym) -> Result<Gym, gyms::Error> {
        let mut stored = self.gyms.lock()?;
        if stored.iter().any(|existing| existing.gym_id == gym.gym_id) {
            return Err(gyms::Error::GymAlreadyExists(gym.gym_id));
        }
        stored.push(gym.clone());

        Ok(gym)
    }

    async fn search_many(&self, query: String, page: u32) -> Result<Vec<Gym>, gyms::Error> {
        let query = query.to_lowercase();
        let mut found: Vec<Gym> = self
            .gyms
            .lock()?
            .iter()
            .filter(|gym| gym.title.to_lowercase().contains(&query))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.title.cmp(&b.title).then(a.gym_id.cmp(&b.gym_id)));

        Ok(found
            .into_iter()
            .skip(page_offset(page))
            .take(PAGE_SIZE)
            .collect())
    }

    async fn find_many_nearby(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Gym>, gyms::Error> {
        let gyms = self
            .gyms
            .lock()?
            .iter()
            .filter(|gym| origin.distance_to(&gym.coordinate()) <= radius_km)
            .cloned()
            .collect();

        Ok(gyms)
    }
}

#[async_trait::async_trait]
impl CheckInsPort for MemoryDatabase {
    async fn find_by_id(&self, check_in_id: Uuid) -> Result<Option<CheckIn>, check_ins::Error> {
        let check_in = self
            .check_ins
            .lock()?
            .iter()
            .find(|check_in| check_in.check_in_id == check_in_id)
            .cloned();

        Ok(check_in)
    }

    async fn find_by_user_id_on_date(
        &self,
        user_id: Uuid,
        day: DayWindow,
    ) -> Result<Option<CheckIn>, check_ins::Error> {
        let check_in = self
            .check_ins
            .lock()?
            .iter()
            .find(|check_in| check_in.user_id == user_id && day.contains(check_in.created_at))
            .cloned();

        Ok(check_in)
    }

    async fn find_many_by_user_id(
        &self,
        user_id: Uuid,
        page: u32,
    ) -> Result<Vec<CheckIn>, check_ins::Error> {
        let mut found: Vec<CheckIn> = self
            .check_ins
            .lock()?
            .iter()
            .filter(|check_in| check_in.user_id == user_id)
            .cloned()
            .collect();
        // Same order as the PostgreSQL adapter: creation time, then id
        found.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.check_in_id.cmp(&b.check_in_id))
        });

        Ok(found
            .into_iter()
            .skip(page_offset(page))
            .take(PAGE_SIZE)
            .collect())
    }

    async fn count_by_user_id(&self, user_id: Uuid) -> Result<u64, check_ins::Error> {
        let count = self
            .check_ins
            .lock()?
            .iter()
            .filter(|check_in| check_in.user_id == user_id)
            .count();

        Ok(count as u64)
    }

    async fn create(&self, check_in: CheckIn) -> Result<CheckIn, check_ins::Error> {
        let mut stored = self.check_ins.lock()?;
        if stored
            .iter()
            .any(|existing| existing.check_in_id == check_in.check_in_id)
        {
            return Err(check_ins::Error::CheckInAlreadyExists(check_in.check_in_id));
        }
        stored.push(check_in.clone());

        Ok(check_in)
    }

    async fn save(&self, check_in: CheckIn) -> Result<CheckIn, check_ins::Error> {
        let mut stored = self.check_ins.lock()?;
        let existing = stored
            .iter_mut()
            .find(|existing| existing.check_in_id == check_in.check_in_id)
            .ok_or(check_ins::Error::CheckInDoesNotExist(check_in.check_in_id))?;
        *existing = check_in.clone();

        Ok(check_in)
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            gyms: Arc::new(Mutex::new(Vec::new())),
            check_ins: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for gyms::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

impl<T> From<PoisonError<T>> for check_ins::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
