use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{CheckIn, Coordinate, MAX_DISTANCE_KM},
    ports::{check_ins::CheckInsPort, clock::ClockPort, gyms::GymsPort},
};
use tower::Service;
use tracing::Instrument;
use uuid::Uuid;

use super::{DomainLogic, Error, Resource};

pub struct CheckInRequest {
    pub gym_id: Uuid,
    pub user_id: Uuid,
    /// Current position of the member, in decimal degrees
    ///
    /// This is expected to be validated by the caller.
    pub user_latitude: f64,
    pub user_longitude: f64,
}

#[derive(Debug, PartialEq)]
pub struct CheckInResponse {
    pub check_in: CheckIn,
}

impl<G, C, K> Service<CheckInRequest> for DomainLogic<G, C, K>
where
    G: GymsPort + 'static,
    C: CheckInsPort + 'static,
    K: ClockPort + 'static,
{
    type Response = CheckInResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CheckInRequest) -> Self::Future {
        let gyms = self.gyms.clone();
        let check_ins = self.check_ins.clone();
        let clock = self.clock.clone();
        let span = tracing::info_span!("check_in", gym_id = %req.gym_id, user_id = %req.user_id);
        Box::pin(
            async move {
                let gym = gyms
                    .find_by_id(req.gym_id)
                    .await?
                    .ok_or(Error::ResourceNotFound(Resource::Gym(req.gym_id)))?;

                // Geofence, also rejecting a distance that could not be computed
                let user = Coordinate::new(req.user_latitude, req.user_longitude);
                let distance_km = user.distance_to(&gym.coordinate());
                if distance_km.is_nan() || distance_km > MAX_DISTANCE_KM {
                    tracing::debug!(distance_km, "member too far from the gym");
                    return Err(Error::MaxDistance { distance_km });
                }

                // One check-in per calendar day
                let now = clock.now();
                let same_day = check_ins
                    .find_by_user_id_on_date(req.user_id, clock.day_window(now))
                    .await?;
                if let Some(existing) = same_day {
                    tracing::debug!(
                        existing_check_in_id = %existing.check_in_id,
                        "member already checked in today"
                    );
                    return Err(Error::MaxNumberOfCheckIns);
                }

                let check_in = check_ins
                    .create(CheckIn::new(
                        req.user_id,
                        gym.gym_id,
                        now,
                    ))
                    .await?;
                tracing::info!(check_in_id = %check_in.check_in_id, "check-in created");

                Ok(CheckInResponse { check_in })
            }
            .instrument(span),
        )
    }
}
