use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Coordinate, Gym, NEARBY_GYMS_RADIUS_KM},
    ports::gyms::GymsPort,
};
use tower::Service;

use super::{DomainLogic, Error};

pub struct FetchNearbyGymsRequest {
    pub user_latitude: f64,
    pub user_longitude: f64,
}

#[derive(Debug, PartialEq)]
pub struct FetchNearbyGymsResponse {
    pub gyms: Vec<Gym>,
}

impl<G, C, K> Service<FetchNearbyGymsRequest> for DomainLogic<G, C, K>
where
    G: GymsPort + 'static,
    C: 'static,
    K: 'static,
{
    type Response = FetchNearbyGymsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: FetchNearbyGymsRequest) -> Self::Future {
        let gyms = self.gyms.clone();
        Box::pin(async move {
            let origin = Coordinate::new(req.user_latitude, req.user_longitude);
            let gyms = gyms
                .find_many_nearby(origin, NEARBY_GYMS_RADIUS_KM)
                .await?;

            Ok(FetchNearbyGymsResponse { gyms })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{clock::SystemClock, database::memory::MemoryDatabase};
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};
    use uuid::Uuid;

    fn gym(title: &str, latitude: f64, longitude: f64) -> Gym {
        Gym {
            gym_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            phone: None,
            latitude,
            longitude,
        }
    }

    #[tokio::test]
    async fn test_fetch_nearby_gyms() -> Result<(), BoxError> {
        // GIVEN a gym a few kilometers away and one in another state
        let database = MemoryDatabase::default();
        let near = gym("Near Gym", -16.2967057, -48.909269);
        GymsPort::create(&database, near.clone()).await?;
        GymsPort::create(&database, gym("Far Gym", -27.0610928, -49.5229501)).await?;
        let domain = DomainLogic::new(
            Arc::new(database.clone()),
            Arc::new(database),
            Arc::new(SystemClock),
        );

        // WHEN looking for gyms around the member
        let res = domain
            .oneshot(FetchNearbyGymsRequest {
                user_latitude: -16.2846479,
                user_longitude: -48.9589726,
            })
            .await;

        // THEN only the gym within 10 km is returned
        assert_that!(res)
            .is_ok()
            .is_equal_to(FetchNearbyGymsResponse { gyms: vec![near] });

        Ok(())
    }
}
