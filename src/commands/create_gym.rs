use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Coordinate, Gym},
    ports::gyms::GymsPort,
};
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

pub struct CreateGymRequest {
    pub title: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, PartialEq)]
pub struct CreateGymResponse {
    pub gym: Gym,
}

impl<G, C, K> Service<CreateGymRequest> for DomainLogic<G, C, K>
where
    G: GymsPort + 'static,
    C: 'static,
    K: 'static,
{
    type Response = CreateGymResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CreateGymRequest) -> Self::Future {
        let gyms = self.gyms.clone();
        Box::pin(async move {
            if !Coordinate::new(req.latitude, req.longitude).is_valid() {
                return Err(Error::InvalidCoordinate {
                    latitude: req.latitude,
                    longitude: req.longitude,
                });
            }

            let gym = gyms
                .create(Gym {
                    gym_id: Uuid::new_v4(),
                    title: req.title,
                    description: req.description,
                    phone: req.phone,
                    latitude: req.latitude,
                    longitude: req.longitude,
                })
                .await?;
            tracing::info!(gym_id = %gym.gym_id, title = %gym.title, "gym created");

            Ok(CreateGymResponse { gym })
        })
    }
}
