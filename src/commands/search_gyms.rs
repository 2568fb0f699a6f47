use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::Gym, ports::gyms::GymsPort};
use tower::Service;

use super::{DomainLogic, Error};

pub struct SearchGymsRequest {
    /// Text looked up in gym titles, ignoring case
    pub query: String,
    /// One-based page number
    pub page: u32,
}

#[derive(Debug, PartialEq)]
pub struct SearchGymsResponse {
    pub gyms: Vec<Gym>,
}

impl<G, C, K> Service<SearchGymsRequest> for DomainLogic<G, C, K>
where
    G: GymsPort + 'static,
    C: 'static,
    K: 'static,
{
    type Response = SearchGymsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SearchGymsRequest) -> Self::Future {
        let gyms = self.gyms.clone();
        Box::pin(async move {
            let gyms = gyms.search_many(req.query, req.page.max(1)).await?;

            Ok(SearchGymsResponse { gyms })
        })
    }
}
