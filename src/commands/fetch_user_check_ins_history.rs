use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::CheckIn, ports::check_ins::CheckInsPort};
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

pub struct FetchUserCheckInsHistoryRequest {
    pub user_id: Uuid,
    /// One-based page number
    pub page: u32,
}

#[derive(Debug, PartialEq)]
pub struct FetchUserCheckInsHistoryResponse {
    pub check_ins: Vec<CheckIn>,
}

impl<G, C, K> Service<FetchUserCheckInsHistoryRequest> for DomainLogic<G, C, K>
where
    G: 'static,
    C: CheckInsPort + 'static,
    K: 'static,
{
    type Response = FetchUserCheckInsHistoryResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: FetchUserCheckInsHistoryRequest) -> Self::Future {
        let check_ins = self.check_ins.clone();
        Box::pin(async move {
            let check_ins = check_ins
                .find_many_by_user_id(req.user_id, req.page.max(1))
                .await?;

            Ok(FetchUserCheckInsHistoryResponse { check_ins })
        })
    }
}
