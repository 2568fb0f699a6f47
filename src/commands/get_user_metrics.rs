use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::ports::check_ins::CheckInsPort;
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

pub struct GetUserMetricsRequest {
    pub user_id: Uuid,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GetUserMetricsResponse {
    /// Number of check-ins ever recorded for the member
    pub check_ins_count: u64,
}

impl<G, C, K> Service<GetUserMetricsRequest> for DomainLogic<G, C, K>
where
    G: 'static,
    C: CheckInsPort + 'static,
    K: 'static,
{
    type Response = GetUserMetricsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: GetUserMetricsRequest) -> Self::Future {
        let check_ins = self.check_ins.clone();
        Box::pin(async move {
            let check_ins_count = check_ins.count_by_user_id(req.user_id).await?;

            Ok(GetUserMetricsResponse { check_ins_count })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::clock::SystemClock,
        ports::{check_ins::MockCheckInsPort, gyms::MockGymsPort},
    };
    use mockall::predicate::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[tokio::test]
    async fn test_get_user_metrics() -> Result<(), BoxError> {
        // GIVEN a check-ins port holding two check-ins for the member
        let user_id = Uuid::new_v4();
        let mut check_ins = MockCheckInsPort::new();
        check_ins
            .expect_count_by_user_id()
            .times(1)
            .with(eq(user_id))
            .returning(|_| Ok(2));
        let domain = DomainLogic::new(
            Arc::new(MockGymsPort::new()),
            Arc::new(check_ins),
            Arc::new(SystemClock),
        );

        // WHEN fetching the metrics
        let res = domain
            .clone()
            .oneshot(GetUserMetricsRequest { user_id })
            .await;

        // THEN the count is returned as-is
        assert_that!(res).is_ok().is_equal_to(GetUserMetricsResponse { check_ins_count: 2 });
        Arc::into_inner(domain.check_ins).unwrap().checkpoint();

        Ok(())
    }
}
