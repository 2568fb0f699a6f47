use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::CheckIn,
    ports::{check_ins::CheckInsPort, clock::ClockPort},
};
use tower::Service;
use tracing::Instrument;
use uuid::Uuid;

use super::{DomainLogic, Error, Resource};

pub struct ValidateCheckInRequest {
    pub check_in_id: Uuid,
}

#[derive(Debug, PartialEq)]
pub struct ValidateCheckInResponse {
    pub check_in: CheckIn,
}

impl<G, C, K> Service<ValidateCheckInRequest> for DomainLogic<G, C, K>
where
    G: 'static,
    C: CheckInsPort + 'static,
    K: ClockPort + 'static,
{
    type Response = ValidateCheckInResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ValidateCheckInRequest) -> Self::Future {
        let check_ins = self.check_ins.clone();
        let clock = self.clock.clone();
        let span = tracing::info_span!("validate_check_in", check_in_id = %req.check_in_id);
        Box::pin(
            async move {
                let mut check_in = check_ins
                    .find_by_id(req.check_in_id)
                    .await?
                    .ok_or(Error::ResourceNotFound(Resource::CheckIn(req.check_in_id)))?;

                let now = clock.now();
                if !check_in.is_validation_window_open(now) {
                    tracing::debug!(created_at = %check_in.created_at, "validation window closed");
                    return Err(Error::LateCheckInValidation);
                }

                check_in.validated_at = Some(now);
                let check_in = check_ins.save(check_in).await?;
                tracing::info!("check-in validated");

                Ok(ValidateCheckInResponse { check_in })
            }
            .instrument(span),
        )
    }
}
