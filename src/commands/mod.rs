use std::{fmt, sync::Arc};

use uuid::Uuid;

pub mod check_in;
pub mod create_gym;
pub mod fetch_nearby_gyms;
pub mod fetch_user_check_ins_history;
pub mod get_user_metrics;
pub mod search_gyms;
pub mod validate_check_in;

/// Entry point for every use case
///
/// Each request type has its own `tower::Service` implementation in a submodule.
pub struct DomainLogic<G, C, K> {
    gyms: Arc<G>,
    check_ins: Arc<C>,
    clock: Arc<K>,
}

impl<G, C, K> DomainLogic<G, C, K> {
    pub fn new(gyms: Arc<G>, check_ins: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            gyms,
            check_ins,
            clock,
        }
    }
}

impl<G, C, K> Clone for DomainLogic<G, C, K> {
    fn clone(&self) -> Self {
        Self {
            gyms: self.gyms.clone(),
            check_ins: self.check_ins.clone(),
            clock: self.clock.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("gyms port error: {0:?}")]
    Gyms(#[from] crate::ports::gyms::Error),
    #[error("check-ins port error: {0:?}")]
    CheckIns(#[from] crate::ports::check_ins::Error),

    #[error("{0} not found")]
    ResourceNotFound(Resource),
    /// The member is too far away from the gym
    #[error("max distance reached: {distance_km:.3} km from the gym")]
    MaxDistance { distance_km: f64 },
    /// The member already checked in on this calendar day
    #[error("max number of check-ins reached for the day")]
    MaxNumberOfCheckIns,
    #[error("check-in can only be validated within 20 minutes of its creation")]
    LateCheckInValidation,
    #[error("invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

/// Resource referenced by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Gym(Uuid),
    CheckIn(Uuid),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Gym(gym_id) => write!(f, "gym {gym_id}"),
            Resource::CheckIn(check_in_id) => write!(f, "check-in {check_in_id}"),
        }
    }
}
