pub mod check_ins;
pub mod clock;
pub mod gyms;
