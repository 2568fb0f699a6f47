//! Gym check-in service.
//!
//! Members check in at a gym when standing within 100 meters of it, at most once per calendar
//! day. Use cases are exposed as `tower::Service` implementations on
//! [`commands::DomainLogic`], which reaches storage and time through the traits in [`ports`].

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod factories;
pub mod ports;
pub mod telemetry;
