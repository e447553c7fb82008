//! Gym Core - membership lifecycle and revenue realization
//!
//! This crate implements the membership state machine of a gym management
//! backend (enrollment, renewal, freezes, plan changes, lazy expiry) and the
//! engine that spreads billed amounts over their service periods for
//! accrual-basis revenue reports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
