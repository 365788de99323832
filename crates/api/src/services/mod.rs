//! Application services.

pub mod auth;
pub mod booking;
pub mod report;
pub mod staff_bootstrap;
