//! Domain layer for the space booking backend.
//!
//! This crate contains:
//! - Domain models (Space, Resource, Reservation, Approval, Notification, Profile)
//! - The reservation conflict checker and approval state machine
//! - Notification message builders
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::BookingError;
