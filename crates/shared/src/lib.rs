//! Shared utilities for the space booking backend.
//!
//! - Password hashing with Argon2id and the registration password policy
//! - JWT issuing and validation
//! - Field validators used by request types

pub mod jwt;
pub mod password;
pub mod validation;
