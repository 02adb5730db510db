//! EduSP platform integration module
//!
//! Provides the two-stage login client and its data models.

pub mod client;
pub mod models;

pub use client::{AuthError, EduspAuthClient};
pub use models::*;
