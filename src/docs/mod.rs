//! API Documentation module
//!
//! Provides OpenAPI specification generation for the bridge API using utoipa.

mod openapi;

pub use openapi::ApiDoc;
