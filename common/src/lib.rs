//! Shared building blocks for the Orbit workbench service.
//!
//! Contains the data models (schema catalog, query results, session
//! bundles), the application error type, the unified API response
//! envelope, configuration loading and common middleware.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
