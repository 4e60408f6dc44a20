//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
