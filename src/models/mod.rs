//! Request-level models: configuration and the session user extractor.

pub mod auth;
pub mod config;
