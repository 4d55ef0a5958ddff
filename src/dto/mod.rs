//! DTO modules that bridge services with templates and APIs.

pub mod agenda;
pub mod api;
pub mod booking;
pub mod cash;
pub mod clients;
pub mod main;
pub mod messages;
pub mod staff;

/// Reads an optional query value, treating blanks and garbage as absent.
pub(crate) fn parse_param<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}
