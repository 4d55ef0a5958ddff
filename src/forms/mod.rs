//! Form definitions backing the booking and back-office routes.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TimeOfDay;

pub mod agenda;
pub mod auth;
pub mod booking;
pub mod business;
pub mod cash;
pub mod catalog;
pub mod messages;
pub mod staff;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid identifier")]
    InvalidId,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid time")]
    InvalidTime,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid payment method")]
    InvalidPaymentMethod,

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl FormError {
    /// Spanish text shown in the flash message.
    pub fn user_message(&self) -> &'static str {
        match self {
            FormError::Validation(_) => "Revisá los datos del formulario.",
            FormError::InvalidEmail => "El email no es válido.",
            FormError::InvalidName => "El nombre no puede estar vacío.",
            FormError::InvalidPhoneNumber => "El teléfono no es válido.",
            FormError::InvalidUrl => "La URL no es válida.",
            FormError::InvalidId => "Elemento inválido.",
            FormError::InvalidDate => "La fecha no es válida.",
            FormError::InvalidTime => "La hora no es válida.",
            FormError::InvalidAmount => "El monto debe ser mayor a cero.",
            FormError::InvalidPaymentMethod => "Elegí un medio de pago.",
            FormError::InvalidSchedule(_) => "El horario seleccionado no es válido.",
            FormError::InvalidValue(_) => "Revisá los datos del formulario.",
        }
    }
}

/// Parses an `<input type="date">` value.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Parses an `<input type="datetime-local">` value.
pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime, FormError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| FormError::InvalidDate)
}

/// Combines separate date and `HH:MM` inputs.
pub(crate) fn parse_date_and_time(date: &str, time: &str) -> Result<NaiveDateTime, FormError> {
    let date = parse_date(date)?;
    let time: TimeOfDay = time.parse().map_err(|_| FormError::InvalidTime)?;
    Ok(date.and_time(time.to_naive_time()))
}

/// Empty inputs become `None`.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Checkbox inputs are present only when ticked.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1"))
}
