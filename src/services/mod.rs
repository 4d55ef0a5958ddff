//! Use cases behind each page. Services are generic over the gateway traits
//! they need, check the caller's role and turn form input into payloads.

use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::FormError;
use crate::gateway::errors::{
    FORBIDDEN_MESSAGE, GENERIC_FAILURE_MESSAGE, GatewayError, NOT_FOUND_MESSAGE,
};

pub mod agenda;
pub mod api;
pub mod auth;
pub mod booking;
pub mod business;
pub mod cash;
pub mod catalog;
pub mod clients;
pub mod main;
pub mod messages;
pub mod staff;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Gateway(GatewayError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => ServiceError::NotFound,
            other => ServiceError::Gateway(other),
        }
    }
}

impl ServiceError {
    /// Text for the flash message shown after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Unauthorized => FORBIDDEN_MESSAGE.to_string(),
            ServiceError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ServiceError::Form(message) | ServiceError::TypeConstraint(message) => message.clone(),
            ServiceError::Gateway(err) => err.user_message(),
            ServiceError::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// The backend no longer accepts the session token.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ServiceError::Gateway(GatewayError::Unauthorized))
    }
}

/// Logs the form problem and keeps its user-facing text.
pub(crate) fn form_error(err: FormError) -> ServiceError {
    log::error!("Failed to validate form: {err}");
    ServiceError::Form(err.user_message().to_string())
}

pub(crate) fn ensure_staff(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub(crate) fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
