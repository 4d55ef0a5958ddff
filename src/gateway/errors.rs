use thiserror::Error;

/// Failure of a call to the booking backend, categorized by HTTP status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("session expired or missing")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("request rejected: {0}")]
    BadRequest(String),

    #[error("backend error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub const SLOT_TAKEN_MESSAGE: &str = "Ese horario ya fue reservado.";
pub const INVALID_SCHEDULE_MESSAGE: &str = "El horario seleccionado no es válido.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Tu sesión expiró. Iniciá sesión de nuevo.";
pub const FORBIDDEN_MESSAGE: &str = "No tenés permisos para realizar esta acción.";
pub const NOT_FOUND_MESSAGE: &str = "No encontramos lo que buscabas.";
pub const GENERIC_FAILURE_MESSAGE: &str = "No pudimos completar la operación. Intentá de nuevo.";

impl GatewayError {
    /// Builds the error for a non-success status and the optional `message`
    /// field of the backend error payload.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match status {
            401 => GatewayError::Unauthorized,
            403 => GatewayError::Forbidden,
            404 => GatewayError::NotFound,
            409 => GatewayError::Conflict(message),
            400 | 422 => GatewayError::BadRequest(message),
            _ => GatewayError::Server { status, message },
        }
    }

    /// Text shown to the user in a flash message.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Conflict(_) => SLOT_TAKEN_MESSAGE.to_string(),
            GatewayError::BadRequest(message) if !message.trim().is_empty() => message.clone(),
            GatewayError::BadRequest(_) => INVALID_SCHEDULE_MESSAGE.to_string(),
            GatewayError::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            GatewayError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            GatewayError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            GatewayError::Server { .. } | GatewayError::Transport(_) | GatewayError::Decode(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        assert_eq!(GatewayError::from_status(401, None), GatewayError::Unauthorized);
        assert_eq!(GatewayError::from_status(404, None), GatewayError::NotFound);
        assert_eq!(
            GatewayError::from_status(409, Some("ocupado".into())),
            GatewayError::Conflict("ocupado".into())
        );
        assert_eq!(
            GatewayError::from_status(422, None),
            GatewayError::BadRequest(String::new())
        );
        assert_eq!(
            GatewayError::from_status(503, Some("down".into())),
            GatewayError::Server {
                status: 503,
                message: "down".into()
            }
        );
    }

    #[test]
    fn user_messages_follow_status() {
        assert_eq!(
            GatewayError::Conflict("duplicate".into()).user_message(),
            SLOT_TAKEN_MESSAGE
        );
        assert_eq!(
            GatewayError::BadRequest(String::new()).user_message(),
            INVALID_SCHEDULE_MESSAGE
        );
        assert_eq!(
            GatewayError::BadRequest("Fecha fuera de rango".into()).user_message(),
            "Fecha fuera de rango"
        );
        assert_eq!(
            GatewayError::Transport("timeout".into()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }
}
