//! Error conversion glue between the domain layer and the server layers.
//!
//! The domain layer must not depend on service or form error types, so the
//! conversions live here and only compile with the `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for FormError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::NonPositiveId => FormError::InvalidId,
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
            TypeConstraintError::InvalidTime(_) => FormError::InvalidTime,
            TypeConstraintError::InvalidAmount => FormError::InvalidAmount,
            TypeConstraintError::InvalidValue(message) => FormError::InvalidValue(message),
        }
    }
}
