//! Session user extraction from the identity cookie.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::domain::auth::{AuthenticatedUser, Role};

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(user_from_request(req))
    }
}

fn user_from_request(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let payload = identity
        .id()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;

    serde_json::from_str(&payload).map_err(|err| {
        log::warn!("Discarding malformed session user: {err}");
        ErrorUnauthorized("invalid session")
    })
}

/// Stores the user in the identity cookie.
pub fn sign_in(req: &HttpRequest, user: &AuthenticatedUser) -> Result<Identity, Error> {
    let payload = serde_json::to_string(user).map_err(actix_web::error::ErrorInternalServerError)?;
    Identity::login(&req.extensions(), payload).map_err(actix_web::error::ErrorInternalServerError)
}

/// What templates get to know about the session user. The backend token
/// never reaches the rendered page.
#[derive(Debug, Serialize)]
pub struct CurrentUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: Role,
    pub is_staff: bool,
    pub is_admin: bool,
}

impl<'a> From<&'a AuthenticatedUser> for CurrentUser<'a> {
    fn from(user: &'a AuthenticatedUser) -> Self {
        Self {
            name: &user.name,
            email: &user.email,
            role: user.role,
            is_staff: user.is_staff(),
            is_admin: user.is_admin(),
        }
    }
}
