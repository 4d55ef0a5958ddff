//! HTTP handlers and the helpers they share.
//!
//! Handlers stay thin: they pick the gateway for the caller, run the service
//! on the blocking pool and turn the outcome into a page, a redirect with a
//! flash message, or JSON.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::{Local, NaiveDateTime};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::gateway::errors::{FORBIDDEN_MESSAGE, SESSION_EXPIRED_MESSAGE};
use crate::gateway::http::HttpGateway;
use crate::middleware::LOGIN_PATH;
use crate::models::auth::CurrentUser;
use crate::services::{ServiceError, ServiceResult};

pub mod agenda;
pub mod api;
pub mod auth;
pub mod booking;
pub mod cash;
pub mod catalog;
pub mod clients;
pub mod main;
pub mod messages;
pub mod settings;
pub mod staff;

/// Maps flash levels to the Bootstrap alert classes used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    render_template_with_status(tera, template, context, StatusCode::OK)
}

pub fn render_template_with_status(
    tera: &Tera,
    template: &str,
    context: &Context,
    status: StatusCode,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context every page starts from: alerts, the session user and the active
/// navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    if let Some(user) = user {
        context.insert("current_user", &CurrentUser::from(user));
    }
    context
}

/// Gateway carrying the caller's bearer token, if any.
pub fn gateway_for(gateway: &HttpGateway, user: Option<&AuthenticatedUser>) -> HttpGateway {
    match user {
        Some(user) => gateway.with_token(&user.token),
        None => gateway.clone(),
    }
}

/// Wall clock of the shop. Appointment times are naive local times.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Runs a service call on the blocking thread pool.
pub async fn run_blocking<F, T>(task: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(task).await.unwrap_or_else(|err| {
        log::error!("Blocking task failed: {err}");
        Err(ServiceError::Internal(err.to_string()))
    })
}

/// Flashes the failure of a form action and redirects.
///
/// An expired backend session goes to the login form and a missing role to
/// the home page; anything else returns to `fallback`.
pub fn action_failure(err: &ServiceError, fallback: &str) -> HttpResponse {
    if err.is_session_expired() {
        FlashMessage::warning(SESSION_EXPIRED_MESSAGE).send();
        return redirect(LOGIN_PATH);
    }
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error(FORBIDDEN_MESSAGE).send();
            redirect("/")
        }
        _ => {
            FlashMessage::error(err.user_message()).send();
            redirect(fallback)
        }
    }
}

/// Response for a page that could not be loaded.
pub fn page_failure(tera: &Tera, err: &ServiceError) -> HttpResponse {
    if err.is_session_expired() {
        FlashMessage::warning(SESSION_EXPIRED_MESSAGE).send();
        return redirect(LOGIN_PATH);
    }

    let status = match err {
        ServiceError::Unauthorized => {
            FlashMessage::error(FORBIDDEN_MESSAGE).send();
            return redirect("/");
        }
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
        ServiceError::Gateway(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::error!("Failed to load page: {err}");

    let mut context = Context::new();
    context.insert("message", &err.user_message());
    render_template_with_status(tera, "errors/page.html", &context, status)
}
