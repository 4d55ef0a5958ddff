//! JSON endpoints polled by the booking page and the staff reminder widget.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::SlotsQuery;
use crate::gateway::errors::SESSION_EXPIRED_MESSAGE;
use crate::gateway::http::HttpGateway;
use crate::models::config::ServerConfig;
use crate::routes::agenda::{load_reminder_book, store_reminder_book};
use crate::routes::{gateway_for, local_now, run_blocking};
use crate::services::{ServiceError, agenda as agenda_service, api as api_service};

/// JSON body for a failed call. Status codes let the scripts tell an
/// expired session from a plain failure.
fn json_failure(err: &ServiceError) -> HttpResponse {
    if err.is_session_expired() {
        return HttpResponse::Unauthorized().json(json!({ "error": SESSION_EXPIRED_MESSAGE }));
    }
    let mut response = match err {
        ServiceError::Unauthorized => HttpResponse::Forbidden(),
        ServiceError::NotFound => HttpResponse::NotFound(),
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => HttpResponse::BadRequest(),
        ServiceError::Gateway(_) | ServiceError::Internal(_) => {
            log::error!("API call failed: {err}");
            HttpResponse::BadGateway()
        }
    };
    response.json(json!({ "error": err.user_message() }))
}

#[get("/v1/slots")]
pub async fn api_v1_slots(
    user: Option<AuthenticatedUser>,
    query: web::Query<SlotsQuery>,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let gateway = gateway_for(&gateway, user.as_ref());
    let step = server_config.slot_step_minutes;
    let query = query.into_inner();

    match run_blocking(move || api_service::list_slots(&gateway, &query, local_now(), step)).await
    {
        Ok(slots) => HttpResponse::Ok().json(slots),
        Err(err) => json_failure(&err),
    }
}

/// Checkout prompts for appointments that should have ended by now.
#[get("/v1/reminders")]
pub async fn api_v1_reminders(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    session: Session,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let policy = server_config.reminders.policy();
    let mut book = load_reminder_book(&session);

    let result = run_blocking(move || {
        let feed = agenda_service::poll_reminders(&gateway, &user, &mut book, local_now(), &policy);
        feed.map(|feed| (feed, book))
    })
    .await;

    match result {
        Ok((feed, book)) => {
            store_reminder_book(&session, &book);
            HttpResponse::Ok().json(feed)
        }
        Err(err) => json_failure(&err),
    }
}

#[post("/v1/reminders/{appointment_id}/snooze")]
pub async fn api_v1_snooze_reminder(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    server_config: web::Data<ServerConfig>,
    session: Session,
) -> impl Responder {
    let mut book = load_reminder_book(&session);
    let policy = server_config.reminders.policy();

    match agenda_service::snooze_reminder(
        &user,
        &mut book,
        appointment_id.into_inner(),
        local_now(),
        &policy,
    ) {
        Ok(()) => {
            store_reminder_book(&session, &book);
            HttpResponse::NoContent().finish()
        }
        Err(err) => json_failure(&err),
    }
}

#[post("/v1/reminders/{appointment_id}/dismiss")]
pub async fn api_v1_dismiss_reminder(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    session: Session,
) -> impl Responder {
    let mut book = load_reminder_book(&session);

    match agenda_service::dismiss_reminder(&user, &mut book, appointment_id.into_inner()) {
        Ok(()) => {
            store_reminder_book(&session, &book);
            HttpResponse::NoContent().finish()
        }
        Err(err) => json_failure(&err),
    }
}
