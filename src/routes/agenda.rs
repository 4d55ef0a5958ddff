//! Staff agenda, schedule blocks and checkout.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::reminder::ReminderBook;
use crate::dto::agenda::AgendaQuery;
use crate::forms::agenda::{AddBlockForm, CheckoutForm};
use crate::gateway::http::HttpGateway;
use crate::models::config::ServerConfig;
use crate::routes::{
    action_failure, base_context, local_now, page_failure, redirect, render_template,
    run_blocking,
};
use crate::services::{ServiceError, agenda as agenda_service, booking as booking_service};

const AGENDA: &str = "/agenda";
const REMINDER_BOOK_KEY: &str = "reminder_book";

/// Reminder state of this browser session.
pub(crate) fn load_reminder_book(session: &Session) -> ReminderBook {
    session
        .get::<ReminderBook>(REMINDER_BOOK_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Discarding unreadable reminder book: {err}");
            None
        })
        .unwrap_or_default()
}

pub(crate) fn store_reminder_book(session: &Session, book: &ReminderBook) {
    if let Err(err) = session.insert(REMINDER_BOOK_KEY, book) {
        log::error!("Failed to store reminder book: {err}");
    }
}

#[get("/agenda")]
pub async fn show_agenda(
    user: AuthenticatedUser,
    query: web::Query<AgendaQuery>,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let step = server_config.slot_step_minutes;
    let poll_interval = server_config.reminders.poll_interval_secs;

    let result = run_blocking(move || {
        agenda_service::load_agenda_page(
            &gateway,
            &actor,
            &query.into_inner(),
            local_now().date(),
            step,
        )
    })
    .await;

    match result {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "agenda");
            context.insert("agenda", &data);
            context.insert("reminder_poll_secs", &poll_interval);
            render_template(&tera, "agenda/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/agenda/bloqueos")]
pub async fn add_block(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<AddBlockForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || agenda_service::create_block(&gateway, &user, form)).await {
        Ok(block) => {
            FlashMessage::success("Horario bloqueado.").send();
            redirect(&format!("{AGENDA}?date={}", block.starts_at.date()))
        }
        Err(err) => action_failure(&err, AGENDA),
    }
}

#[post("/agenda/bloqueos/{block_id}/eliminar")]
pub async fn remove_block(
    user: AuthenticatedUser,
    block_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let block_id = block_id.into_inner();

    match run_blocking(move || agenda_service::delete_block(&gateway, &user, block_id)).await {
        Ok(()) => {
            FlashMessage::success("Bloqueo eliminado.").send();
            redirect(AGENDA)
        }
        Err(err) => action_failure(&err, AGENDA),
    }
}

#[post("/agenda/turnos/{appointment_id}/cancelar")]
pub async fn cancel_from_agenda(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    if !user.is_staff() {
        return action_failure(&ServiceError::Unauthorized, AGENDA);
    }
    let gateway = gateway.with_token(&user.token);
    let appointment_id = appointment_id.into_inner();

    match run_blocking(move || {
        booking_service::cancel_appointment(&gateway, &user, appointment_id)
    })
    .await
    {
        Ok(appointment) => {
            FlashMessage::success("Turno cancelado.").send();
            redirect(&format!("{AGENDA}?date={}", appointment.date()))
        }
        Err(err) => action_failure(&err, AGENDA),
    }
}

#[get("/agenda/turnos/{appointment_id}/cobrar")]
pub async fn show_checkout(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let appointment_id = appointment_id.into_inner();

    match run_blocking(move || {
        agenda_service::load_checkout_page(&gateway, &actor, appointment_id)
    })
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "agenda");
            context.insert("checkout", &data);
            render_template(&tera, "agenda/checkout.html", &context)
        }
        Err(err @ ServiceError::Form(_)) => action_failure(&err, AGENDA),
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/agenda/turnos/{appointment_id}/cobrar")]
pub async fn checkout(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    session: Session,
    web::Form(form): web::Form<CheckoutForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let appointment_id = appointment_id.into_inner();
    let mut book = load_reminder_book(&session);

    let result = run_blocking(move || {
        let outcome =
            agenda_service::checkout_appointment(&gateway, &user, appointment_id, form, &mut book);
        outcome.map(|appointment| (appointment, book))
    })
    .await;

    match result {
        Ok((appointment, book)) => {
            store_reminder_book(&session, &book);
            FlashMessage::success(format!(
                "Cobro registrado para {}.",
                appointment
                    .client
                    .as_ref()
                    .map_or("el turno", |client| client.name.as_str())
            ))
            .send();
            redirect(&format!("{AGENDA}?date={}", appointment.date()))
        }
        Err(err) => action_failure(&err, &format!("/agenda/turnos/{appointment_id}/cobrar")),
    }
}
