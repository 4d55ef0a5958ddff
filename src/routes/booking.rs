//! Client-facing booking: slot picker, own appointments, cancel, reschedule
//! and online deposit.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::booking::BookingQuery;
use crate::forms::booking::{BookAppointmentForm, RescheduleForm};
use crate::forms::parse_date;
use crate::gateway::http::HttpGateway;
use crate::models::config::ServerConfig;
use crate::routes::{
    action_failure, base_context, gateway_for, local_now, page_failure, redirect,
    render_template, run_blocking,
};
use crate::services::booking as booking_service;

const MY_APPOINTMENTS: &str = "/turnos/mios";

#[get("/reservar")]
pub async fn show_booking(
    user: Option<AuthenticatedUser>,
    query: web::Query<BookingQuery>,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway_for(&gateway, user.as_ref());
    let step = server_config.slot_step_minutes;
    let query = query.into_inner();

    let result = run_blocking(move || {
        booking_service::load_booking_page(&gateway, &query, local_now(), step)
    })
    .await;

    match result {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "booking");
            context.insert("booking", &data);
            render_template(&tera, "booking/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/reservar")]
pub async fn book(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<BookAppointmentForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let back = match parse_date(&form.date) {
        Ok(date) => format!(
            "/reservar?service_id={}&barber_id={}&date={date}",
            form.service_id, form.barber_id
        ),
        Err(_) => "/reservar".to_string(),
    };

    let result = run_blocking(move || {
        booking_service::book_appointment(&gateway, &user, form, local_now())
    })
    .await;

    match result {
        Ok(appointment) => {
            FlashMessage::success(format!(
                "¡Listo! Reservaste {} el {} a las {}.",
                appointment.service.name,
                appointment.date().format("%d/%m"),
                appointment.time()
            ))
            .send();
            redirect(MY_APPOINTMENTS)
        }
        Err(err) => action_failure(&err, &back),
    }
}

#[get("/turnos/mios")]
pub async fn show_my_appointments(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || booking_service::load_my_appointments(&gateway, local_now())).await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "my_appointments");
            context.insert("upcoming", &data.upcoming);
            context.insert("history", &data.history);
            context.insert("deposit_percent", &data.deposit_percent);
            render_template(&tera, "booking/mine.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/turnos/{appointment_id}/cancelar")]
pub async fn cancel_appointment(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let appointment_id = appointment_id.into_inner();

    match run_blocking(move || {
        booking_service::cancel_appointment(&gateway, &user, appointment_id)
    })
    .await
    {
        Ok(_) => {
            FlashMessage::success("Turno cancelado.").send();
            redirect(MY_APPOINTMENTS)
        }
        Err(err) => action_failure(&err, MY_APPOINTMENTS),
    }
}

#[post("/turnos/{appointment_id}/reprogramar")]
pub async fn reschedule_appointment(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<RescheduleForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let appointment_id = appointment_id.into_inner();

    let result = run_blocking(move || {
        booking_service::reschedule_appointment(&gateway, &user, appointment_id, form, local_now())
    })
    .await;

    match result {
        Ok(appointment) => {
            FlashMessage::success(format!(
                "Turno reprogramado para el {} a las {}.",
                appointment.date().format("%d/%m"),
                appointment.time()
            ))
            .send();
            redirect(MY_APPOINTMENTS)
        }
        Err(err) => action_failure(&err, MY_APPOINTMENTS),
    }
}

/// Sends the browser to the payment provider to pay the seña.
#[post("/turnos/{appointment_id}/pagar")]
pub async fn pay_deposit(
    user: AuthenticatedUser,
    appointment_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let appointment_id = appointment_id.into_inner();

    match run_blocking(move || {
        booking_service::start_deposit_payment(&gateway, &user, appointment_id)
    })
    .await
    {
        Ok(payment) => redirect(&payment.url),
        Err(err) => action_failure(&err, MY_APPOINTMENTS),
    }
}
