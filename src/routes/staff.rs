//! Admin management of barbers, their weekly schedules and photos.

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::staff::{BarberForm, ScheduleForm, UploadImageForm};
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, page_failure, redirect, render_template, run_blocking,
};
use crate::services::{ServiceError, staff as staff_service};

const STAFF: &str = "/admin/barberos";

#[get("/admin/barberos")]
pub async fn show_staff(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();

    match run_blocking(move || staff_service::load_staff_page(&gateway, &actor)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "staff");
            context.insert("barbers", &data.barbers);
            render_template(&tera, "staff/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/admin/barberos")]
pub async fn add_barber(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<BarberForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || staff_service::create_barber(&gateway, &user, form)).await {
        Ok(barber) => {
            FlashMessage::success(format!("{} se sumó al equipo.", barber.name)).send();
            redirect(STAFF)
        }
        Err(err) => action_failure(&err, STAFF),
    }
}

#[post("/admin/barberos/{barber_id}")]
pub async fn save_barber(
    user: AuthenticatedUser,
    barber_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<BarberForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let barber_id = barber_id.into_inner();

    match run_blocking(move || staff_service::update_barber(&gateway, &user, barber_id, form))
        .await
    {
        Ok(_) => {
            FlashMessage::success("Barbero actualizado.").send();
            redirect(STAFF)
        }
        Err(err) => action_failure(&err, STAFF),
    }
}

#[post("/admin/barberos/{barber_id}/eliminar")]
pub async fn remove_barber(
    user: AuthenticatedUser,
    barber_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let barber_id = barber_id.into_inner();

    match run_blocking(move || staff_service::delete_barber(&gateway, &user, barber_id)).await {
        Ok(()) => {
            FlashMessage::success("Barbero eliminado.").send();
            redirect(STAFF)
        }
        Err(err) => action_failure(&err, STAFF),
    }
}

#[get("/admin/barberos/{barber_id}/horarios")]
pub async fn show_schedule(
    user: AuthenticatedUser,
    barber_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let barber_id = barber_id.into_inner();

    match run_blocking(move || staff_service::load_schedule_page(&gateway, &actor, barber_id))
        .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "staff");
            context.insert("schedule", &data);
            render_template(&tera, "staff/schedule.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

/// Replaces the whole weekly schedule. Rows arrive as repeated
/// `weekday`/`start`/`end` keys.
#[post("/admin/barberos/{barber_id}/horarios")]
pub async fn save_schedule(
    user: AuthenticatedUser,
    barber_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    form: web::Bytes,
) -> impl Responder {
    let barber_id = barber_id.into_inner();
    let back = format!("{STAFF}/{barber_id}/horarios");

    let form: ScheduleForm = match serde_html_form::from_bytes(&form) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to decode schedule form: {err}");
            return action_failure(
                &ServiceError::Form("Revisá los horarios cargados.".to_string()),
                &back,
            );
        }
    };
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || staff_service::save_schedule(&gateway, &user, barber_id, &form))
        .await
    {
        Ok(ranges) => {
            FlashMessage::success(format!("Horario guardado ({} franjas).", ranges.len())).send();
            redirect(&back)
        }
        Err(err) => action_failure(&err, &back),
    }
}

#[post("/admin/barberos/{barber_id}/foto")]
pub async fn upload_photo(
    user: AuthenticatedUser,
    barber_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let barber_id = barber_id.into_inner();

    match run_blocking(move || {
        staff_service::upload_barber_photo(&gateway, &user, barber_id, form)
    })
    .await
    {
        Ok(barber) => {
            FlashMessage::success(format!("Foto de {} actualizada.", barber.name)).send();
            redirect(STAFF)
        }
        Err(err) => action_failure(&err, STAFF),
    }
}
