use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::catalog::ServiceForm;
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, page_failure, redirect, render_template, run_blocking,
};
use crate::services::catalog as catalog_service;

const SERVICES: &str = "/admin/servicios";

#[get("/admin/servicios")]
pub async fn show_services(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();

    match run_blocking(move || catalog_service::load_services_page(&gateway, &actor)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "services");
            context.insert("services", &data.services);
            render_template(&tera, "services/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/admin/servicios")]
pub async fn add_service(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ServiceForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || catalog_service::create_service(&gateway, &user, form)).await {
        Ok(service) => {
            FlashMessage::success(format!("Servicio \"{}\" creado.", service.name)).send();
            redirect(SERVICES)
        }
        Err(err) => action_failure(&err, SERVICES),
    }
}

#[post("/admin/servicios/{service_id}")]
pub async fn save_service(
    user: AuthenticatedUser,
    service_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ServiceForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let service_id = service_id.into_inner();

    match run_blocking(move || {
        catalog_service::update_service(&gateway, &user, service_id, form)
    })
    .await
    {
        Ok(_) => {
            FlashMessage::success("Servicio actualizado.").send();
            redirect(SERVICES)
        }
        Err(err) => action_failure(&err, SERVICES),
    }
}

#[post("/admin/servicios/{service_id}/eliminar")]
pub async fn remove_service(
    user: AuthenticatedUser,
    service_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let service_id = service_id.into_inner();

    match run_blocking(move || catalog_service::delete_service(&gateway, &user, service_id)).await
    {
        Ok(()) => {
            FlashMessage::success("Servicio eliminado.").send();
            redirect(SERVICES)
        }
        Err(err) => action_failure(&err, SERVICES),
    }
}
