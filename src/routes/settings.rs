//! Admin business settings and the public gallery.

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::business::BusinessForm;
use crate::forms::staff::UploadImageForm;
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, page_failure, redirect, render_template, run_blocking,
};
use crate::services::business as business_service;

const SETTINGS: &str = "/admin/negocio";

#[derive(Deserialize)]
pub struct GalleryImageForm {
    url: String,
}

#[get("/admin/negocio")]
pub async fn show_settings(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();

    match run_blocking(move || business_service::load_settings_page(&gateway, &actor)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "settings");
            context.insert("business", &data.business);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/admin/negocio")]
pub async fn save_settings(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<BusinessForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || business_service::update_business(&gateway, &user, form)).await {
        Ok(_) => {
            FlashMessage::success("Datos del negocio guardados.").send();
            redirect(SETTINGS)
        }
        Err(err) => action_failure(&err, SETTINGS),
    }
}

#[post("/admin/negocio/galeria")]
pub async fn add_gallery_image(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || business_service::add_gallery_image(&gateway, &user, form)).await {
        Ok(_) => {
            FlashMessage::success("Imagen agregada a la galería.").send();
            redirect(SETTINGS)
        }
        Err(err) => action_failure(&err, SETTINGS),
    }
}

#[post("/admin/negocio/galeria/eliminar")]
pub async fn remove_gallery_image(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<GalleryImageForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || {
        business_service::remove_gallery_image(&gateway, &user, &form.url)
    })
    .await
    {
        Ok(_) => {
            FlashMessage::success("Imagen eliminada de la galería.").send();
            redirect(SETTINGS)
        }
        Err(err) => action_failure(&err, SETTINGS),
    }
}
