//! Public landing page and the contact form.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::messages::ContactForm;
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, gateway_for, page_failure, redirect, render_template,
    run_blocking,
};
use crate::services::main as main_service;

#[get("/")]
pub async fn show_index(
    user: Option<AuthenticatedUser>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway_for(&gateway, user.as_ref());

    match run_blocking(move || main_service::load_index_page(&gateway)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("business", &data.business);
            context.insert("services", &data.services);
            context.insert("barbers", &data.barbers);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/contacto")]
pub async fn send_contact(
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    let gateway = gateway.get_ref().clone();

    match run_blocking(move || main_service::send_contact_message(&gateway, form)).await {
        Ok(()) => {
            FlashMessage::success("¡Gracias! Te respondemos a la brevedad.").send();
            redirect("/#contacto")
        }
        Err(err) => action_failure(&err, "/#contacto"),
    }
}
