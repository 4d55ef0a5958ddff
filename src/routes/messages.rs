use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::messages::ReplyForm;
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, page_failure, redirect, render_template, run_blocking,
};
use crate::services::messages as messages_service;

const INBOX: &str = "/admin/mensajes";

#[get("/admin/mensajes")]
pub async fn show_inbox(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();

    match run_blocking(move || messages_service::load_inbox_page(&gateway, &actor)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "messages");
            context.insert("threads", &data.threads);
            context.insert("unread", &data.unread);
            context.insert("awaiting_reply", &data.awaiting_reply);
            render_template(&tera, "messages/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[get("/admin/mensajes/{message_id}")]
pub async fn show_thread(
    user: AuthenticatedUser,
    message_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let message_id = message_id.into_inner();

    match run_blocking(move || messages_service::load_thread_page(&gateway, &actor, message_id))
        .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "messages");
            context.insert("thread", &data.thread);
            render_template(&tera, "messages/thread.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/admin/mensajes/{message_id}/responder")]
pub async fn reply(
    user: AuthenticatedUser,
    message_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ReplyForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let message_id = message_id.into_inner();
    let thread = format!("{INBOX}/{message_id}");

    match run_blocking(move || {
        messages_service::reply_message(&gateway, &user, message_id, form)
    })
    .await
    {
        Ok(_) => {
            FlashMessage::success("Respuesta enviada.").send();
            redirect(&thread)
        }
        Err(err) => action_failure(&err, &thread),
    }
}

#[post("/admin/mensajes/{message_id}/eliminar")]
pub async fn remove_message(
    user: AuthenticatedUser,
    message_id: web::Path<i32>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let message_id = message_id.into_inner();

    match run_blocking(move || messages_service::delete_message(&gateway, &user, message_id))
        .await
    {
        Ok(()) => {
            FlashMessage::success("Mensaje eliminado.").send();
            redirect(INBOX)
        }
        Err(err) => action_failure(&err, INBOX),
    }
}
