use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::cash::CashPageQuery;
use crate::forms::cash::AddMovementForm;
use crate::gateway::http::HttpGateway;
use crate::routes::{
    action_failure, base_context, local_now, page_failure, redirect, render_template,
    run_blocking,
};
use crate::services::cash as cash_service;

const CASH: &str = "/caja";

#[get("/caja")]
pub async fn show_cash(
    user: AuthenticatedUser,
    query: web::Query<CashPageQuery>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let query = query.into_inner();

    match run_blocking(move || cash_service::load_cash_page(&gateway, &actor, &query)).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "cash");
            context.insert("cash", &data);
            render_template(&tera, "cash/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}

#[post("/caja/movimientos")]
pub async fn add_movement(
    user: AuthenticatedUser,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<AddMovementForm>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);

    match run_blocking(move || cash_service::add_movement(&gateway, &user, form)).await {
        Ok(movement) => {
            FlashMessage::success(format!("{} registrado.", movement.kind.label())).send();
            redirect(CASH)
        }
        Err(err) => action_failure(&err, CASH),
    }
}

/// Downloads the filtered ledger as CSV.
#[get("/caja/exportar")]
pub async fn export_cash(
    user: AuthenticatedUser,
    query: web::Query<CashPageQuery>,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let query = query.into_inner();

    match run_blocking(move || cash_service::export_cash_csv(&gateway, &user, &query)).await {
        Ok(body) => {
            let filename = format!("caja-{}.csv", local_now().format("%Y%m%d-%H%M"));
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(body)
        }
        Err(err) => action_failure(&err, CASH),
    }
}
