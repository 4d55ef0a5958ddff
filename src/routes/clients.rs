use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::clients::ClientsQuery;
use crate::gateway::http::HttpGateway;
use crate::routes::{base_context, local_now, page_failure, render_template, run_blocking};
use crate::services::clients as clients_service;

#[get("/clientes")]
pub async fn show_clients(
    user: AuthenticatedUser,
    query: web::Query<ClientsQuery>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gateway = gateway.with_token(&user.token);
    let actor = user.clone();
    let query = query.into_inner();

    let result = run_blocking(move || {
        clients_service::load_clients_page(&gateway, &actor, &query, local_now().date())
    })
    .await;

    match result {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "clients");
            context.insert("clients", &data.clients);
            context.insert("search", data.search.as_deref().unwrap_or_default());
            context.insert("tier", &data.tier);
            context.insert("barber_id", &data.barber_id);
            context.insert("barbers", &data.barbers);
            context.insert("tier_counts", &data.tier_counts);
            render_template(&tera, "clients/index.html", &context)
        }
        Err(err) => page_failure(&tera, &err),
    }
}
