//! Login, registration, password recovery and logout.

use actix_identity::Identity;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{LoginForm, RecoverForm, RegisterForm};
use crate::gateway::http::HttpGateway;
use crate::models::auth::sign_in;
use crate::routes::{action_failure, base_context, redirect, render_template, run_blocking};
use crate::services::auth as auth_service;

/// Shows the login form. A stale identity left by an expired backend
/// session is dropped here.
#[get("/auth/login")]
pub async fn show_login(
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let gateway = gateway.get_ref().clone();

    match run_blocking(move || auth_service::login(&gateway, form)).await {
        Ok(user) => {
            if let Err(err) = sign_in(&request, &user) {
                log::error!("Failed to store session for user {}: {err}", user.id);
                FlashMessage::error("No pudimos iniciar la sesión.").send();
                return redirect("/auth/login");
            }
            log::info!("User {} signed in", user.id);
            FlashMessage::success(format!("¡Hola, {}!", user.name)).send();
            if user.is_staff() {
                redirect("/agenda")
            } else {
                redirect("/turnos/mios")
            }
        }
        Err(err) => action_failure(&err, "/auth/login"),
    }
}

#[get("/auth/register")]
pub async fn show_register(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/auth/register")]
pub async fn register(
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let gateway = gateway.get_ref().clone();

    match run_blocking(move || auth_service::register(&gateway, form)).await {
        Ok(()) => {
            FlashMessage::success("Cuenta creada. Ya podés iniciar sesión.").send();
            redirect("/auth/login")
        }
        Err(err) => action_failure(&err, "/auth/register"),
    }
}

#[get("/auth/recover")]
pub async fn show_recover(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "recover");
    render_template(&tera, "auth/recover.html", &context)
}

#[post("/auth/recover")]
pub async fn recover(
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<RecoverForm>,
) -> impl Responder {
    let gateway = gateway.get_ref().clone();

    match run_blocking(move || auth_service::recover_password(&gateway, form)).await {
        Ok(()) => {
            FlashMessage::info("Si el email está registrado, te enviamos un enlace para recuperar la contraseña.").send();
            redirect("/auth/login")
        }
        Err(err) => action_failure(&err, "/auth/recover"),
    }
}

#[post("/auth/logout")]
pub async fn logout(identity: Identity) -> impl Responder {
    identity.logout();
    redirect("/")
}
