//! Web front end of a barbershop: public booking, client self-service and
//! the staff back office, backed by the shop's REST API.

pub mod domain;
pub mod pagination;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod gateway;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::gateway::http::HttpGateway;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::routes::agenda::{
        add_block, cancel_from_agenda, checkout, remove_block, show_agenda, show_checkout,
    };
    use crate::routes::api::{
        api_v1_dismiss_reminder, api_v1_reminders, api_v1_slots, api_v1_snooze_reminder,
    };
    use crate::routes::auth::{
        login, logout, recover, register, show_login, show_recover, show_register,
    };
    use crate::routes::booking::{
        book, cancel_appointment, pay_deposit, reschedule_appointment, show_booking,
        show_my_appointments,
    };
    use crate::routes::cash::{add_movement, export_cash, show_cash};
    use crate::routes::catalog::{add_service, remove_service, save_service, show_services};
    use crate::routes::clients::show_clients;
    use crate::routes::main::{send_contact, show_index};
    use crate::routes::messages::{remove_message, reply, show_inbox, show_thread};
    use crate::routes::settings::{
        add_gallery_image, remove_gallery_image, save_settings, show_settings,
    };
    use crate::routes::staff::{
        add_barber, remove_barber, save_barber, save_schedule, show_schedule, show_staff,
        upload_photo,
    };

    /// Builds and runs the Actix-Web HTTP server.
    ///
    /// `gateway` must be built before the runtime starts because the blocking
    /// HTTP client cannot be created inside it.
    pub async fn run(server_config: ServerConfig, gateway: HttpGateway) -> std::io::Result<()> {
        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;
        let cookie_domain = Some(server_config.domain.clone())
            .filter(|domain| !domain.is_empty() && domain != "localhost");

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving on {}:{} against {}",
            server_config.address,
            server_config.port,
            server_config.api_base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(cookie_domain.clone())
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("/api")
                        .service(api_v1_slots)
                        .service(api_v1_reminders)
                        .service(api_v1_snooze_reminder)
                        .service(api_v1_dismiss_reminder),
                )
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_index)
                        .service(send_contact)
                        .service(show_login)
                        .service(login)
                        .service(show_register)
                        .service(register)
                        .service(show_recover)
                        .service(recover)
                        .service(logout)
                        .service(show_booking)
                        .service(book)
                        .service(show_my_appointments)
                        .service(cancel_appointment)
                        .service(reschedule_appointment)
                        .service(pay_deposit)
                        .service(show_agenda)
                        .service(add_block)
                        .service(remove_block)
                        .service(cancel_from_agenda)
                        .service(show_checkout)
                        .service(checkout)
                        .service(show_cash)
                        .service(add_movement)
                        .service(export_cash)
                        .service(show_clients)
                        .service(show_staff)
                        .service(add_barber)
                        .service(show_schedule)
                        .service(save_schedule)
                        .service(upload_photo)
                        .service(save_barber)
                        .service(remove_barber)
                        .service(show_services)
                        .service(add_service)
                        .service(save_service)
                        .service(remove_service)
                        .service(show_settings)
                        .service(save_settings)
                        .service(add_gallery_image)
                        .service(remove_gallery_image)
                        .service(show_inbox)
                        .service(show_thread)
                        .service(reply)
                        .service(remove_message),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(gateway.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
