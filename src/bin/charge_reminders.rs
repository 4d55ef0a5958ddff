//! Background worker logging appointments that ended without being charged.
//!
//! Signs in with the staff account from `reminders.email`/`reminders.password`
//! and polls the confirmed appointments due today with the same rules as the
//! agenda widget, so the shop gets a trail even when nobody has the agenda open.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use dotenvy::dotenv;

use barberia_web::domain::auth::AuthenticatedUser;
use barberia_web::domain::reminder::{ReminderBook, ReminderPolicy};
use barberia_web::forms::auth::LoginForm;
use barberia_web::gateway::cache::QueryCache;
use barberia_web::gateway::http::HttpGateway;
use barberia_web::models::config::{ReminderConfig, load_server_config};
use barberia_web::services::{ServiceResult, agenda, auth};

fn sign_in(gateway: &HttpGateway, config: &ReminderConfig) -> ServiceResult<AuthenticatedUser> {
    let form = LoginForm {
        email: config.email.clone().unwrap_or_default(),
        password: config.password.clone().unwrap_or_default(),
    };
    let user = auth::login(gateway, form)?;
    log::info!("Signed in as {} ({})", user.name, user.email);
    Ok(user)
}

fn poll_once(
    gateway: &HttpGateway,
    user: &AuthenticatedUser,
    book: &mut ReminderBook,
    policy: &ReminderPolicy,
) -> ServiceResult<()> {
    let now = Local::now().naive_local();
    let feed = agenda::poll_reminders(&gateway.with_token(&user.token), user, book, now, policy)?;

    for item in feed.visible.iter().filter(|item| feed.new.contains(&item.appointment_id)) {
        log::warn!(
            "Appointment {} of {} ({}, {}) started at {} and is still unpaid: {:.2} pending",
            item.appointment_id,
            item.client,
            item.service,
            item.barber.as_deref().unwrap_or("sin barbero"),
            item.starts_at.format("%H:%M"),
            item.outstanding
        );
    }
    log::debug!("{} appointment(s) awaiting checkout", feed.visible.len());
    Ok(())
}

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_server_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Failed to load server config: {err}");
            std::process::exit(1);
        }
    };
    let reminders = server_config.reminders.clone();
    if reminders.email.is_none() || reminders.password.is_none() {
        log::error!("Set reminders.email and reminders.password to run the worker");
        std::process::exit(1);
    }

    let gateway = match HttpGateway::new(
        &server_config.api_base_url,
        server_config.request_timeout_secs,
        Arc::new(QueryCache::disabled()),
    ) {
        Ok(gateway) => gateway,
        Err(err) => {
            log::error!("Failed to build API client: {err}");
            std::process::exit(1);
        }
    };

    let policy = reminders.policy();
    let interval = Duration::from_secs(reminders.poll_interval_secs.max(1));
    let mut book = ReminderBook::new();
    let mut user: Option<AuthenticatedUser> = None;

    log::info!("Polling for unpaid appointments every {}s", interval.as_secs());

    loop {
        if user.is_none() {
            match sign_in(&gateway, &reminders) {
                Ok(signed_in) => user = Some(signed_in),
                Err(err) => log::error!("Failed to sign in: {err}"),
            }
        }

        if let Some(current) = &user {
            if !current.is_staff() {
                log::error!("The reminders account must belong to staff");
                std::process::exit(1);
            }
            if let Err(err) = poll_once(&gateway, current, &mut book, &policy) {
                if err.is_session_expired() {
                    log::warn!("Session expired, signing in again");
                    user = None;
                } else {
                    log::error!("Failed to poll reminders: {err}");
                }
            }
        }

        thread::sleep(interval);
    }
}
