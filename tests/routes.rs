use actix_web::body::to_bytes;
use actix_web::http::{StatusCode, header};
use actix_web_flash_messages::Level;
use tera::Tera;

use barberia_web::gateway::errors::NOT_FOUND_MESSAGE;
use barberia_web::routes::{alert_level_to_str, page_failure, redirect, run_blocking};
use barberia_web::services::ServiceError;

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[test]
fn redirect_uses_see_other() {
    let response = redirect("/turnos/mios");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/turnos/mios"
    );
}

#[actix_web::test]
async fn missing_resource_renders_error_page() {
    let mut tera = Tera::default();
    tera.add_raw_template("errors/page.html", "<p>{{ message }}</p>")
        .unwrap();

    let response = page_failure(&tera, &ServiceError::NotFound);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body()).await.unwrap();
    assert_eq!(body, format!("<p>{NOT_FOUND_MESSAGE}</p>").as_bytes());
}

#[actix_web::test]
async fn blocking_tasks_return_their_result() {
    let value = run_blocking(|| Ok(21 * 2)).await.unwrap();
    assert_eq!(value, 42);

    let failure = run_blocking(|| Err::<(), _>(ServiceError::NotFound)).await;
    assert!(matches!(failure, Err(ServiceError::NotFound)));
}
