use crate::domain::auth::AuthenticatedUser;
use crate::domain::catalog::{ServiceDraft, ServiceItem};
use crate::domain::types::ServiceId;
use crate::dto::staff::ServicesPageData;
use crate::forms::catalog::ServiceForm;
use crate::gateway::{ServiceCatalogReader, ServiceCatalogWriter};
use crate::services::{ServiceResult, ensure_admin, form_error};

/// Every service, inactive ones included, ordered by name.
pub fn load_services_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
) -> ServiceResult<ServicesPageData>
where
    G: ServiceCatalogReader + ?Sized,
{
    ensure_admin(user)?;

    let mut services = gateway.list_services().map_err(|err| {
        log::error!("Failed to list services: {err}");
        err
    })?;
    services.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(ServicesPageData { services })
}

pub fn create_service<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: ServiceForm,
) -> ServiceResult<ServiceItem>
where
    G: ServiceCatalogWriter + ?Sized,
{
    ensure_admin(user)?;
    let draft = ServiceDraft::try_from(form).map_err(form_error)?;

    gateway.create_service(&draft).map_err(|err| {
        log::error!("Failed to create service {}: {err}", draft.name.as_str());
        err.into()
    })
}

pub fn update_service<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    service_id: i32,
    form: ServiceForm,
) -> ServiceResult<ServiceItem>
where
    G: ServiceCatalogWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = ServiceId::new(service_id)?;
    let draft = ServiceDraft::try_from(form).map_err(form_error)?;

    gateway.update_service(id, &draft).map_err(|err| {
        log::error!("Failed to update service {id}: {err}");
        err.into()
    })
}

pub fn delete_service<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    service_id: i32,
) -> ServiceResult<()>
where
    G: ServiceCatalogWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = ServiceId::new(service_id)?;

    gateway.delete_service(id).map_err(|err| {
        log::error!("Failed to delete service {id}: {err}");
        err.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::Role;
    use crate::gateway::errors::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;
    use crate::services::test_support::user;

    fn form(name: &str, price: f64) -> ServiceForm {
        ServiceForm {
            name: name.into(),
            price,
            duration_minutes: 30,
            description: String::new(),
            active: Some("on".into()),
        }
    }

    #[test]
    fn admin_creates_service() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_service()
            .withf(|draft| draft.name.as_str() == "Corte" && draft.price.get() == 8000.0)
            .returning(|draft| {
                Ok(ServiceItem {
                    id: ServiceId::new(9).unwrap(),
                    name: draft.name.as_str().to_string(),
                    price: draft.price.get(),
                    duration_minutes: draft.duration_minutes,
                    description: None,
                    active: draft.active,
                })
            });

        let created = create_service(&gateway, &user(Role::Admin), form("Corte", 8000.0)).unwrap();

        assert_eq!(created.id.get(), 9);
    }

    #[test]
    fn negative_price_is_a_form_error() {
        let mut gateway = MockGateway::new();
        gateway.expect_create_service().never();

        assert!(matches!(
            create_service(&gateway, &user(Role::Admin), form("Corte", -1.0)),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn deleting_missing_service_is_not_found() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_delete_service()
            .returning(|_| Err(GatewayError::NotFound));

        assert!(matches!(
            delete_service(&gateway, &user(Role::Admin), 3),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn barbers_cannot_edit_catalog() {
        let gateway = MockGateway::new();
        assert!(matches!(
            update_service(&gateway, &user(Role::Barber), 1, form("Corte", 1.0)),
            Err(ServiceError::Unauthorized)
        ));
    }
}
