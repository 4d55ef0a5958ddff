//! Business settings and the public gallery.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::business::{BusinessSettings, UpdateBusiness};
use crate::domain::types::{Email, ImageUrl, PersonName, PhoneNumber};
use crate::dto::staff::SettingsPageData;
use crate::forms::business::BusinessForm;
use crate::forms::staff::UploadImageForm;
use crate::gateway::{BusinessReader, BusinessWriter, UploadGateway};
use crate::services::{ServiceError, ServiceResult, ensure_admin, form_error};

/// Current settings with a different gallery, ready to be saved.
fn with_gallery(current: &BusinessSettings, gallery: &[String]) -> ServiceResult<UpdateBusiness> {
    Ok(UpdateBusiness {
        name: PersonName::new(current.name.as_str())?,
        address: current.address.clone(),
        phone: current
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()?,
        email: current.email.as_deref().map(Email::new).transpose()?,
        instagram: current.instagram.clone(),
        opening_time: current.opening_time,
        closing_time: current.closing_time,
        deposit_percent: current.deposit_percent,
        gallery: gallery
            .iter()
            .map(|url| ImageUrl::new(url.as_str()))
            .collect::<Result<Vec<_>, _>>()?,
    })
}

pub fn load_settings_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
) -> ServiceResult<SettingsPageData>
where
    G: BusinessReader + ?Sized,
{
    ensure_admin(user)?;

    let business = gateway.get_business().map_err(|err| {
        log::error!("Failed to load business settings: {err}");
        err
    })?;

    Ok(SettingsPageData { business })
}

pub fn update_business<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: BusinessForm,
) -> ServiceResult<BusinessSettings>
where
    G: BusinessReader + BusinessWriter + ?Sized,
{
    ensure_admin(user)?;

    let current = gateway.get_business()?;
    let update = form.into_update(&current.gallery).map_err(form_error)?;

    gateway.update_business(&update).map_err(|err| {
        log::error!("Failed to update business settings: {err}");
        err.into()
    })
}

/// Uploads an image and appends it to the gallery.
pub fn add_gallery_image<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: UploadImageForm,
) -> ServiceResult<BusinessSettings>
where
    G: BusinessReader + BusinessWriter + UploadGateway + ?Sized,
{
    ensure_admin(user)?;
    let upload = form.into_upload().map_err(form_error)?;

    let current = gateway.get_business()?;
    let url = gateway.upload_image(&upload).map_err(|err| {
        log::error!("Failed to upload gallery image: {err}");
        err
    })?;

    let mut gallery = current.gallery.clone();
    gallery.push(url);

    gateway
        .update_business(&with_gallery(&current, &gallery)?)
        .map_err(|err| {
            log::error!("Failed to save gallery: {err}");
            err.into()
        })
}

/// Drops the image from the gallery and then from storage.
pub fn remove_gallery_image<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    url: &str,
) -> ServiceResult<BusinessSettings>
where
    G: BusinessReader + BusinessWriter + UploadGateway + ?Sized,
{
    ensure_admin(user)?;

    let current = gateway.get_business()?;
    if !current.gallery.iter().any(|image| image == url) {
        return Err(ServiceError::NotFound);
    }
    let gallery: Vec<String> = current
        .gallery
        .iter()
        .filter(|image| image.as_str() != url)
        .cloned()
        .collect();

    let saved = gateway.update_business(&with_gallery(&current, &gallery)?)?;

    if let Err(err) = gateway.delete_image(url) {
        log::warn!("Failed to delete gallery image {url}: {err}");
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::Role;
    use crate::domain::types::TimeOfDay;
    use crate::gateway::mock::MockGateway;
    use crate::services::test_support::user;

    fn settings(gallery: &[&str]) -> BusinessSettings {
        BusinessSettings {
            name: "La Barbería".into(),
            address: Some("Av. Siempreviva 742".into()),
            phone: None,
            email: Some("hola@labarberia.com".into()),
            instagram: Some("labarberia".into()),
            opening_time: TimeOfDay::from_hm(9, 0).unwrap(),
            closing_time: TimeOfDay::from_hm(20, 0).unwrap(),
            deposit_percent: 20,
            gallery: gallery.iter().map(|url| url.to_string()).collect(),
        }
    }

    #[test]
    fn removing_gallery_image_saves_then_deletes_file() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_business().returning(|| {
            Ok(settings(&[
                "https://cdn.example.com/a.jpg",
                "https://cdn.example.com/b.jpg",
            ]))
        });
        gateway
            .expect_update_business()
            .withf(|update| {
                update.gallery.len() == 1
                    && update.gallery[0].as_str() == "https://cdn.example.com/b.jpg"
            })
            .times(1)
            .returning(|_| Ok(settings(&["https://cdn.example.com/b.jpg"])));
        gateway
            .expect_delete_image()
            .withf(|url| url == "https://cdn.example.com/a.jpg")
            .times(1)
            .returning(|_| Ok(()));

        let saved = remove_gallery_image(
            &gateway,
            &user(Role::Admin),
            "https://cdn.example.com/a.jpg",
        )
        .unwrap();

        assert_eq!(saved.gallery.len(), 1);
    }

    #[test]
    fn unknown_gallery_image_is_not_found() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get_business()
            .returning(|| Ok(settings(&[])));
        gateway.expect_update_business().never();

        assert!(matches!(
            remove_gallery_image(&gateway, &user(Role::Admin), "https://cdn.example.com/x.jpg"),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn settings_update_keeps_gallery() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get_business()
            .returning(|| Ok(settings(&["https://cdn.example.com/a.jpg"])));
        gateway
            .expect_update_business()
            .withf(|update| update.gallery.len() == 1 && update.deposit_percent == 50)
            .returning(|_| Ok(settings(&["https://cdn.example.com/a.jpg"])));

        let form = BusinessForm {
            name: "La Barbería".into(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            instagram: String::new(),
            opening_time: "10:00".into(),
            closing_time: "19:00".into(),
            deposit_percent: 50,
        };

        assert!(update_business(&gateway, &user(Role::Admin), form).is_ok());
    }

    #[test]
    fn clients_cannot_open_settings() {
        let gateway = MockGateway::new();
        assert!(matches!(
            load_settings_page(&gateway, &user(Role::Client)),
            Err(ServiceError::Unauthorized)
        ));
    }
}
