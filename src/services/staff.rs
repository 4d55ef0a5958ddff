//! Staff administration: profiles, photos and weekly schedules.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::barber::{Barber, NewBarber, ScheduleRange, UpdateBarber, WeekdayIndex};
use crate::domain::types::{BarberId, Email, ImageUrl, PersonName, PhoneNumber};
use crate::dto::staff::{SchedulePageData, StaffPageData, WeekdayOption};
use crate::forms::staff::{BarberForm, ScheduleForm, UploadImageForm};
use crate::gateway::{BarberReader, BarberWriter, UploadGateway};
use crate::services::{ServiceResult, ensure_admin, form_error};

pub fn load_staff_page<G>(gateway: &G, user: &AuthenticatedUser) -> ServiceResult<StaffPageData>
where
    G: BarberReader + ?Sized,
{
    ensure_admin(user)?;

    let mut barbers = gateway.list_barbers().map_err(|err| {
        log::error!("Failed to list barbers: {err}");
        err
    })?;
    barbers.sort_by(|a, b| b.active.cmp(&a.active).then_with(|| a.name.cmp(&b.name)));

    Ok(StaffPageData { barbers })
}

pub fn create_barber<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: BarberForm,
) -> ServiceResult<Barber>
where
    G: BarberWriter + ?Sized,
{
    ensure_admin(user)?;
    let barber = NewBarber::try_from(form).map_err(form_error)?;

    gateway.create_barber(&barber).map_err(|err| {
        log::error!("Failed to create barber: {err}");
        err.into()
    })
}

pub fn update_barber<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    barber_id: i32,
    form: BarberForm,
) -> ServiceResult<Barber>
where
    G: BarberWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = BarberId::new(barber_id)?;
    let barber = UpdateBarber::try_from(form).map_err(form_error)?;

    gateway.update_barber(id, &barber).map_err(|err| {
        log::error!("Failed to update barber {id}: {err}");
        err.into()
    })
}

pub fn delete_barber<G>(gateway: &G, user: &AuthenticatedUser, barber_id: i32) -> ServiceResult<()>
where
    G: BarberWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = BarberId::new(barber_id)?;

    gateway.delete_barber(id).map_err(|err| {
        log::error!("Failed to delete barber {id}: {err}");
        err.into()
    })
}

fn weekday_options() -> Vec<WeekdayOption> {
    (0..7u8)
        .filter_map(|value| WeekdayIndex::new(value).ok())
        .map(|weekday| WeekdayOption {
            value: weekday.get(),
            label: weekday.label(),
        })
        .collect()
}

pub fn load_schedule_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    barber_id: i32,
) -> ServiceResult<SchedulePageData>
where
    G: BarberReader + ?Sized,
{
    ensure_admin(user)?;
    let id = BarberId::new(barber_id)?;

    let barber = gateway.get_barber(id)?;
    let mut ranges = gateway.get_barber_schedule(id)?;
    ranges.sort_by_key(|range| (range.weekday, range.start));

    Ok(SchedulePageData {
        barber,
        ranges,
        weekdays: weekday_options(),
    })
}

/// Replaces the whole weekly schedule of the barber.
pub fn save_schedule<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    barber_id: i32,
    form: &ScheduleForm,
) -> ServiceResult<Vec<ScheduleRange>>
where
    G: BarberWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = BarberId::new(barber_id)?;
    let ranges = form.ranges().map_err(form_error)?;

    gateway.save_barber_schedule(id, &ranges).map_err(|err| {
        log::error!("Failed to save schedule of barber {id}: {err}");
        err.into()
    })
}

/// Uploads a new profile photo and drops the previous one.
pub fn upload_barber_photo<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    barber_id: i32,
    form: UploadImageForm,
) -> ServiceResult<Barber>
where
    G: BarberReader + BarberWriter + UploadGateway + ?Sized,
{
    ensure_admin(user)?;
    let id = BarberId::new(barber_id)?;
    let upload = form.into_upload().map_err(form_error)?;

    let current = gateway.get_barber(id)?;
    let url = gateway.upload_image(&upload).map_err(|err| {
        log::error!("Failed to upload photo of barber {id}: {err}");
        err
    })?;

    let update = UpdateBarber {
        name: PersonName::new(current.name.as_str())?,
        email: Email::new(current.email.as_str())?,
        phone: current
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()?,
        photo_url: Some(ImageUrl::new(url.as_str())?),
        active: current.active,
    };
    let barber = gateway.update_barber(id, &update)?;

    if let Some(previous) = current.photo_url.filter(|previous| *previous != url) {
        if let Err(err) = gateway.delete_image(&previous) {
            log::warn!("Failed to delete previous photo {previous}: {err}");
        }
    }

    Ok(barber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::Role;
    use crate::domain::types::TimeOfDay;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;
    use crate::services::test_support::user;

    fn barber(id: i32, name: &str, active: bool) -> Barber {
        Barber {
            id: BarberId::new(id).unwrap(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            photo_url: None,
            active,
        }
    }

    #[test]
    fn barbers_cannot_manage_staff() {
        let mut gateway = MockGateway::new();
        gateway.expect_list_barbers().never();

        assert!(matches!(
            load_staff_page(&gateway, &user(Role::Barber)),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn staff_page_lists_active_first() {
        let mut gateway = MockGateway::new();
        gateway.expect_list_barbers().returning(|| {
            Ok(vec![
                barber(1, "Zoe", true),
                barber(2, "Ale", false),
                barber(3, "Mati", true),
            ])
        });

        let page = load_staff_page(&gateway, &user(Role::Admin)).unwrap();

        let names: Vec<_> = page.barbers.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Mati", "Zoe", "Ale"]);
    }

    #[test]
    fn overlapping_schedule_is_not_sent() {
        let mut gateway = MockGateway::new();
        gateway.expect_save_barber_schedule().never();

        let form = ScheduleForm {
            weekday: vec![1, 1],
            start: vec!["09:00".into(), "11:00".into()],
            end: vec!["12:00".into(), "14:00".into()],
        };

        assert!(matches!(
            save_schedule(&gateway, &user(Role::Admin), 1, &form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn schedule_is_saved_sorted() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_save_barber_schedule()
            .withf(|id, ranges| {
                id.get() == 2
                    && ranges.len() == 2
                    && ranges[0].start == TimeOfDay::from_hm(9, 0).unwrap()
            })
            .returning(|_, ranges| Ok(ranges.to_vec()));

        let form = ScheduleForm {
            weekday: vec![2, 2],
            start: vec!["16:00".into(), "09:00".into()],
            end: vec!["20:00".into(), "13:00".into()],
        };

        let saved = save_schedule(&gateway, &user(Role::Admin), 2, &form).unwrap();
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn schedule_page_offers_every_weekday() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get_barber()
            .returning(|id| Ok(barber(id.get(), "Nico", true)));
        gateway
            .expect_get_barber_schedule()
            .returning(|_| Ok(Vec::new()));

        let page = load_schedule_page(&gateway, &user(Role::Admin), 4).unwrap();

        assert_eq!(page.weekdays.len(), 7);
        assert_eq!(page.weekdays[0].value, 0);
    }
}
