use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::appointment::{Appointment, NewAppointment, PaymentRedirect};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::availability::{SlotRequest, available_slots};
use crate::domain::types::{AppointmentId, BarberId, TimeOfDay};
use crate::dto::booking::{BookingPageData, BookingQuery, MyAppointmentsPageData};
use crate::forms::booking::{BookAppointmentForm, RescheduleForm};
use crate::gateway::errors::GatewayError;
use crate::gateway::{
    AppointmentReader, AppointmentWriter, BarberReader, BlockReader, BusinessReader,
    ServiceCatalogReader,
};
use crate::services::{ServiceError, ServiceResult, form_error};

/// Free slots of one barber on one date, as offered in the booking form.
pub fn slots_for<G>(
    gateway: &G,
    barber_id: BarberId,
    date: NaiveDate,
    now: NaiveDateTime,
    step_minutes: u16,
) -> ServiceResult<Vec<TimeOfDay>>
where
    G: BarberReader + AppointmentReader + BlockReader + ?Sized,
{
    let schedule = gateway.get_barber_schedule(barber_id)?;
    let occupied = gateway.list_occupied_slots(barber_id, date)?;
    // Anonymous visitors may not read blocks; the backend still rejects
    // bookings that fall inside one.
    let blocks = match gateway.list_blocks(date) {
        Ok(blocks) => blocks,
        Err(GatewayError::Unauthorized | GatewayError::Forbidden) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    Ok(available_slots(&SlotRequest {
        date,
        barber_id,
        schedule: &schedule,
        occupied: &occupied,
        blocks: &blocks,
        now,
        step_minutes,
    }))
}

/// Loads the booking page for the current selection.
///
/// Dates in the past fall back to today.
pub fn load_booking_page<G>(
    gateway: &G,
    query: &BookingQuery,
    now: NaiveDateTime,
    step_minutes: u16,
) -> ServiceResult<BookingPageData>
where
    G: ServiceCatalogReader
        + BarberReader
        + BusinessReader
        + AppointmentReader
        + BlockReader
        + ?Sized,
{
    let today = now.date();
    let date = query.date().filter(|date| *date >= today).unwrap_or(today);

    let services: Vec<_> = gateway
        .list_services()?
        .into_iter()
        .filter(|service| service.active)
        .collect();
    let barbers: Vec<_> = gateway
        .list_barbers()?
        .into_iter()
        .filter(|barber| barber.active)
        .collect();

    let selected_service = query
        .service_id()
        .and_then(|id| services.iter().find(|service| service.id == id).cloned());
    let selected_barber = query
        .barber_id()
        .filter(|id| barbers.iter().any(|barber| barber.id == *id));

    let slots = match selected_barber {
        Some(barber_id) => slots_for(gateway, barber_id, date, now, step_minutes)?,
        None => Vec::new(),
    };

    let deposit = match &selected_service {
        Some(service) => {
            let business = gateway.get_business()?;
            Some(business.deposit_for(service.price)).filter(|deposit| *deposit > 0.0)
        }
        None => None,
    };

    Ok(BookingPageData {
        services,
        barbers,
        selected_service,
        selected_barber,
        date,
        min_date: today,
        slots,
        deposit,
    })
}

/// Requests the booking. A slot taken in the meantime comes back as a
/// conflict and is reported with the slot-taken message.
pub fn book_appointment<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: BookAppointmentForm,
    now: NaiveDateTime,
) -> ServiceResult<Appointment>
where
    G: AppointmentWriter + ?Sized,
{
    let new_appointment = NewAppointment::try_from(form).map_err(form_error)?;
    if new_appointment.starts_at <= now {
        return Err(ServiceError::Form(
            "El horario seleccionado ya pasó.".to_string(),
        ));
    }

    gateway.create_appointment(&new_appointment).map_err(|err| {
        log::error!("Failed to book appointment for user {}: {err}", user.id);
        err.into()
    })
}

/// Appointments of the signed-in client split into upcoming and history.
pub fn load_my_appointments<G>(
    gateway: &G,
    now: NaiveDateTime,
) -> ServiceResult<MyAppointmentsPageData>
where
    G: AppointmentReader + BusinessReader + ?Sized,
{
    let appointments = gateway.list_my_appointments()?;
    let deposit_percent = gateway.get_business()?.deposit_percent;

    let (mut upcoming, mut history): (Vec<_>, Vec<_>) = appointments
        .into_iter()
        .partition(|appointment| appointment.status.is_open() && appointment.starts_at > now);
    upcoming.sort_by_key(|appointment| appointment.starts_at);
    history.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));

    Ok(MyAppointmentsPageData {
        upcoming,
        history,
        deposit_percent,
    })
}

pub fn cancel_appointment<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    appointment_id: i32,
) -> ServiceResult<Appointment>
where
    G: AppointmentWriter + ?Sized,
{
    let id = AppointmentId::new(appointment_id)?;
    gateway.cancel_appointment(id).map_err(|err| {
        log::error!("Failed to cancel appointment {id} for user {}: {err}", user.id);
        err.into()
    })
}

pub fn reschedule_appointment<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    appointment_id: i32,
    form: RescheduleForm,
    now: NaiveDateTime,
) -> ServiceResult<Appointment>
where
    G: AppointmentWriter + ?Sized,
{
    let id = AppointmentId::new(appointment_id)?;
    let starts_at = form.starts_at().map_err(form_error)?;
    if starts_at <= now {
        return Err(ServiceError::Form(
            "El horario seleccionado ya pasó.".to_string(),
        ));
    }

    gateway.reschedule_appointment(id, starts_at).map_err(|err| {
        log::error!("Failed to reschedule appointment {id} for user {}: {err}", user.id);
        err.into()
    })
}

/// Starts the online seña payment and returns where to send the browser.
pub fn start_deposit_payment<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    appointment_id: i32,
) -> ServiceResult<PaymentRedirect>
where
    G: AppointmentWriter + ?Sized,
{
    let id = AppointmentId::new(appointment_id)?;
    let redirect = gateway.start_deposit_payment(id).map_err(|err| {
        log::error!("Failed to start payment of appointment {id} for user {}: {err}", user.id);
        ServiceError::from(err)
    })?;

    if !redirect.url.starts_with("https://") && !redirect.url.starts_with("http://") {
        log::error!("Backend returned an invalid payment url: {}", redirect.url);
        return Err(ServiceError::Gateway(GatewayError::Decode(
            "invalid payment url".to_string(),
        )));
    }
    Ok(redirect)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::appointment::AppointmentStatus;
    use crate::domain::appointment::fixtures::appointment;
    use crate::domain::auth::Role;
    use crate::domain::barber::{ScheduleRange, WeekdayIndex};
    use crate::gateway::mock::MockGateway;
    use crate::services::test_support::user;

    // 2026-03-10 is a Tuesday.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(9, 45, 0)
            .unwrap()
    }

    fn booking_form(date: &str, time: &str) -> BookAppointmentForm {
        BookAppointmentForm {
            service_id: 1,
            barber_id: 1,
            date: date.into(),
            time: time.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn slots_combine_schedule_occupied_and_now() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_barber_schedule().returning(|_| {
            Ok(vec![
                ScheduleRange::new(
                    WeekdayIndex::new(2).unwrap(),
                    TimeOfDay::from_hm(9, 0).unwrap(),
                    TimeOfDay::from_hm(12, 0).unwrap(),
                )
                .unwrap(),
            ])
        });
        gateway
            .expect_list_occupied_slots()
            .returning(|_, _| Ok(vec![TimeOfDay::from_hm(10, 30).unwrap()]));
        gateway
            .expect_list_blocks()
            .returning(|_| Err(GatewayError::Unauthorized));

        let slots = slots_for(
            &gateway,
            BarberId::new(1).unwrap(),
            now().date(),
            now(),
            30,
        )
        .unwrap();

        let rendered: Vec<String> = slots.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["10:00", "11:00", "11:30"]);
    }

    #[test]
    fn taken_slot_reports_conflict_message() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_appointment()
            .times(1)
            .returning(|_| Err(GatewayError::Conflict("slot taken".into())));

        let err = book_appointment(
            &gateway,
            &user(Role::Client),
            booking_form("2026-03-11", "10:00"),
            now(),
        )
        .unwrap_err();

        assert_eq!(err.user_message(), "Ese horario ya fue reservado.");
    }

    #[test]
    fn invalid_schedule_reports_bad_request_message() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_appointment()
            .returning(|_| Err(GatewayError::BadRequest(String::new())));

        let err = book_appointment(
            &gateway,
            &user(Role::Client),
            booking_form("2026-03-11", "10:00"),
            now(),
        )
        .unwrap_err();

        assert_eq!(err.user_message(), "El horario seleccionado no es válido.");
    }

    #[test]
    fn past_slot_is_rejected_before_calling_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_create_appointment().never();

        let result = book_appointment(
            &gateway,
            &user(Role::Client),
            booking_form("2026-03-10", "09:30"),
            now(),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn my_appointments_split_upcoming_and_history() {
        let mut gateway = MockGateway::new();
        gateway.expect_list_my_appointments().returning(|| {
            Ok(vec![
                appointment(1, Some((1, "A")), AppointmentStatus::Completed, 10.0, now() - Duration::days(3)),
                appointment(2, Some((1, "A")), AppointmentStatus::Confirmed, 10.0, now() + Duration::days(7)),
                appointment(3, Some((1, "A")), AppointmentStatus::Pending, 10.0, now() + Duration::days(1)),
                appointment(4, Some((1, "A")), AppointmentStatus::Cancelled, 10.0, now() + Duration::days(2)),
            ])
        });
        gateway.expect_get_business().returning(|| {
            Ok(serde_json::from_str(
                r#"{"name": "B", "opening_time": "09:00", "closing_time": "20:00", "deposit_percent": 20}"#,
            )
            .unwrap())
        });

        let page = load_my_appointments(&gateway, now()).unwrap();

        let upcoming: Vec<i32> = page.upcoming.iter().map(|a| a.id.get()).collect();
        let history: Vec<i32> = page.history.iter().map(|a| a.id.get()).collect();
        assert_eq!(upcoming, vec![3, 2]);
        assert_eq!(history, vec![4, 1]);
        assert_eq!(page.deposit_percent, 20);
    }

    #[test]
    fn payment_redirect_must_be_a_web_url() {
        let mut gateway = MockGateway::new();
        gateway.expect_start_deposit_payment().returning(|_| {
            Ok(PaymentRedirect {
                url: "javascript:alert(1)".into(),
            })
        });

        assert!(start_deposit_payment(&gateway, &user(Role::Client), 5).is_err());
    }
}
