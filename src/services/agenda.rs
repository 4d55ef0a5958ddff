//! Staff agenda: day grid, schedule blocks, checkout and the charge
//! reminders polled by the agenda page.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::agenda::{AgendaInput, build_agenda_grid};
use crate::domain::appointment::{Appointment, AppointmentStatus, Checkout, PaymentMethod};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::block::{NewScheduleBlock, ScheduleBlock};
use crate::domain::reminder::{ReminderBook, ReminderPolicy};
use crate::domain::types::{AppointmentId, BlockId};
use crate::dto::agenda::{
    AgendaPageData, AgendaQuery, CheckoutPageData, PaymentMethodOption, ReminderFeed,
    ReminderItem,
};
use crate::forms::agenda::{AddBlockForm, CheckoutForm};
use crate::gateway::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, BarberReader, BlockReader,
    BlockWriter, BusinessReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_staff, form_error};

/// Barbers only see their own column; admins see the whole shop.
fn scoped_query(user: &AuthenticatedUser, query: AppointmentListQuery) -> AppointmentListQuery {
    match (user.is_admin(), user.barber_id) {
        (false, Some(barber_id)) => query.barber(barber_id),
        _ => query,
    }
}

pub fn load_agenda_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    query: &AgendaQuery,
    today: NaiveDate,
    step_minutes: u16,
) -> ServiceResult<AgendaPageData>
where
    G: AppointmentReader + BlockReader + BarberReader + BusinessReader + ?Sized,
{
    ensure_staff(user)?;

    let date = query.date().unwrap_or(today);
    let business = gateway.get_business()?;

    let mut barbers = gateway.list_barbers()?;
    if !user.is_admin() {
        barbers.retain(|barber| Some(barber.id) == user.barber_id);
    }

    let appointments = gateway
        .list_appointments(&scoped_query(user, AppointmentListQuery::new().date(date)))
        .map_err(|err| {
            log::error!("Failed to load agenda for {date}: {err}");
            err
        })?;
    let blocks = gateway.list_blocks(date)?;

    let grid = build_agenda_grid(&AgendaInput {
        date,
        barbers: &barbers,
        appointments: &appointments,
        blocks: &blocks,
        opening: business.opening_time,
        closing: business.closing_time,
        step_minutes,
    });

    let mut pending_checkout: Vec<Appointment> = appointments
        .into_iter()
        .filter(|appointment| appointment.status == AppointmentStatus::Confirmed)
        .collect();
    pending_checkout.sort_by_key(|appointment| appointment.starts_at);

    Ok(AgendaPageData {
        date,
        previous_date: date.checked_sub_days(Days::new(1)).unwrap_or(date),
        next_date: date.checked_add_days(Days::new(1)).unwrap_or(date),
        grid,
        blocks,
        barbers,
        pending_checkout,
    })
}

/// Creates a bloqueo. Barbers may only block their own agenda.
pub fn create_block<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: AddBlockForm,
) -> ServiceResult<ScheduleBlock>
where
    G: BlockWriter + ?Sized,
{
    ensure_staff(user)?;

    let block = NewScheduleBlock::try_from(form).map_err(form_error)?;
    if !user.is_admin() && block.barber_id != user.barber_id {
        return Err(ServiceError::Unauthorized);
    }

    gateway.create_block(&block).map_err(|err| {
        log::error!("Failed to create block: {err}");
        err.into()
    })
}

pub fn delete_block<G>(gateway: &G, user: &AuthenticatedUser, block_id: i32) -> ServiceResult<()>
where
    G: BlockWriter + ?Sized,
{
    ensure_staff(user)?;
    let id = BlockId::new(block_id)?;

    gateway.delete_block(id).map_err(|err| {
        log::error!("Failed to delete block {id}: {err}");
        err.into()
    })
}

pub fn load_checkout_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    appointment_id: i32,
) -> ServiceResult<CheckoutPageData>
where
    G: AppointmentReader + ?Sized,
{
    ensure_staff(user)?;
    let appointment = gateway.get_appointment(AppointmentId::new(appointment_id)?)?;

    if !appointment.status.is_open() {
        return Err(ServiceError::Form(
            "Este turno ya fue cobrado o cancelado.".to_string(),
        ));
    }

    Ok(CheckoutPageData {
        outstanding: appointment.outstanding(),
        appointment,
        payment_methods: PaymentMethod::ALL
            .iter()
            .map(|method| PaymentMethodOption {
                value: method.as_str(),
                label: method.label(),
            })
            .collect(),
    })
}

/// Charges the appointment and clears its pending reminder.
pub fn checkout_appointment<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    appointment_id: i32,
    form: CheckoutForm,
    book: &mut ReminderBook,
) -> ServiceResult<Appointment>
where
    G: AppointmentWriter + ?Sized,
{
    ensure_staff(user)?;
    let id = AppointmentId::new(appointment_id)?;
    let checkout = Checkout::try_from(form).map_err(form_error)?;

    let appointment = gateway.complete_appointment(id, &checkout).map_err(|err| {
        log::error!("Failed to complete appointment {id}: {err}");
        ServiceError::from(err)
    })?;
    book.resolve(id);

    log::info!(
        "Appointment {id} charged {} by {} via {}",
        checkout.amount,
        user.id,
        checkout.payment_method.as_str()
    );
    Ok(appointment)
}

/// Confirmed appointments that can become due on `now`'s day: today's, plus
/// yesterday's late ones whose tolerance ends after midnight.
fn reminder_window<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
    policy: &ReminderPolicy,
) -> ServiceResult<Vec<Appointment>>
where
    G: AppointmentReader + ?Sized,
{
    let list = |date: NaiveDate| {
        let query = scoped_query(
            user,
            AppointmentListQuery::new()
                .date(date)
                .status(AppointmentStatus::Confirmed),
        );
        gateway.list_appointments(&query).map_err(|err| {
            log::error!("Failed to poll reminders for {date}: {err}");
            err
        })
    };

    let today = now.date();
    let mut appointments = list(today)?;
    if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        let midnight = today.and_time(NaiveTime::MIN);
        appointments.extend(
            list(yesterday)?
                .into_iter()
                .filter(|appointment| {
                    appointment.starts_at + policy.buffer + policy.tolerance >= midnight
                }),
        );
    }
    Ok(appointments)
}

/// Scans the confirmed appointments due today and returns the prompts to show.
///
/// The book keeps only appointments of this scan; anything charged,
/// cancelled or left over from an earlier day is forgotten so the session
/// cookie stays small.
pub fn poll_reminders<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    book: &mut ReminderBook,
    now: NaiveDateTime,
    policy: &ReminderPolicy,
) -> ServiceResult<ReminderFeed>
where
    G: AppointmentReader + ?Sized,
{
    ensure_staff(user)?;

    let appointments: Vec<Appointment> = reminder_window(gateway, user, now, policy)?
        .into_iter()
        .filter(|appointment| appointment.status == AppointmentStatus::Confirmed)
        .collect();

    let scanned: Vec<AppointmentId> =
        appointments.iter().map(|appointment| appointment.id).collect();
    book.retain_scanned(&scanned);
    let new = book.scan(&appointments, now, policy);

    let visible = book
        .visible()
        .into_iter()
        .filter_map(|id| appointments.iter().find(|appointment| appointment.id == id))
        .map(ReminderItem::from)
        .collect();

    if !new.is_empty() {
        log::info!("{} appointment(s) awaiting checkout", new.len());
    }
    Ok(ReminderFeed { visible, new })
}

/// Hides the prompt for the snooze delay.
pub fn snooze_reminder(
    user: &AuthenticatedUser,
    book: &mut ReminderBook,
    appointment_id: i32,
    now: NaiveDateTime,
    policy: &ReminderPolicy,
) -> ServiceResult<()> {
    ensure_staff(user)?;
    let id = AppointmentId::new(appointment_id)?;

    if book.snooze(id, now, policy) {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}

/// Hides the prompt for good in this session.
pub fn dismiss_reminder(
    user: &AuthenticatedUser,
    book: &mut ReminderBook,
    appointment_id: i32,
) -> ServiceResult<()> {
    ensure_staff(user)?;
    book.dismiss(AppointmentId::new(appointment_id)?);
    Ok(())
}
