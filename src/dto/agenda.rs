use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::agenda::AgendaGrid;
use crate::domain::appointment::Appointment;
use crate::domain::barber::Barber;
use crate::domain::block::ScheduleBlock;
use crate::domain::types::AppointmentId;
use crate::dto::parse_param;

#[derive(Debug, Default, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
}

impl AgendaQuery {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_param(&self.date)
    }
}

#[derive(Debug, Serialize)]
pub struct AgendaPageData {
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    pub next_date: NaiveDate,
    pub grid: AgendaGrid,
    pub blocks: Vec<ScheduleBlock>,
    pub barbers: Vec<Barber>,
    /// Appointments of the day not yet charged, for the side list.
    pub pending_checkout: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutPageData {
    pub appointment: Appointment,
    pub outstanding: f64,
    pub payment_methods: Vec<PaymentMethodOption>,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One "charge this client" prompt as polled by the agenda page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReminderItem {
    pub appointment_id: AppointmentId,
    pub client: String,
    pub service: String,
    pub barber: Option<String>,
    pub starts_at: NaiveDateTime,
    pub outstanding: f64,
}

impl From<&Appointment> for ReminderItem {
    fn from(appointment: &Appointment) -> Self {
        Self {
            appointment_id: appointment.id,
            client: appointment
                .client
                .as_ref()
                .map(|client| client.name.clone())
                .unwrap_or_default(),
            service: appointment.service.name.clone(),
            barber: appointment.barber.as_ref().map(|barber| barber.name.clone()),
            starts_at: appointment.starts_at,
            outstanding: appointment.outstanding(),
        }
    }
}

/// Reminders shown right now plus the ones that just appeared.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ReminderFeed {
    pub visible: Vec<ReminderItem>,
    pub new: Vec<AppointmentId>,
}
