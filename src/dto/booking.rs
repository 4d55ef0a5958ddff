use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::appointment::Appointment;
use crate::domain::barber::Barber;
use crate::domain::catalog::ServiceItem;
use crate::domain::types::{BarberId, ServiceId, TimeOfDay};
use crate::dto::parse_param;

/// Selection echoed in the booking page URL while the client picks a slot.
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub service_id: Option<String>,
    pub barber_id: Option<String>,
    pub date: Option<String>,
}

impl BookingQuery {
    pub fn service_id(&self) -> Option<ServiceId> {
        parse_param::<i32>(&self.service_id).and_then(|id| ServiceId::new(id).ok())
    }

    pub fn barber_id(&self) -> Option<BarberId> {
        parse_param::<i32>(&self.barber_id).and_then(|id| BarberId::new(id).ok())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_param(&self.date)
    }
}

#[derive(Debug, Serialize)]
pub struct BookingPageData {
    pub services: Vec<ServiceItem>,
    pub barbers: Vec<Barber>,
    pub selected_service: Option<ServiceItem>,
    pub selected_barber: Option<BarberId>,
    pub date: NaiveDate,
    pub min_date: NaiveDate,
    /// Empty until both a barber and a date are chosen.
    pub slots: Vec<TimeOfDay>,
    /// Seña asked for the selected service.
    pub deposit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MyAppointmentsPageData {
    /// Open appointments from now on, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Everything else, most recent first.
    pub history: Vec<Appointment>,
    pub deposit_percent: u8,
}
