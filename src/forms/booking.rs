use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::appointment::NewAppointment;
use crate::domain::types::{BarberId, ServiceId};
use crate::forms::{FormError, non_blank, parse_date_and_time};

#[derive(Deserialize, Validate)]
/// Booking form submitted from the reservation page.
pub struct BookAppointmentForm {
    pub service_id: i32,
    pub barber_id: i32,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// One of the offered `HH:MM` slots.
    pub time: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
}

impl TryFrom<BookAppointmentForm> for NewAppointment {
    type Error = FormError;

    fn try_from(form: BookAppointmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            service_id: ServiceId::new(form.service_id)?,
            barber_id: BarberId::new(form.barber_id)?,
            starts_at: parse_date_and_time(&form.date, &form.time)?,
            notes: non_blank(&form.notes).map(str::to_string),
        })
    }
}

#[derive(Deserialize)]
/// New date and time for an existing appointment.
pub struct RescheduleForm {
    pub date: String,
    pub time: String,
}

impl RescheduleForm {
    pub fn starts_at(&self) -> Result<NaiveDateTime, FormError> {
        parse_date_and_time(&self.date, &self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_form_becomes_payload() {
        let form = BookAppointmentForm {
            service_id: 2,
            barber_id: 1,
            date: "2026-05-02".into(),
            time: "10:30".into(),
            notes: "  ".into(),
        };

        let payload = NewAppointment::try_from(form).unwrap();

        assert_eq!(payload.barber_id.get(), 1);
        assert_eq!(payload.starts_at.to_string(), "2026-05-02 10:30:00");
        assert_eq!(payload.notes, None);
    }

    #[test]
    fn booking_form_rejects_unknown_barber() {
        let form = BookAppointmentForm {
            service_id: 2,
            barber_id: 0,
            date: "2026-05-02".into(),
            time: "10:30".into(),
            notes: String::new(),
        };
        assert!(matches!(
            NewAppointment::try_from(form),
            Err(FormError::InvalidId)
        ));
    }
}
