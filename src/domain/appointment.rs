use std::fmt::Display;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AppointmentId, BarberId, ClientId, ServiceId, TimeOfDay};

/// Lifecycle state of a booking as reported by the backend.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Spanish label rendered in templates.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pendiente",
            AppointmentStatus::Confirmed => "Confirmado",
            AppointmentStatus::Completed => "Completado",
            AppointmentStatus::Cancelled => "Cancelado",
        }
    }

    /// Cancelled and completed bookings cannot change anymore.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AppointmentStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// Payment sub-state of an appointment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    #[default]
    Unpaid,
    /// A seña (partial deposit) secured the booking.
    DepositPaid,
    Paid,
}

/// How the client settled the appointment at checkout.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    MercadoPago,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::MercadoPago,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::MercadoPago => "MERCADO_PAGO",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::MercadoPago => "Mercado Pago",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            "MERCADO_PAGO" => Ok(PaymentMethod::MercadoPago),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceRef {
    pub id: ServiceId,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BarberRef {
    pub id: BarberId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientRef {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A booking (turno) linking a client, a barber, a service and a timestamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub starts_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub price: f64,
    pub service: ServiceRef,
    #[serde(default)]
    pub barber: Option<BarberRef>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub payment: PaymentState,
    /// Seña amount already collected, if any.
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.starts_at.date()
    }

    pub fn time(&self) -> TimeOfDay {
        TimeOfDay::from(self.starts_at.time())
    }

    /// End of the appointment according to the booked service duration.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at + Duration::minutes(i64::from(self.service.duration_minutes))
    }

    pub fn barber_id(&self) -> Option<BarberId> {
        self.barber.as_ref().map(|barber| barber.id)
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client.as_ref().map(|client| client.id)
    }

    /// Amount still owed at checkout once a deposit was taken.
    pub fn outstanding(&self) -> f64 {
        match self.payment {
            PaymentState::Paid => 0.0,
            PaymentState::DepositPaid => (self.price - self.deposit.unwrap_or(0.0)).max(0.0),
            PaymentState::Unpaid => self.price,
        }
    }
}

/// Payload for requesting a new booking.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewAppointment {
    pub service_id: ServiceId,
    pub barber_id: BarberId,
    pub starts_at: NaiveDateTime,
    pub notes: Option<String>,
}

/// Payload closing an appointment at the register.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Checkout {
    pub payment_method: PaymentMethod,
    pub amount: f64,
}

/// Where to send the browser to pay the seña online.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentRedirect {
    pub url: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDateTime;

    use super::*;

    /// Builds a minimal appointment for derivation tests.
    pub fn appointment(
        id: i32,
        client: Option<(i32, &str)>,
        status: AppointmentStatus,
        price: f64,
        starts_at: NaiveDateTime,
    ) -> Appointment {
        Appointment {
            id: AppointmentId::new(id).expect("valid appointment id"),
            starts_at,
            status,
            price,
            service: ServiceRef {
                id: ServiceId::new(1).expect("valid service id"),
                name: "Corte".to_string(),
                price,
                duration_minutes: 30,
            },
            barber: Some(BarberRef {
                id: BarberId::new(1).expect("valid barber id"),
                name: "Nico".to_string(),
            }),
            client: client.map(|(id, name)| ClientRef {
                id: ClientId::new(id).expect("valid client id"),
                name: name.to_string(),
                email: None,
                phone: None,
            }),
            payment: PaymentState::Unpaid,
            deposit: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::fixtures::appointment;
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 12,
            "starts_at": "2026-03-10T10:30:00",
            "status": "CONFIRMED",
            "price": 8000.0,
            "service": {"id": 2, "name": "Corte y barba", "price": 8000.0, "duration_minutes": 45},
            "barber": {"id": 3, "name": "Lucas"},
            "client": {"id": 9, "name": "Ana", "email": "ana@example.com"},
            "payment": "DEPOSIT_PAID",
            "deposit": 2000.0
        }"#;

        let appointment: Appointment = serde_json::from_str(json).expect("valid payload");

        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(appointment.time().to_string(), "10:30");
        assert_eq!(appointment.ends_at(), at(11, 15));
        assert_eq!(appointment.outstanding(), 6000.0);
        assert_eq!(appointment.client_id().map(ClientId::get), Some(9));
        assert!(appointment.notes.is_none());
    }

    #[test]
    fn outstanding_depends_on_payment_state() {
        let mut turno = appointment(1, None, AppointmentStatus::Confirmed, 100.0, at(9, 0));
        assert_eq!(turno.outstanding(), 100.0);
        turno.payment = PaymentState::Paid;
        assert_eq!(turno.outstanding(), 0.0);
    }

    #[test]
    fn parses_status_case_insensitively() {
        assert_eq!(
            AppointmentStatus::try_from("cancelled"),
            Ok(AppointmentStatus::Cancelled)
        );
        assert!(AppointmentStatus::try_from("lost").is_err());
        assert!(!AppointmentStatus::Completed.is_open());
    }
}
