//! Access to the remote booking backend.
//!
//! Every resource is split into a reader and a writer trait so services can
//! ask only for what they use. [`http::HttpGateway`] implements all of them
//! over REST; `mock::MockGateway` does the same for tests.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::appointment::{
    Appointment, AppointmentStatus, Checkout, NewAppointment, PaymentRedirect,
};
use crate::domain::auth::{Credentials, LoginResponse, NewAccount};
use crate::domain::barber::{Barber, NewBarber, ScheduleRange, UpdateBarber};
use crate::domain::block::{NewScheduleBlock, ScheduleBlock};
use crate::domain::business::{BusinessSettings, UpdateBusiness};
use crate::domain::cash::{CashRegister, Movement, NewMovement};
use crate::domain::catalog::{ServiceDraft, ServiceItem};
use crate::domain::message::{MessageThread, NewMessage, NewReply};
use crate::domain::types::{
    AppointmentId, BarberId, BlockId, Email, MessageId, ServiceId, TimeOfDay,
};
use crate::gateway::errors::GatewayResult;

pub mod cache;
pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Filters of `GET /turnos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<BarberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn barber(mut self, barber_id: BarberId) -> Self {
        self.barber_id = Some(barber_id);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Filters of `GET /caja`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CashQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<BarberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl CashQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn barber(mut self, barber_id: BarberId) -> Self {
        self.barber_id = Some(barber_id);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }
}

/// Image ready to be sent to the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub trait AuthGateway {
    fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResponse>;
    fn register(&self, account: &NewAccount) -> GatewayResult<()>;
    fn request_password_reset(&self, email: &Email) -> GatewayResult<()>;
}

pub trait AppointmentReader {
    fn list_appointments(&self, query: &AppointmentListQuery) -> GatewayResult<Vec<Appointment>>;
    fn list_my_appointments(&self) -> GatewayResult<Vec<Appointment>>;
    fn get_appointment(&self, id: AppointmentId) -> GatewayResult<Appointment>;
    fn list_occupied_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> GatewayResult<Vec<TimeOfDay>>;
}

pub trait AppointmentWriter {
    fn create_appointment(&self, new_appointment: &NewAppointment) -> GatewayResult<Appointment>;
    fn cancel_appointment(&self, id: AppointmentId) -> GatewayResult<Appointment>;
    fn complete_appointment(
        &self,
        id: AppointmentId,
        checkout: &Checkout,
    ) -> GatewayResult<Appointment>;
    fn reschedule_appointment(
        &self,
        id: AppointmentId,
        starts_at: NaiveDateTime,
    ) -> GatewayResult<Appointment>;
    fn start_deposit_payment(&self, id: AppointmentId) -> GatewayResult<PaymentRedirect>;
}

pub trait BlockReader {
    fn list_blocks(&self, date: NaiveDate) -> GatewayResult<Vec<ScheduleBlock>>;
}

pub trait BlockWriter {
    fn create_block(&self, block: &NewScheduleBlock) -> GatewayResult<ScheduleBlock>;
    fn delete_block(&self, id: BlockId) -> GatewayResult<()>;
}

pub trait BarberReader {
    fn list_barbers(&self) -> GatewayResult<Vec<Barber>>;
    fn get_barber(&self, id: BarberId) -> GatewayResult<Barber>;
    fn get_barber_schedule(&self, id: BarberId) -> GatewayResult<Vec<ScheduleRange>>;
}

pub trait BarberWriter {
    fn create_barber(&self, barber: &NewBarber) -> GatewayResult<Barber>;
    fn update_barber(&self, id: BarberId, barber: &UpdateBarber) -> GatewayResult<Barber>;
    fn delete_barber(&self, id: BarberId) -> GatewayResult<()>;
    fn save_barber_schedule(
        &self,
        id: BarberId,
        ranges: &[ScheduleRange],
    ) -> GatewayResult<Vec<ScheduleRange>>;
}

pub trait ServiceCatalogReader {
    fn list_services(&self) -> GatewayResult<Vec<ServiceItem>>;
}

pub trait ServiceCatalogWriter {
    fn create_service(&self, draft: &ServiceDraft) -> GatewayResult<ServiceItem>;
    fn update_service(&self, id: ServiceId, draft: &ServiceDraft) -> GatewayResult<ServiceItem>;
    fn delete_service(&self, id: ServiceId) -> GatewayResult<()>;
}

pub trait CashReader {
    fn get_cash_register(&self, query: &CashQuery) -> GatewayResult<CashRegister>;
}

pub trait CashWriter {
    fn create_movement(&self, movement: &NewMovement) -> GatewayResult<Movement>;
}

pub trait BusinessReader {
    fn get_business(&self) -> GatewayResult<BusinessSettings>;
}

pub trait BusinessWriter {
    fn update_business(&self, settings: &UpdateBusiness) -> GatewayResult<BusinessSettings>;
}

pub trait MessageReader {
    fn list_messages(&self) -> GatewayResult<Vec<MessageThread>>;
    fn get_message(&self, id: MessageId) -> GatewayResult<MessageThread>;
}

pub trait MessageWriter {
    fn send_message(&self, message: &NewMessage) -> GatewayResult<()>;
    fn reply_message(&self, id: MessageId, reply: &NewReply) -> GatewayResult<MessageThread>;
    fn delete_message(&self, id: MessageId) -> GatewayResult<()>;
}

pub trait UploadGateway {
    /// Stores the image and returns its public URL.
    fn upload_image(&self, upload: &ImageUpload) -> GatewayResult<String>;
    fn delete_image(&self, url: &str) -> GatewayResult<()>;
}
