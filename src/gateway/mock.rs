//! Mock gateway implementation for isolating services in tests.

use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;

use crate::domain::appointment::{Appointment, Checkout, NewAppointment, PaymentRedirect};
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
use crate::gateway::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, AuthGateway, BarberReader,
    BarberWriter, BlockReader, BlockWriter, BusinessReader, BusinessWriter, CashQuery, CashReader,
    CashWriter, ImageUpload, MessageReader, MessageWriter, ServiceCatalogReader,
    ServiceCatalogWriter, UploadGateway,
};

mock! {
    pub Gateway {}

    impl AuthGateway for Gateway {
        fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResponse>;
        fn register(&self, account: &NewAccount) -> GatewayResult<()>;
        fn request_password_reset(&self, email: &Email) -> GatewayResult<()>;
    }

    impl AppointmentReader for Gateway {
        fn list_appointments(&self, query: &AppointmentListQuery) -> GatewayResult<Vec<Appointment>>;
        fn list_my_appointments(&self) -> GatewayResult<Vec<Appointment>>;
        fn get_appointment(&self, id: AppointmentId) -> GatewayResult<Appointment>;
        fn list_occupied_slots(
            &self,
            barber_id: BarberId,
            date: NaiveDate,
        ) -> GatewayResult<Vec<TimeOfDay>>;
    }

    impl AppointmentWriter for Gateway {
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

    impl BlockReader for Gateway {
        fn list_blocks(&self, date: NaiveDate) -> GatewayResult<Vec<ScheduleBlock>>;
    }

    impl BlockWriter for Gateway {
        fn create_block(&self, block: &NewScheduleBlock) -> GatewayResult<ScheduleBlock>;
        fn delete_block(&self, id: BlockId) -> GatewayResult<()>;
    }

    impl BarberReader for Gateway {
        fn list_barbers(&self) -> GatewayResult<Vec<Barber>>;
        fn get_barber(&self, id: BarberId) -> GatewayResult<Barber>;
        fn get_barber_schedule(&self, id: BarberId) -> GatewayResult<Vec<ScheduleRange>>;
    }

    impl BarberWriter for Gateway {
        fn create_barber(&self, barber: &NewBarber) -> GatewayResult<Barber>;
        fn update_barber(&self, id: BarberId, barber: &UpdateBarber) -> GatewayResult<Barber>;
        fn delete_barber(&self, id: BarberId) -> GatewayResult<()>;
        fn save_barber_schedule(
            &self,
            id: BarberId,
            ranges: &[ScheduleRange],
        ) -> GatewayResult<Vec<ScheduleRange>>;
    }

    impl ServiceCatalogReader for Gateway {
        fn list_services(&self) -> GatewayResult<Vec<ServiceItem>>;
    }

    impl ServiceCatalogWriter for Gateway {
        fn create_service(&self, draft: &ServiceDraft) -> GatewayResult<ServiceItem>;
        fn update_service(&self, id: ServiceId, draft: &ServiceDraft) -> GatewayResult<ServiceItem>;
        fn delete_service(&self, id: ServiceId) -> GatewayResult<()>;
    }

    impl CashReader for Gateway {
        fn get_cash_register(&self, query: &CashQuery) -> GatewayResult<CashRegister>;
    }

    impl CashWriter for Gateway {
        fn create_movement(&self, movement: &NewMovement) -> GatewayResult<Movement>;
    }

    impl BusinessReader for Gateway {
        fn get_business(&self) -> GatewayResult<BusinessSettings>;
    }

    impl BusinessWriter for Gateway {
        fn update_business(&self, settings: &UpdateBusiness) -> GatewayResult<BusinessSettings>;
    }

    impl MessageReader for Gateway {
        fn list_messages(&self) -> GatewayResult<Vec<MessageThread>>;
        fn get_message(&self, id: MessageId) -> GatewayResult<MessageThread>;
    }

    impl MessageWriter for Gateway {
        fn send_message(&self, message: &NewMessage) -> GatewayResult<()>;
        fn reply_message(&self, id: MessageId, reply: &NewReply) -> GatewayResult<MessageThread>;
        fn delete_message(&self, id: MessageId) -> GatewayResult<()>;
    }

    impl UploadGateway for Gateway {
        fn upload_image(&self, upload: &ImageUpload) -> GatewayResult<String>;
        fn delete_image(&self, url: &str) -> GatewayResult<()>;
    }
}
