//! REST implementation of the gateway traits over a blocking `reqwest` client.
//!
//! Calls block the current thread; handlers run them through `web::block`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Method;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

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
use crate::gateway::cache::QueryCache;
use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::gateway::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, AuthGateway, BarberReader,
    BarberWriter, BlockReader, BlockWriter, BusinessReader, BusinessWriter, CashQuery, CashReader,
    CashWriter, ImageUpload, MessageReader, MessageWriter, ServiceCatalogReader,
    ServiceCatalogWriter, UploadGateway,
};

const TURNOS: &str = "/turnos";
const BLOQUEOS: &str = "/agenda/bloqueos";
const BARBEROS: &str = "/barberos";
const SERVICIOS: &str = "/servicios";
const CAJA: &str = "/caja";
const NEGOCIO: &str = "/negocio";
const MENSAJES: &str = "/mensajes";
const UPLOADS: &str = "/uploads";

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Serialize)]
struct OccupiedQuery {
    barber_id: BarberId,
    date: NaiveDate,
}

#[derive(Serialize)]
struct DateQuery {
    date: NaiveDate,
}

#[derive(Serialize)]
struct UrlQuery<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct RecoverRequest<'a> {
    email: &'a Email,
}

#[derive(Serialize)]
struct RescheduleRequest {
    starts_at: NaiveDateTime,
}

#[derive(Serialize)]
struct ScheduleRequest<'a> {
    ranges: &'a [ScheduleRange],
}

/// Backend client carrying the caller's bearer token.
///
/// Cloning is cheap: the connection pool and the query cache are shared.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
    cache: Arc<QueryCache>,
}

impl HttpGateway {
    /// Builds an anonymous gateway. Must be called outside an async runtime.
    pub fn new(base_url: &str, timeout_secs: u64, cache: Arc<QueryCache>) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            cache,
        })
    }

    /// Same backend, authenticated as the owner of `token`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..self.clone()
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and returns the raw body of a successful response.
    fn send(&self, request: RequestBuilder) -> GatewayResult<String> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                GatewayError::Transport(format!("request to {} timed out", self.base_url))
            } else {
                GatewayError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .ok()
                .and_then(|payload| payload.message);
            log::warn!("Backend answered {status}: {body}");
            Err(GatewayError::from_status(status.as_u16(), message))
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let token = self.token.as_deref().unwrap_or_default();
        if let Some(body) = self.cache.get(token, path) {
            return decode(&body);
        }

        let body = self.send(self.request(Method::GET, path))?;
        let value = decode(&body)?;
        self.cache.put(token, path, body);
        Ok(value)
    }

    fn get_with<Q: Serialize, T: DeserializeOwned>(&self, path: &str, query: &Q) -> GatewayResult<T> {
        self.get(&with_query(path, query)?)
    }

    /// Runs a mutation and drops cached reads under `invalidates` on success.
    fn mutate(&self, request: RequestBuilder, invalidates: &[&str]) -> GatewayResult<String> {
        let body = self.send(request)?;
        self.cache.invalidate(invalidates);
        Ok(body)
    }

    fn mutate_json<B, T>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        invalidates: &[&str],
    ) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.mutate(self.request(method, path).json(payload), invalidates)?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn with_query<Q: Serialize>(path: &str, query: &Q) -> GatewayResult<String> {
    let encoded = serde_html_form::to_string(query)
        .map_err(|e| GatewayError::Decode(format!("failed to encode query: {e}")))?;
    if encoded.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{encoded}"))
    }
}

impl AuthGateway for HttpGateway {
    fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResponse> {
        self.mutate_json(Method::POST, "/auth/login", credentials, &[])
    }

    fn register(&self, account: &NewAccount) -> GatewayResult<()> {
        self.mutate(self.request(Method::POST, "/auth/register").json(account), &[])
            .map(|_| ())
    }

    fn request_password_reset(&self, email: &Email) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::POST, "/auth/recuperar")
                .json(&RecoverRequest { email }),
            &[],
        )
        .map(|_| ())
    }
}

impl AppointmentReader for HttpGateway {
    fn list_appointments(&self, query: &AppointmentListQuery) -> GatewayResult<Vec<Appointment>> {
        self.get_with(TURNOS, query)
    }

    fn list_my_appointments(&self) -> GatewayResult<Vec<Appointment>> {
        self.get(&format!("{TURNOS}/mios"))
    }

    fn get_appointment(&self, id: AppointmentId) -> GatewayResult<Appointment> {
        self.get(&format!("{TURNOS}/{id}"))
    }

    fn list_occupied_slots(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> GatewayResult<Vec<TimeOfDay>> {
        self.get_with(
            &format!("{TURNOS}/ocupados"),
            &OccupiedQuery { barber_id, date },
        )
    }
}

impl AppointmentWriter for HttpGateway {
    fn create_appointment(&self, new_appointment: &NewAppointment) -> GatewayResult<Appointment> {
        self.mutate_json(Method::POST, TURNOS, new_appointment, &[TURNOS])
    }

    fn cancel_appointment(&self, id: AppointmentId) -> GatewayResult<Appointment> {
        let body = self.mutate(
            self.request(Method::POST, &format!("{TURNOS}/{id}/cancelar")),
            &[TURNOS],
        )?;
        decode(&body)
    }

    fn complete_appointment(
        &self,
        id: AppointmentId,
        checkout: &Checkout,
    ) -> GatewayResult<Appointment> {
        self.mutate_json(
            Method::POST,
            &format!("{TURNOS}/{id}/completar"),
            checkout,
            &[TURNOS, CAJA],
        )
    }

    fn reschedule_appointment(
        &self,
        id: AppointmentId,
        starts_at: NaiveDateTime,
    ) -> GatewayResult<Appointment> {
        self.mutate_json(
            Method::POST,
            &format!("{TURNOS}/{id}/reprogramar"),
            &RescheduleRequest { starts_at },
            &[TURNOS],
        )
    }

    fn start_deposit_payment(&self, id: AppointmentId) -> GatewayResult<PaymentRedirect> {
        let body = self.mutate(
            self.request(Method::POST, &format!("{TURNOS}/{id}/pagar")),
            &[TURNOS],
        )?;
        decode(&body)
    }
}

impl BlockReader for HttpGateway {
    fn list_blocks(&self, date: NaiveDate) -> GatewayResult<Vec<ScheduleBlock>> {
        self.get_with(BLOQUEOS, &DateQuery { date })
    }
}

impl BlockWriter for HttpGateway {
    fn create_block(&self, block: &NewScheduleBlock) -> GatewayResult<ScheduleBlock> {
        self.mutate_json(Method::POST, BLOQUEOS, block, &[BLOQUEOS, TURNOS])
    }

    fn delete_block(&self, id: BlockId) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::DELETE, &format!("{BLOQUEOS}/{id}")),
            &[BLOQUEOS, TURNOS],
        )
        .map(|_| ())
    }
}

impl BarberReader for HttpGateway {
    fn list_barbers(&self) -> GatewayResult<Vec<Barber>> {
        self.get(BARBEROS)
    }

    fn get_barber(&self, id: BarberId) -> GatewayResult<Barber> {
        self.get(&format!("{BARBEROS}/{id}"))
    }

    fn get_barber_schedule(&self, id: BarberId) -> GatewayResult<Vec<ScheduleRange>> {
        self.get(&format!("{BARBEROS}/{id}/horarios"))
    }
}

impl BarberWriter for HttpGateway {
    fn create_barber(&self, barber: &NewBarber) -> GatewayResult<Barber> {
        self.mutate_json(Method::POST, BARBEROS, barber, &[BARBEROS])
    }

    fn update_barber(&self, id: BarberId, barber: &UpdateBarber) -> GatewayResult<Barber> {
        self.mutate_json(
            Method::PUT,
            &format!("{BARBEROS}/{id}"),
            barber,
            &[BARBEROS, TURNOS],
        )
    }

    fn delete_barber(&self, id: BarberId) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::DELETE, &format!("{BARBEROS}/{id}")),
            &[BARBEROS, TURNOS],
        )
        .map(|_| ())
    }

    fn save_barber_schedule(
        &self,
        id: BarberId,
        ranges: &[ScheduleRange],
    ) -> GatewayResult<Vec<ScheduleRange>> {
        self.mutate_json(
            Method::PUT,
            &format!("{BARBEROS}/{id}/horarios"),
            &ScheduleRequest { ranges },
            &[BARBEROS],
        )
    }
}

impl ServiceCatalogReader for HttpGateway {
    fn list_services(&self) -> GatewayResult<Vec<ServiceItem>> {
        self.get(SERVICIOS)
    }
}

impl ServiceCatalogWriter for HttpGateway {
    fn create_service(&self, draft: &ServiceDraft) -> GatewayResult<ServiceItem> {
        self.mutate_json(Method::POST, SERVICIOS, draft, &[SERVICIOS])
    }

    fn update_service(&self, id: ServiceId, draft: &ServiceDraft) -> GatewayResult<ServiceItem> {
        self.mutate_json(
            Method::PUT,
            &format!("{SERVICIOS}/{id}"),
            draft,
            &[SERVICIOS],
        )
    }

    fn delete_service(&self, id: ServiceId) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::DELETE, &format!("{SERVICIOS}/{id}")),
            &[SERVICIOS],
        )
        .map(|_| ())
    }
}

impl CashReader for HttpGateway {
    fn get_cash_register(&self, query: &CashQuery) -> GatewayResult<CashRegister> {
        self.get_with(CAJA, query)
    }
}

impl CashWriter for HttpGateway {
    fn create_movement(&self, movement: &NewMovement) -> GatewayResult<Movement> {
        self.mutate_json(
            Method::POST,
            &format!("{CAJA}/movimientos"),
            movement,
            &[CAJA],
        )
    }
}

impl BusinessReader for HttpGateway {
    fn get_business(&self) -> GatewayResult<BusinessSettings> {
        self.get(NEGOCIO)
    }
}

impl BusinessWriter for HttpGateway {
    fn update_business(&self, settings: &UpdateBusiness) -> GatewayResult<BusinessSettings> {
        self.mutate_json(Method::PUT, NEGOCIO, settings, &[NEGOCIO])
    }
}

impl MessageReader for HttpGateway {
    fn list_messages(&self) -> GatewayResult<Vec<MessageThread>> {
        self.get(MENSAJES)
    }

    fn get_message(&self, id: MessageId) -> GatewayResult<MessageThread> {
        self.get(&format!("{MENSAJES}/{id}"))
    }
}

impl MessageWriter for HttpGateway {
    fn send_message(&self, message: &NewMessage) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::POST, MENSAJES).json(message),
            &[MENSAJES],
        )
        .map(|_| ())
    }

    fn reply_message(&self, id: MessageId, reply: &NewReply) -> GatewayResult<MessageThread> {
        self.mutate_json(
            Method::POST,
            &format!("{MENSAJES}/{id}/respuestas"),
            reply,
            &[MENSAJES],
        )
    }

    fn delete_message(&self, id: MessageId) -> GatewayResult<()> {
        self.mutate(
            self.request(Method::DELETE, &format!("{MENSAJES}/{id}")),
            &[MENSAJES],
        )
        .map(|_| ())
    }
}

impl UploadGateway for HttpGateway {
    fn upload_image(&self, upload: &ImageUpload) -> GatewayResult<String> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| GatewayError::BadRequest(format!("invalid content type: {e}")))?;
        let form = Form::new().part("file", part);

        let body = self.mutate(self.request(Method::POST, UPLOADS).multipart(form), &[])?;
        decode::<UploadResponse>(&body).map(|response| response.url)
    }

    fn delete_image(&self, url: &str) -> GatewayResult<()> {
        let path = with_query(UPLOADS, &UrlQuery { url })?;
        self.mutate(self.request(Method::DELETE, &path), &[])
            .map(|_| ())
    }
}
