use serde::Deserialize;
use validator::Validate;

use crate::domain::catalog::ServiceDraft;
use crate::domain::types::{Amount, ServiceName};
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Deserialize, Validate)]
/// Create or edit a catalog service.
pub struct ServiceForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub price: f64,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: u16,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub active: Option<String>,
}

impl TryFrom<ServiceForm> for ServiceDraft {
    type Error = FormError;

    fn try_from(form: ServiceForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: ServiceName::new(form.name.as_str()).map_err(|_| FormError::InvalidName)?,
            price: Amount::new(form.price).map_err(|_| FormError::InvalidAmount)?,
            duration_minutes: form.duration_minutes,
            description: non_blank(&form.description).map(str::to_string),
            active: checkbox(&form.active),
        })
    }
}
