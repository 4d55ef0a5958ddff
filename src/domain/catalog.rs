use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, ServiceId, ServiceName};

/// Priced item of the service catalog (corte, barba, ...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceItem {
    pub id: ServiceId,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u16,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Create/update payload for a catalog item.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ServiceDraft {
    pub name: ServiceName,
    pub price: Amount,
    pub duration_minutes: u16,
    pub description: Option<String>,
    pub active: bool,
}
