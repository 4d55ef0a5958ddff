use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, ImageUrl, PersonName, PhoneNumber, TimeOfDay};

/// Public business configuration: contact data, opening hours and gallery.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BusinessSettings {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    pub opening_time: TimeOfDay,
    pub closing_time: TimeOfDay,
    /// Share of the price asked as seña when booking online.
    #[serde(default)]
    pub deposit_percent: u8,
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl BusinessSettings {
    /// Deposit owed for a service of the given price.
    pub fn deposit_for(&self, price: f64) -> f64 {
        (price * f64::from(self.deposit_percent) / 100.0).round()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UpdateBusiness {
    pub name: PersonName,
    pub address: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
    pub instagram: Option<String>,
    pub opening_time: TimeOfDay,
    pub closing_time: TimeOfDay,
    pub deposit_percent: u8,
    pub gallery: Vec<ImageUrl>,
}
