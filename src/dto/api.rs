//! Payloads of the JSON endpoints polled by the pages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BarberId, TimeOfDay};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub barber_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SlotsResponse {
    pub barber_id: BarberId,
    pub date: NaiveDate,
    pub slots: Vec<TimeOfDay>,
}
