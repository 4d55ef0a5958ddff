use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::barber::Barber;
use crate::domain::cash::CashSummary;
use crate::domain::types::BarberId;
use crate::dto::parse_param;

#[derive(Debug, Default, Deserialize)]
pub struct CashPageQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub barber_id: Option<String>,
}

impl CashPageQuery {
    pub fn from(&self) -> Option<NaiveDate> {
        parse_param(&self.from)
    }

    pub fn to(&self) -> Option<NaiveDate> {
        parse_param(&self.to)
    }

    pub fn barber_id(&self) -> Option<BarberId> {
        parse_param::<i32>(&self.barber_id).and_then(|id| BarberId::new(id).ok())
    }
}

#[derive(Debug, Serialize)]
pub struct CashPageData {
    pub summary: CashSummary,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub barber_id: Option<BarberId>,
    /// Filter options; only admins see other barbers.
    pub barbers: Vec<Barber>,
}
