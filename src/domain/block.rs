use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BarberId, BlockId, BlockReason, TypeConstraintError};

/// A time range in which no bookings are accepted (bloqueo).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduleBlock {
    pub id: BlockId,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub reason: String,
    /// `None` blocks the whole business.
    #[serde(default)]
    pub barber_id: Option<BarberId>,
}

impl ScheduleBlock {
    /// Whether the block prevents bookings for the given barber.
    pub fn applies_to(&self, barber_id: BarberId) -> bool {
        self.barber_id.is_none_or(|id| id == barber_id)
    }

    pub fn covers(&self, moment: NaiveDateTime) -> bool {
        self.starts_at <= moment && moment < self.ends_at
    }

    pub fn touches_date(&self, date: NaiveDate) -> bool {
        self.starts_at.date() <= date && date <= self.ends_at.date()
    }

    pub fn is_business_wide(&self) -> bool {
        self.barber_id.is_none()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewScheduleBlock {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub reason: BlockReason,
    pub barber_id: Option<BarberId>,
}

impl NewScheduleBlock {
    pub fn try_new(
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        reason: &str,
        barber_id: Option<BarberId>,
    ) -> Result<Self, TypeConstraintError> {
        if ends_at <= starts_at {
            return Err(TypeConstraintError::InvalidValue(
                "block must end after it starts".to_string(),
            ));
        }
        Ok(Self {
            starts_at,
            ends_at,
            reason: BlockReason::new(reason)?,
            barber_id,
        })
    }
}
