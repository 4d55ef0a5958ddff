use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BarberId, Email, ImageUrl, PersonName, PhoneNumber, TimeOfDay, TypeConstraintError,
};

/// Staff profile as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewBarber {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub photo_url: Option<ImageUrl>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UpdateBarber {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub photo_url: Option<ImageUrl>,
    pub active: bool,
}

/// Day of week numbered the way the backend stores it: 0 = Sunday … 6 = Saturday.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
    pub fn new(value: u8) -> Result<Self, TypeConstraintError> {
        if value < 7 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidValue(format!(
                "weekday out of range: {value}"
            )))
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Domingo",
            1 => "Lunes",
            2 => "Martes",
            3 => "Miércoles",
            4 => "Jueves",
            5 => "Viernes",
            _ => "Sábado",
        }
    }
}

impl TryFrom<u8> for WeekdayIndex {
    type Error = TypeConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekdayIndex> for u8 {
    fn from(value: WeekdayIndex) -> Self {
        value.0
    }
}

/// One working range of a barber's recurring weekly schedule.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleRange {
    pub weekday: WeekdayIndex,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleRange {
    pub fn new(
        weekday: WeekdayIndex,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, TypeConstraintError> {
        if start >= end {
            return Err(TypeConstraintError::InvalidValue(format!(
                "range {start}-{end} ends before it starts"
            )));
        }
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }
}
