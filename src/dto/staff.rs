use serde::Serialize;

use crate::domain::barber::{Barber, ScheduleRange};
use crate::domain::catalog::ServiceItem;
use crate::domain::business::BusinessSettings;

#[derive(Debug, Serialize)]
pub struct WeekdayOption {
    pub value: u8,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SchedulePageData {
    pub barber: Barber,
    pub ranges: Vec<ScheduleRange>,
    pub weekdays: Vec<WeekdayOption>,
}

#[derive(Debug, Serialize)]
pub struct StaffPageData {
    pub barbers: Vec<Barber>,
}

#[derive(Debug, Serialize)]
pub struct ServicesPageData {
    pub services: Vec<ServiceItem>,
}

#[derive(Debug, Serialize)]
pub struct SettingsPageData {
    pub business: BusinessSettings,
}
