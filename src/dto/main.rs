use serde::Serialize;

use crate::domain::barber::Barber;
use crate::domain::business::BusinessSettings;
use crate::domain::catalog::ServiceItem;

/// Data required to render the public landing page.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub business: BusinessSettings,
    /// Active services, cheapest first.
    pub services: Vec<ServiceItem>,
    /// Active staff.
    pub barbers: Vec<Barber>,
}
