use serde::{Deserialize, Serialize};

use crate::domain::barber::Barber;
use crate::domain::client::{ClientSummary, ClientTier};
use crate::domain::types::BarberId;
use crate::dto::parse_param;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    pub q: Option<String>,
    pub tier: Option<String>,
    pub barber_id: Option<String>,
    pub page: Option<usize>,
}

impl ClientsQuery {
    pub fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
    }

    pub fn tier(&self) -> Option<ClientTier> {
        self.tier
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .and_then(|t| ClientTier::try_from(t).ok())
    }

    pub fn barber_id(&self) -> Option<BarberId> {
        parse_param::<i32>(&self.barber_id).and_then(|id| BarberId::new(id).ok())
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TierCount {
    pub tier: ClientTier,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ClientsPageData {
    pub clients: Paginated<ClientSummary>,
    pub search: Option<String>,
    pub tier: Option<ClientTier>,
    pub barber_id: Option<BarberId>,
    pub barbers: Vec<Barber>,
    /// Counts before the tier filter, for the filter chips.
    pub tier_counts: Vec<TierCount>,
}
