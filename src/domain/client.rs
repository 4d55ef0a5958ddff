//! Client CRM aggregate.
//!
//! Not a backend entity: a summary rebuilt from the fetched appointment list
//! every time the page is rendered, never persisted.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::types::ClientId;

/// Completed visits needed for the VIP tier.
pub const VIP_MIN_VISITS: u32 = 10;
/// Completed visits needed for the FREQUENT tier.
pub const FREQUENT_MIN_VISITS: u32 = 3;
/// Days without a visit after which a client is INACTIVE.
pub const INACTIVE_AFTER_DAYS: i64 = 60;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientTier {
    New,
    Frequent,
    Vip,
    Inactive,
}

impl ClientTier {
    pub fn label(&self) -> &'static str {
        match self {
            ClientTier::New => "Nuevo",
            ClientTier::Frequent => "Frecuente",
            ClientTier::Vip => "VIP",
            ClientTier::Inactive => "Inactivo",
        }
    }

    /// Tier for a visit count and last visit, evaluated on `today`.
    ///
    /// Inactivity is checked after the visit thresholds and overrides them,
    /// so a former VIP who stopped coming shows as INACTIVE.
    pub fn classify(visits: u32, last_visit: Option<NaiveDate>, today: NaiveDate) -> Self {
        let tier = if visits >= VIP_MIN_VISITS {
            ClientTier::Vip
        } else if visits >= FREQUENT_MIN_VISITS {
            ClientTier::Frequent
        } else {
            ClientTier::New
        };

        match last_visit {
            Some(last) if (today - last).num_days() > INACTIVE_AFTER_DAYS => ClientTier::Inactive,
            _ => tier,
        }
    }
}

impl TryFrom<&str> for ClientTier {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(ClientTier::New),
            "FREQUENT" => Ok(ClientTier::Frequent),
            "VIP" => Ok(ClientTier::Vip),
            "INACTIVE" => Ok(ClientTier::Inactive),
            other => Err(format!("unknown client tier: {other}")),
        }
    }
}

/// One row of the CRM table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClientSummary {
    pub client_id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Completed appointments.
    pub total_visits: u32,
    /// Sum of completed appointment prices.
    pub total_spent: f64,
    /// Start of the latest completed appointment.
    pub last_visit: Option<NaiveDateTime>,
    pub total_appointments: u32,
    pub cancelled: u32,
    pub tier: ClientTier,
}

impl ClientSummary {
    fn empty(appointment: &Appointment, client_id: ClientId) -> Self {
        let client = appointment.client.as_ref();
        Self {
            client_id,
            name: client.map(|c| c.name.clone()).unwrap_or_default(),
            email: client.and_then(|c| c.email.clone()),
            phone: client.and_then(|c| c.phone.clone()),
            total_visits: 0,
            total_spent: 0.0,
            last_visit: None,
            total_appointments: 0,
            cancelled: 0,
            tier: ClientTier::New,
        }
    }

    /// Case-insensitive match on name, email or phone.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&term))
            || self.phone.as_deref().is_some_and(|phone| phone.contains(&term))
    }
}

/// Groups appointments by client and derives one summary per client.
///
/// Appointments without a client reference are skipped. Rows are ordered by
/// most recent visit first; clients that never completed a visit go last.
pub fn summarize_clients(appointments: &[Appointment], today: NaiveDate) -> Vec<ClientSummary> {
    let mut by_client: HashMap<ClientId, ClientSummary> = HashMap::new();

    for appointment in appointments {
        let Some(client_id) = appointment.client_id() else {
            continue;
        };

        let summary = by_client
            .entry(client_id)
            .or_insert_with(|| ClientSummary::empty(appointment, client_id));

        summary.total_appointments += 1;
        match appointment.status {
            AppointmentStatus::Completed => {
                summary.total_visits += 1;
                summary.total_spent += appointment.price;
                if summary
                    .last_visit
                    .is_none_or(|last| appointment.starts_at > last)
                {
                    summary.last_visit = Some(appointment.starts_at);
                }
            }
            AppointmentStatus::Cancelled => summary.cancelled += 1,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
        }
    }

    let mut summaries: Vec<ClientSummary> = by_client
        .into_values()
        .map(|mut summary| {
            summary.tier = ClientTier::classify(
                summary.total_visits,
                summary.last_visit.map(|visit| visit.date()),
                today,
            );
            summary
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.last_visit
            .cmp(&a.last_visit)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.client_id.cmp(&b.client_id))
    });

    summaries
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::appointment::fixtures::appointment;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    fn days_ago(days: i64) -> NaiveDateTime {
        (today() - Duration::days(days)).and_hms_opt(10, 0, 0).unwrap()
    }

    fn completed_visits(client: (i32, &str), count: i32, last_days_ago: i64) -> Vec<Appointment> {
        (0..count)
            .map(|n| {
                appointment(
                    client.0 * 100 + n + 1,
                    Some(client),
                    AppointmentStatus::Completed,
                    100.0,
                    days_ago(last_days_ago + i64::from(n) * 7),
                )
            })
            .collect()
    }

    #[test]
    fn client_without_completed_visits_is_new() {
        let appointments = vec![appointment(
            1,
            Some((1, "Ana")),
            AppointmentStatus::Confirmed,
            100.0,
            days_ago(200),
        )];

        let summaries = summarize_clients(&appointments, today());

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_visits, 0);
        assert_eq!(summaries[0].last_visit, None);
        assert_eq!(summaries[0].tier, ClientTier::New);
    }

    #[test]
    fn ten_recent_visits_make_a_vip() {
        let summaries = summarize_clients(&completed_visits((1, "Ana"), 10, 5), today());
        assert_eq!(summaries[0].tier, ClientTier::Vip);
        assert_eq!(summaries[0].total_visits, 10);
    }

    #[test]
    fn inactivity_overrides_vip() {
        let summaries = summarize_clients(&completed_visits((1, "Ana"), 10, 90), today());
        assert_eq!(summaries[0].total_visits, 10);
        assert_eq!(summaries[0].tier, ClientTier::Inactive);
    }

    #[test]
    fn three_visits_are_frequent_and_sixty_days_is_still_active() {
        assert_eq!(
            ClientTier::classify(3, Some(today() - Duration::days(60)), today()),
            ClientTier::Frequent
        );
        assert_eq!(
            ClientTier::classify(3, Some(today() - Duration::days(61)), today()),
            ClientTier::Inactive
        );
        assert_eq!(ClientTier::classify(2, None, today()), ClientTier::New);
    }

    #[test]
    fn aggregates_visits_spend_and_last_visit() {
        let d1 = days_ago(20);
        let d2 = days_ago(3);
        let appointments = vec![
            appointment(1, Some((7, "A")), AppointmentStatus::Completed, 100.0, d1),
            appointment(2, Some((7, "A")), AppointmentStatus::Completed, 50.0, d2),
        ];

        let summaries = summarize_clients(&appointments, today());

        assert_eq!(summaries.len(), 1);
        let a = &summaries[0];
        assert_eq!(a.total_visits, 2);
        assert_eq!(a.total_spent, 150.0);
        assert_eq!(a.last_visit, Some(d2));
    }

    #[test]
    fn only_completed_appointments_count_as_visits() {
        let appointments = vec![
            appointment(1, Some((7, "A")), AppointmentStatus::Completed, 100.0, days_ago(10)),
            appointment(2, Some((7, "A")), AppointmentStatus::Cancelled, 80.0, days_ago(2)),
            appointment(3, Some((7, "A")), AppointmentStatus::Pending, 60.0, days_ago(1)),
        ];

        let summary = &summarize_clients(&appointments, today())[0];

        assert_eq!(summary.total_visits, 1);
        assert_eq!(summary.total_spent, 100.0);
        assert_eq!(summary.total_appointments, 3);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.last_visit, Some(days_ago(10)));
    }

    #[test]
    fn appointments_without_client_are_skipped() {
        let appointments = vec![
            appointment(1, None, AppointmentStatus::Completed, 100.0, days_ago(1)),
            appointment(2, Some((3, "B")), AppointmentStatus::Completed, 40.0, days_ago(1)),
        ];

        let summaries = summarize_clients(&appointments, today());

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].client_id.get(), 3);
    }

    #[test]
    fn most_recent_visit_sorts_first() {
        let appointments = vec![
            appointment(1, Some((1, "Old")), AppointmentStatus::Completed, 10.0, days_ago(30)),
            appointment(2, Some((2, "Never")), AppointmentStatus::Pending, 10.0, days_ago(1)),
            appointment(3, Some((3, "Recent")), AppointmentStatus::Completed, 10.0, days_ago(2)),
        ];

        let names: Vec<String> = summarize_clients(&appointments, today())
            .into_iter()
            .map(|summary| summary.name)
            .collect();

        assert_eq!(names, vec!["Recent", "Old", "Never"]);
    }

    #[test]
    fn search_matches_name_email_and_phone() {
        let mut summary = summarize_clients(
            &[appointment(1, Some((1, "Ana Pérez")), AppointmentStatus::Completed, 1.0, days_ago(1))],
            today(),
        )
        .remove(0);
        summary.email = Some("ana@example.com".to_string());
        summary.phone = Some("+5491155550000".to_string());

        assert!(summary.matches("pérez"));
        assert!(summary.matches("EXAMPLE"));
        assert!(summary.matches("5555"));
        assert!(summary.matches("  "));
        assert!(!summary.matches("lucas"));
    }
}
