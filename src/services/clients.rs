//! CRM page: client records derived from the appointment history.

use chrono::NaiveDate;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::client::{ClientSummary, ClientTier, summarize_clients};
use crate::dto::clients::{ClientsPageData, ClientsQuery, TierCount};
use crate::gateway::{AppointmentListQuery, AppointmentReader, BarberReader};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::services::{ServiceResult, ensure_staff};

const TIERS: [ClientTier; 4] = [
    ClientTier::New,
    ClientTier::Frequent,
    ClientTier::Vip,
    ClientTier::Inactive,
];

fn tier_counts(clients: &[ClientSummary]) -> Vec<TierCount> {
    TIERS
        .iter()
        .map(|tier| TierCount {
            tier: *tier,
            label: tier.label(),
            count: clients.iter().filter(|client| client.tier == *tier).count(),
        })
        .collect()
}

/// Builds the CRM table.
///
/// The whole appointment history is fetched and aggregated in memory, then
/// search, tier filter and pagination are applied to the summaries.
pub fn load_clients_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    query: &ClientsQuery,
    today: NaiveDate,
) -> ServiceResult<ClientsPageData>
where
    G: AppointmentReader + BarberReader + ?Sized,
{
    ensure_staff(user)?;

    let barber_id = if user.is_admin() {
        query.barber_id()
    } else {
        user.barber_id
    };
    let appointment_query = match barber_id {
        Some(barber_id) => AppointmentListQuery::new().barber(barber_id),
        None => AppointmentListQuery::new(),
    };

    let appointments = gateway
        .list_appointments(&appointment_query)
        .map_err(|err| {
            log::error!("Failed to load appointments for clients page: {err}");
            err
        })?;

    let search = query.search();
    let mut clients = summarize_clients(&appointments, today);
    if let Some(term) = &search {
        clients.retain(|client| client.matches(term));
    }

    let counts = tier_counts(&clients);

    let tier = query.tier();
    if let Some(tier) = tier {
        clients.retain(|client| client.tier == tier);
    }

    let barbers = if user.is_admin() {
        gateway.list_barbers()?
    } else {
        Vec::new()
    };

    Ok(ClientsPageData {
        clients: Paginated::from_items(
            clients,
            query.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        ),
        search,
        tier,
        barber_id,
        barbers,
        tier_counts: counts,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::appointment::AppointmentStatus;
    use crate::domain::appointment::fixtures::appointment;
    use crate::domain::auth::Role;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;
    use crate::services::test_support::user;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    fn history() -> Vec<crate::domain::appointment::Appointment> {
        let recent = today().and_hms_opt(10, 0, 0).unwrap() - Duration::days(5);
        let old = today().and_hms_opt(10, 0, 0).unwrap() - Duration::days(90);
        let mut appointments: Vec<_> = (1..=10)
            .map(|id| appointment(id, Some((1, "Ana Gómez")), AppointmentStatus::Completed, 100.0, recent))
            .collect();
        appointments.push(appointment(20, Some((2, "Bruno")), AppointmentStatus::Completed, 50.0, old));
        appointments.push(appointment(21, Some((3, "Carla")), AppointmentStatus::Pending, 80.0, recent));
        appointments
    }

    #[test]
    fn tiers_are_counted_before_filtering() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list_appointments()
            .returning(|_| Ok(history()));
        gateway.expect_list_barbers().returning(|| Ok(Vec::new()));

        let page = load_clients_page(
            &gateway,
            &user(Role::Admin),
            &ClientsQuery {
                tier: Some("vip".into()),
                ..ClientsQuery::default()
            },
            today(),
        )
        .unwrap();

        assert_eq!(page.clients.total_items, 1);
        assert_eq!(page.clients.items[0].name, "Ana Gómez");
        let counts: Vec<usize> = page.tier_counts.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1]);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list_appointments()
            .returning(|_| Ok(history()));
        gateway.expect_list_barbers().never();

        let page = load_clients_page(
            &gateway,
            &user(Role::Barber),
            &ClientsQuery {
                q: Some("  bruno ".into()),
                ..ClientsQuery::default()
            },
            today(),
        )
        .unwrap();

        assert_eq!(page.search.as_deref(), Some("bruno"));
        assert_eq!(page.clients.items.len(), 1);
        assert_eq!(page.clients.items[0].tier, ClientTier::Inactive);
    }

    #[test]
    fn clients_cannot_open_crm() {
        let gateway = MockGateway::new();
        let result = load_clients_page(
            &gateway,
            &user(Role::Client),
            &ClientsQuery::default(),
            today(),
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
