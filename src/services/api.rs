//! JSON endpoints polled by the booking and agenda pages.

use chrono::NaiveDateTime;

use crate::domain::types::BarberId;
use crate::dto::api::{SlotsQuery, SlotsResponse};
use crate::gateway::{AppointmentReader, BarberReader, BlockReader};
use crate::services::ServiceResult;
use crate::services::booking::slots_for;

/// Free slots of one barber, refreshed while the client picks a date.
pub fn list_slots<G>(
    gateway: &G,
    query: &SlotsQuery,
    now: NaiveDateTime,
    step_minutes: u16,
) -> ServiceResult<SlotsResponse>
where
    G: BarberReader + AppointmentReader + BlockReader + ?Sized,
{
    let barber_id = BarberId::new(query.barber_id)?;

    let slots = if query.date < now.date() {
        Vec::new()
    } else {
        slots_for(gateway, barber_id, query.date, now, step_minutes).map_err(|err| {
            log::error!("Failed to list slots of barber {barber_id}: {err}");
            err
        })?
    };

    Ok(SlotsResponse {
        barber_id,
        date: query.date,
        slots,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn past_dates_have_no_slots() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_barber_schedule().never();

        let response = list_slots(
            &gateway,
            &SlotsQuery {
                barber_id: 1,
                date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            },
            now(),
            30,
        )
        .unwrap();

        assert!(response.slots.is_empty());
    }

    #[test]
    fn invalid_barber_is_rejected() {
        let gateway = MockGateway::new();
        let result = list_slots(
            &gateway,
            &SlotsQuery {
                barber_id: 0,
                date: now().date(),
            },
            now(),
            30,
        );
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }
}
