//! Bookable time slots derived from a barber's weekly schedule.
//!
//! The list only hides slots that are likely unavailable. The backend stays
//! authoritative: a race between two clients is settled by it rejecting the
//! second booking with a conflict.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::barber::{ScheduleRange, WeekdayIndex};
use crate::domain::block::ScheduleBlock;
use crate::domain::types::{BarberId, TimeOfDay};

/// Default distance between two consecutive slots.
pub const DEFAULT_SLOT_STEP_MINUTES: u16 = 30;

/// Everything needed to compute the free slots of one barber on one date.
#[derive(Debug, Clone)]
pub struct SlotRequest<'a> {
    pub date: NaiveDate,
    pub barber_id: BarberId,
    pub schedule: &'a [ScheduleRange],
    /// Times already taken on `date`, as reported by the backend.
    pub occupied: &'a [TimeOfDay],
    pub blocks: &'a [ScheduleBlock],
    pub now: NaiveDateTime,
    pub step_minutes: u16,
}

/// Returns the sorted bookable times for the request.
///
/// Slots start at each matching range's start and advance by `step_minutes`
/// while they begin before the range end. Occupied times, times covered by a
/// block for this barber or the whole business, and times not after `now` are
/// dropped.
pub fn available_slots(request: &SlotRequest<'_>) -> Vec<TimeOfDay> {
    if request.step_minutes == 0 {
        return Vec::new();
    }

    let weekday = WeekdayIndex::of(request.date);
    let occupied: BTreeSet<TimeOfDay> = request.occupied.iter().copied().collect();
    let blocks: Vec<&ScheduleBlock> = request
        .blocks
        .iter()
        .filter(|block| block.applies_to(request.barber_id) && block.touches_date(request.date))
        .collect();

    let mut slots = BTreeSet::new();

    for range in request.schedule.iter().filter(|r| r.weekday == weekday) {
        let mut current = Some(range.start);
        while let Some(slot) = current {
            if slot >= range.end {
                break;
            }
            let moment = request.date.and_time(slot.to_naive_time());
            let taken = occupied.contains(&slot);
            let blocked = blocks.iter().any(|block| block.covers(moment));
            if !taken && !blocked && moment > request.now {
                slots.insert(slot);
            }
            current = slot.checked_add_minutes(request.step_minutes);
        }
    }

    slots.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::BlockId;

    fn t(value: &str) -> TimeOfDay {
        value.parse().expect("valid time")
    }

    fn range(weekday: u8, start: &str, end: &str) -> ScheduleRange {
        ScheduleRange::new(WeekdayIndex::new(weekday).unwrap(), t(start), t(end)).unwrap()
    }

    // 2026-03-10 is a Tuesday (weekday 2).
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn long_ago() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn request<'a>(
        schedule: &'a [ScheduleRange],
        occupied: &'a [TimeOfDay],
        blocks: &'a [ScheduleBlock],
        now: NaiveDateTime,
    ) -> SlotRequest<'a> {
        SlotRequest {
            date: tuesday(),
            barber_id: BarberId::new(1).unwrap(),
            schedule,
            occupied,
            blocks,
            now,
            step_minutes: DEFAULT_SLOT_STEP_MINUTES,
        }
    }

    fn rendered(slots: Vec<TimeOfDay>) -> Vec<String> {
        slots.into_iter().map(|slot| slot.to_string()).collect()
    }

    #[test]
    fn no_range_for_weekday_yields_nothing() {
        let schedule = [range(1, "09:00", "18:00"), range(3, "09:00", "18:00")];
        let slots = available_slots(&request(&schedule, &[], &[], long_ago()));
        assert!(slots.is_empty());
    }

    #[test]
    fn morning_range_yields_half_hour_slots() {
        let schedule = [range(2, "09:00", "11:00")];
        let slots = available_slots(&request(&schedule, &[], &[], long_ago()));
        assert_eq!(rendered(slots), vec!["09:00", "09:30", "10:00", "10:30"]);
    }

    #[test]
    fn occupied_slots_are_excluded() {
        let schedule = [range(2, "09:00", "11:00")];
        let occupied = [t("09:30")];
        let slots = available_slots(&request(&schedule, &occupied, &[], long_ago()));
        assert_eq!(rendered(slots), vec!["09:00", "10:00", "10:30"]);
    }

    #[test]
    fn past_slots_are_excluded_today() {
        let schedule = [range(2, "09:00", "11:00")];
        let now = tuesday().and_hms_opt(9, 45, 0).unwrap();
        let slots = available_slots(&request(&schedule, &[], &[], now));
        assert_eq!(rendered(slots), vec!["10:00", "10:30"]);
    }

    #[test]
    fn split_shift_ranges_are_merged_in_order() {
        let schedule = [range(2, "16:00", "17:00"), range(2, "09:00", "10:00")];
        let slots = available_slots(&request(&schedule, &[], &[], long_ago()));
        assert_eq!(rendered(slots), vec!["09:00", "09:30", "16:00", "16:30"]);
    }

    #[test]
    fn blocks_for_the_barber_or_business_hide_slots() {
        let schedule = [range(2, "09:00", "11:00")];
        let blocks = [
            ScheduleBlock {
                id: BlockId::new(1).unwrap(),
                starts_at: tuesday().and_hms_opt(9, 0, 0).unwrap(),
                ends_at: tuesday().and_hms_opt(9, 30, 0).unwrap(),
                reason: "Reunión".to_string(),
                barber_id: None,
            },
            ScheduleBlock {
                id: BlockId::new(2).unwrap(),
                starts_at: tuesday().and_hms_opt(10, 0, 0).unwrap(),
                ends_at: tuesday().and_hms_opt(11, 0, 0).unwrap(),
                reason: "Otro barbero".to_string(),
                barber_id: Some(BarberId::new(9).unwrap()),
            },
        ];
        let slots = available_slots(&request(&schedule, &[], &blocks, long_ago()));
        assert_eq!(rendered(slots), vec!["09:30", "10:00", "10:30"]);
    }

    #[test]
    fn zero_step_yields_nothing() {
        let schedule = [range(2, "09:00", "11:00")];
        let mut req = request(&schedule, &[], &[], long_ago());
        req.step_minutes = 0;
        assert!(available_slots(&req).is_empty());
    }
}
