//! Session-scoped "charge this client" reminders.
//!
//! A confirmed appointment whose expected end passed by more than the
//! tolerance gets flagged once. Staff can snooze the prompt or dismiss it;
//! neither touches the backend. Only the checkout call changes server state.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::types::AppointmentId;

pub const DEFAULT_BUFFER_MINUTES: i64 = 30;
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 15;
pub const DEFAULT_SNOOZE_MINUTES: i64 = 10;

/// Timing rules for flagging appointments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// Fixed service length added to the start time to get the expected end.
    pub buffer: Duration,
    /// Grace period after the expected end before prompting.
    pub tolerance: Duration,
    /// How long a snoozed prompt stays hidden.
    pub snooze: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::from_minutes(
            DEFAULT_BUFFER_MINUTES,
            DEFAULT_TOLERANCE_MINUTES,
            DEFAULT_SNOOZE_MINUTES,
        )
    }
}

impl ReminderPolicy {
    pub fn from_minutes(buffer: i64, tolerance: i64, snooze: i64) -> Self {
        Self {
            buffer: Duration::minutes(buffer),
            tolerance: Duration::minutes(tolerance),
            snooze: Duration::minutes(snooze),
        }
    }

    /// Strictly past `start + buffer + tolerance`, and still confirmed.
    pub fn is_due(&self, appointment: &Appointment, now: NaiveDateTime) -> bool {
        appointment.status == AppointmentStatus::Confirmed
            && now > appointment.starts_at + self.buffer + self.tolerance
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReminderState {
    Flagged { since: NaiveDateTime },
    Snoozed { until: NaiveDateTime },
    Dismissed,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
struct ReminderEntry {
    appointment_id: AppointmentId,
    #[serde(flatten)]
    state: ReminderState,
}

/// Per-session reminder state, one entry per flagged appointment that is
/// still in the scanned window.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderBook {
    entries: Vec<ReminderEntry>,
}

impl ReminderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: AppointmentId) -> Option<ReminderState> {
        self.entries
            .iter()
            .find(|entry| entry.appointment_id == id)
            .map(|entry| entry.state)
    }

    fn set(&mut self, id: AppointmentId, state: ReminderState) {
        match self.entries.iter_mut().find(|entry| entry.appointment_id == id) {
            Some(entry) => entry.state = state,
            None => self.entries.push(ReminderEntry {
                appointment_id: id,
                state,
            }),
        }
    }

    /// Flags every due appointment that is not already flagged, dismissed or
    /// still snoozed. Returns the appointments flagged by this scan.
    pub fn scan(
        &mut self,
        appointments: &[Appointment],
        now: NaiveDateTime,
        policy: &ReminderPolicy,
    ) -> Vec<AppointmentId> {
        let mut flagged = Vec::new();

        for appointment in appointments {
            if !policy.is_due(appointment, now) {
                continue;
            }
            let eligible = match self.state(appointment.id) {
                None => true,
                Some(ReminderState::Snoozed { until }) => now >= until,
                Some(ReminderState::Flagged { .. } | ReminderState::Dismissed) => false,
            };
            if eligible {
                self.set(appointment.id, ReminderState::Flagged { since: now });
                flagged.push(appointment.id);
            }
        }

        flagged
    }

    /// Appointments whose prompt is currently shown.
    pub fn visible(&self) -> Vec<AppointmentId> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.state, ReminderState::Flagged { .. }))
            .map(|entry| entry.appointment_id)
            .collect()
    }

    /// Hides a flagged prompt until the snooze delay elapses.
    /// Returns `false` when the appointment was not flagged.
    pub fn snooze(&mut self, id: AppointmentId, now: NaiveDateTime, policy: &ReminderPolicy) -> bool {
        if !matches!(self.state(id), Some(ReminderState::Flagged { .. })) {
            return false;
        }
        self.set(
            id,
            ReminderState::Snoozed {
                until: now + policy.snooze,
            },
        );
        true
    }

    /// Never show this appointment again in the session.
    pub fn dismiss(&mut self, id: AppointmentId) {
        self.set(id, ReminderState::Dismissed);
    }

    /// Forgets the appointment once it was charged.
    pub fn resolve(&mut self, id: AppointmentId) {
        self.entries.retain(|entry| entry.appointment_id != id);
    }

    /// Forgets every appointment not in `scanned`, whatever its state.
    pub fn retain_scanned(&mut self, scanned: &[AppointmentId]) {
        self.entries
            .retain(|entry| scanned.contains(&entry.appointment_id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::appointment::fixtures::appointment;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// Exactly start + buffer + tolerance with the default policy.
    fn boundary() -> NaiveDateTime {
        start() + Duration::minutes(45)
    }

    fn confirmed() -> Vec<Appointment> {
        vec![appointment(
            5,
            Some((1, "Ana")),
            AppointmentStatus::Confirmed,
            100.0,
            start(),
        )]
    }

    fn id() -> AppointmentId {
        AppointmentId::new(5).unwrap()
    }

    #[test]
    fn appointment_at_tolerance_boundary_is_not_flagged() {
        let mut book = ReminderBook::new();
        let flagged = book.scan(&confirmed(), boundary(), &ReminderPolicy::default());
        assert!(flagged.is_empty());
        assert!(book.visible().is_empty());
    }

    #[test]
    fn one_minute_past_tolerance_is_flagged_exactly_once() {
        let mut book = ReminderBook::new();
        let policy = ReminderPolicy::default();
        let now = boundary() + Duration::minutes(1);

        assert_eq!(book.scan(&confirmed(), now, &policy), vec![id()]);
        assert!(book.scan(&confirmed(), now + Duration::minutes(5), &policy).is_empty());
        assert_eq!(book.visible(), vec![id()]);
    }

    #[test]
    fn snoozed_prompt_returns_only_after_delay() {
        let mut book = ReminderBook::new();
        let policy = ReminderPolicy::default();
        let flagged_at = boundary() + Duration::minutes(1);
        book.scan(&confirmed(), flagged_at, &policy);

        assert!(book.snooze(id(), flagged_at, &policy));
        assert!(book.visible().is_empty());

        let before = flagged_at + Duration::minutes(9);
        assert!(book.scan(&confirmed(), before, &policy).is_empty());
        assert!(book.visible().is_empty());

        let after = flagged_at + Duration::minutes(10);
        assert_eq!(book.scan(&confirmed(), after, &policy), vec![id()]);
        assert_eq!(book.visible(), vec![id()]);
    }

    #[test]
    fn dismissed_prompt_never_returns() {
        let mut book = ReminderBook::new();
        let policy = ReminderPolicy::default();
        let now = boundary() + Duration::minutes(1);
        book.scan(&confirmed(), now, &policy);

        book.dismiss(id());

        assert!(book.scan(&confirmed(), now + Duration::days(1), &policy).is_empty());
        assert_eq!(book.state(id()), Some(ReminderState::Dismissed));
    }

    #[test]
    fn only_confirmed_appointments_are_considered() {
        let mut book = ReminderBook::new();
        let mut appointments = confirmed();
        appointments[0].status = AppointmentStatus::Completed;

        let later = boundary() + Duration::hours(2);
        assert!(book.scan(&appointments, later, &ReminderPolicy::default()).is_empty());
    }

    #[test]
    fn snoozing_an_unflagged_appointment_is_rejected() {
        let mut book = ReminderBook::new();
        assert!(!book.snooze(id(), start(), &ReminderPolicy::default()));
        assert!(book.is_empty());
    }

    #[test]
    fn resolve_forgets_the_entry_and_book_survives_json() {
        let mut book = ReminderBook::new();
        let policy = ReminderPolicy::default();
        book.scan(&confirmed(), boundary() + Duration::minutes(1), &policy);

        let json = serde_json::to_string(&book).expect("serialize book");
        let mut restored: ReminderBook = serde_json::from_str(&json).expect("deserialize book");
        assert_eq!(restored, book);

        restored.resolve(id());
        assert!(restored.is_empty());
    }

    #[test]
    fn retain_scanned_drops_every_state_outside_the_window() {
        let mut book = ReminderBook::new();
        let policy = ReminderPolicy::default();
        let now = boundary() + Duration::minutes(1);
        let mut appointments = confirmed();
        appointments.push(appointment(
            6,
            Some((2, "Bruno")),
            AppointmentStatus::Confirmed,
            80.0,
            start(),
        ));
        appointments.push(appointment(
            7,
            Some((3, "Carla")),
            AppointmentStatus::Confirmed,
            90.0,
            start(),
        ));
        book.scan(&appointments, now, &policy);
        book.dismiss(id());
        assert!(book.snooze(AppointmentId::new(6).unwrap(), now, &policy));

        book.retain_scanned(&[AppointmentId::new(7).unwrap()]);

        assert_eq!(book.len(), 1);
        assert_eq!(book.state(id()), None);
        assert_eq!(book.visible(), vec![AppointmentId::new(7).unwrap()]);
    }
}
