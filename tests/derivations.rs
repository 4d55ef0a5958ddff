//! Derived views computed from backend payloads.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use barberia_web::domain::agenda::{AgendaCell, AgendaInput, build_agenda_grid};
use barberia_web::domain::appointment::Appointment;
use barberia_web::domain::availability::{SlotRequest, available_slots};
use barberia_web::domain::barber::{Barber, ScheduleRange};
use barberia_web::domain::block::ScheduleBlock;
use barberia_web::domain::client::{ClientTier, summarize_clients};
use barberia_web::domain::types::{BarberId, TimeOfDay};

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
}

fn appointments() -> Vec<Appointment> {
    serde_json::from_value(json!([
        {
            "id": 1,
            "starts_at": "2026-06-01T10:00:00",
            "status": "COMPLETED",
            "price": 5000.0,
            "service": { "id": 1, "name": "Corte", "price": 5000.0, "duration_minutes": 30 },
            "barber": { "id": 1, "name": "Mateo" },
            "client": { "id": 7, "name": "Lucía", "email": "lucia@example.com" },
            "payment": "PAID"
        },
        {
            "id": 2,
            "starts_at": "2026-07-01T10:00:00",
            "status": "CONFIRMED",
            "price": 8000.0,
            "service": { "id": 2, "name": "Corte y barba", "price": 8000.0, "duration_minutes": 60 },
            "barber": { "id": 1, "name": "Mateo" },
            "client": { "id": 7, "name": "Lucía" }
        },
        {
            "id": 3,
            "starts_at": "2026-07-01T11:00:00",
            "status": "CANCELLED",
            "price": 5000.0,
            "service": { "id": 1, "name": "Corte", "price": 5000.0, "duration_minutes": 30 },
            "barber": { "id": 1, "name": "Mateo" },
            "client": { "id": 9, "name": "Bruno" }
        }
    ]))
    .unwrap()
}

fn barbers() -> Vec<Barber> {
    serde_json::from_value(json!([
        { "id": 1, "name": "Mateo", "email": "mateo@example.com" },
        { "id": 2, "name": "Santi", "email": "santi@example.com", "active": false }
    ]))
    .unwrap()
}

#[test]
fn client_summaries_count_visits_and_cancellations() {
    let today = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let summaries = summarize_clients(&appointments(), today);

    assert_eq!(summaries.len(), 2);
    let lucia = &summaries[0];
    assert_eq!(lucia.name, "Lucía");
    assert_eq!(lucia.total_visits, 1);
    assert_eq!(lucia.total_appointments, 2);
    assert_eq!(lucia.total_spent, 5000.0);
    assert_eq!(lucia.tier, ClientTier::New);

    let bruno = &summaries[1];
    assert_eq!(bruno.cancelled, 1);
    assert_eq!(bruno.last_visit, None);
}

#[test]
fn agenda_grid_spans_appointment_duration() {
    let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let barbers = barbers();
    let appointments = appointments();
    let blocks: Vec<ScheduleBlock> = serde_json::from_value(json!([
        { "id": 4, "starts_at": "2026-07-01T13:00:00", "ends_at": "2026-07-01T14:00:00", "reason": "Almuerzo" }
    ]))
    .unwrap();

    let grid = build_agenda_grid(&AgendaInput {
        date,
        barbers: &barbers,
        appointments: &appointments,
        blocks: &blocks,
        opening: TimeOfDay::from_hm(10, 0).unwrap(),
        closing: TimeOfDay::from_hm(14, 0).unwrap(),
        step_minutes: 30,
    });

    assert_eq!(grid.columns.len(), 1);
    assert_eq!(grid.rows.len(), 8);
    assert!(matches!(
        &grid.rows[0].cells[0],
        AgendaCell::Appointment { starts_here: true, client, .. } if client == "Lucía"
    ));
    assert!(matches!(
        &grid.rows[1].cells[0],
        AgendaCell::Appointment { starts_here: false, .. }
    ));
    // The cancelled 11:00 appointment leaves the slot free.
    assert_eq!(grid.rows[2].cells[0], AgendaCell::Free);
    assert!(matches!(&grid.rows[6].cells[0], AgendaCell::Blocked { reason } if reason == "Almuerzo"));
}

#[test]
fn slots_skip_taken_blocked_and_past_times() {
    // 2026-07-01 is a Wednesday.
    let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let schedule: Vec<ScheduleRange> = serde_json::from_value(json!([
        { "weekday": 3, "start": "10:00", "end": "13:00" },
        { "weekday": 4, "start": "10:00", "end": "19:00" }
    ]))
    .unwrap();
    let blocks: Vec<ScheduleBlock> = serde_json::from_value(json!([
        { "id": 1, "starts_at": "2026-07-01T12:00:00", "ends_at": "2026-07-01T13:00:00", "reason": "Trámite", "barber_id": 1 },
        { "id": 2, "starts_at": "2026-07-01T10:00:00", "ends_at": "2026-07-01T13:00:00", "reason": "Otro barbero", "barber_id": 2 }
    ]))
    .unwrap();
    let occupied = [TimeOfDay::from_hm(11, 0).unwrap()];

    let slots = available_slots(&SlotRequest {
        date,
        barber_id: BarberId::new(1).unwrap(),
        schedule: &schedule,
        occupied: &occupied,
        blocks: &blocks,
        now: at("2026-07-01", "10:00"),
        step_minutes: 30,
    });

    let slots: Vec<String> = slots.iter().map(ToString::to_string).collect();
    assert_eq!(slots, vec!["10:30", "11:30"]);
}
