//! Day grid of the agenda page: one row per slot, one column per barber.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::barber::Barber;
use crate::domain::block::ScheduleBlock;
use crate::domain::types::{AppointmentId, BarberId, TimeOfDay};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgendaCell {
    /// `starts_here` is false on the rows an appointment keeps occupying.
    Appointment {
        id: AppointmentId,
        client: String,
        service: String,
        status: AppointmentStatus,
        starts_here: bool,
    },
    Blocked { reason: String },
    Free,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgendaRow {
    pub time: TimeOfDay,
    pub cells: Vec<AgendaCell>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgendaColumn {
    pub barber_id: BarberId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgendaGrid {
    pub date: NaiveDate,
    pub columns: Vec<AgendaColumn>,
    pub rows: Vec<AgendaRow>,
}

/// Input of [`build_agenda_grid`].
#[derive(Debug, Clone)]
pub struct AgendaInput<'a> {
    pub date: NaiveDate,
    pub barbers: &'a [Barber],
    pub appointments: &'a [Appointment],
    pub blocks: &'a [ScheduleBlock],
    pub opening: TimeOfDay,
    pub closing: TimeOfDay,
    pub step_minutes: u16,
}

/// Lays appointments and blocks over the business hours of `date`.
///
/// Cancelled appointments are ignored. An appointment covers every row from
/// its start until its service duration ends; it wins over a block on the
/// same cell. Inactive barbers get no column.
pub fn build_agenda_grid(input: &AgendaInput<'_>) -> AgendaGrid {
    let columns: Vec<AgendaColumn> = input
        .barbers
        .iter()
        .filter(|barber| barber.active)
        .map(|barber| AgendaColumn {
            barber_id: barber.id,
            name: barber.name.clone(),
        })
        .collect();

    let appointments: Vec<&Appointment> = input
        .appointments
        .iter()
        .filter(|a| a.date() == input.date && a.status != AppointmentStatus::Cancelled)
        .collect();

    let mut rows = Vec::new();
    if input.step_minutes == 0 {
        return AgendaGrid {
            date: input.date,
            columns,
            rows,
        };
    }

    let mut current = Some(input.opening);
    while let Some(time) = current {
        if time >= input.closing {
            break;
        }
        let moment = input.date.and_time(time.to_naive_time());

        let cells = columns
            .iter()
            .map(|column| {
                let booked = appointments.iter().find(|a| {
                    a.barber_id() == Some(column.barber_id)
                        && a.starts_at <= moment
                        && moment < a.ends_at()
                });
                if let Some(appointment) = booked {
                    return AgendaCell::Appointment {
                        id: appointment.id,
                        client: appointment
                            .client
                            .as_ref()
                            .map(|client| client.name.clone())
                            .unwrap_or_default(),
                        service: appointment.service.name.clone(),
                        status: appointment.status,
                        starts_here: appointment.starts_at == moment,
                    };
                }
                input
                    .blocks
                    .iter()
                    .find(|block| block.applies_to(column.barber_id) && block.covers(moment))
                    .map_or(AgendaCell::Free, |block| AgendaCell::Blocked {
                        reason: block.reason.clone(),
                    })
            })
            .collect();

        rows.push(AgendaRow { time, cells });
        current = time.checked_add_minutes(input.step_minutes);
    }

    AgendaGrid {
        date: input.date,
        columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appointment::fixtures::appointment;
    use crate::domain::types::BlockId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    fn t(value: &str) -> TimeOfDay {
        value.parse().unwrap()
    }

    fn barber(id: i32, name: &str, active: bool) -> Barber {
        Barber {
            id: BarberId::new(id).unwrap(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: None,
            photo_url: None,
            active,
        }
    }

    #[test]
    fn grid_places_appointments_blocks_and_free_cells() {
        let barbers = vec![barber(1, "Nico", true), barber(2, "Lucas", true), barber(3, "Ex", false)];
        let mut long = appointment(
            10,
            Some((4, "Ana")),
            AppointmentStatus::Confirmed,
            100.0,
            date().and_hms_opt(9, 0, 0).unwrap(),
        );
        long.service.duration_minutes = 60;
        let cancelled = appointment(
            11,
            Some((5, "Beto")),
            AppointmentStatus::Cancelled,
            100.0,
            date().and_hms_opt(10, 0, 0).unwrap(),
        );
        let blocks = vec![ScheduleBlock {
            id: BlockId::new(1).unwrap(),
            starts_at: date().and_hms_opt(9, 0, 0).unwrap(),
            ends_at: date().and_hms_opt(10, 30, 0).unwrap(),
            reason: "Almuerzo".to_string(),
            barber_id: None,
        }];

        let appointments = [long, cancelled];
        let grid = build_agenda_grid(&AgendaInput {
            date: date(),
            barbers: &barbers,
            appointments: &appointments,
            blocks: &blocks,
            opening: t("09:00"),
            closing: t("11:00"),
            step_minutes: 30,
        });

        assert_eq!(grid.columns.len(), 2);
        let times: Vec<String> = grid.rows.iter().map(|r| r.time.to_string()).collect();
        assert_eq!(times, vec!["09:00", "09:30", "10:00", "10:30"]);

        assert!(matches!(
            grid.rows[0].cells[0],
            AgendaCell::Appointment { starts_here: true, .. }
        ));
        assert!(matches!(
            grid.rows[1].cells[0],
            AgendaCell::Appointment { starts_here: false, .. }
        ));
        assert_eq!(
            grid.rows[2].cells[0],
            AgendaCell::Blocked {
                reason: "Almuerzo".to_string()
            }
        );
        assert!(matches!(grid.rows[0].cells[1], AgendaCell::Blocked { .. }));
        assert_eq!(grid.rows[3].cells[0], AgendaCell::Free);
        assert_eq!(grid.rows[3].cells[1], AgendaCell::Free);
    }
}
