//! Cash register (caja) ledger rows and the summary rendered on the cash page.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::appointment::PaymentMethod;
use crate::domain::types::{Amount, AppointmentId, BarberId, Concept, MovementId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Income => "Ingreso",
            MovementKind::Expense => "Egreso",
        }
    }
}

/// A read-only ledger row (movimiento).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: MovementId,
    pub amount: f64,
    pub kind: MovementKind,
    pub concept: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub appointment_id: Option<AppointmentId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl Movement {
    /// Amount with the sign applied by its kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            MovementKind::Income => self.amount,
            MovementKind::Expense => -self.amount,
        }
    }
}

/// Balance plus ledger as returned by `GET /caja`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CashRegister {
    pub balance: f64,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

/// Manual entry created from the cash page.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewMovement {
    pub amount: Amount,
    pub kind: MovementKind,
    pub concept: Concept,
    pub payment_method: Option<PaymentMethod>,
    pub barber_id: Option<BarberId>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MethodTotal {
    pub method: String,
    pub total: f64,
}

/// Totals derived from the fetched ledger. `balance` is the server's figure.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CashSummary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub by_method: Vec<MethodTotal>,
    pub movements: Vec<Movement>,
}

impl CashSummary {
    pub fn from_register(register: CashRegister) -> Self {
        let CashRegister {
            balance,
            mut movements,
        } = register;

        let mut income = 0.0;
        let mut expense = 0.0;
        let mut by_method: BTreeMap<&'static str, f64> = BTreeMap::new();

        for movement in &movements {
            match movement.kind {
                MovementKind::Income => {
                    income += movement.amount;
                    let label = movement
                        .payment_method
                        .map(|method| method.label())
                        .unwrap_or("Sin especificar");
                    *by_method.entry(label).or_default() += movement.amount;
                }
                MovementKind::Expense => expense += movement.amount,
            }
        }

        movements.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Self {
            balance,
            income,
            expense,
            net: income - expense,
            by_method: by_method
                .into_iter()
                .map(|(method, total)| MethodTotal {
                    method: method.to_string(),
                    total,
                })
                .collect(),
            movements,
        }
    }
}

/// Renders the ledger as a CSV spreadsheet.
pub fn export_movements_csv(movements: &[Movement]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["fecha", "tipo", "concepto", "monto", "metodo", "turno"])?;

    for movement in movements {
        writer.write_record([
            movement.created_at.format("%Y-%m-%d %H:%M").to_string(),
            movement.kind.label().to_string(),
            movement.concept.clone(),
            format!("{:.2}", movement.amount),
            movement
                .payment_method
                .map(|method| method.label().to_string())
                .unwrap_or_default(),
            movement
                .appointment_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
