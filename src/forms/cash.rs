use serde::Deserialize;
use validator::Validate;

use crate::domain::appointment::PaymentMethod;
use crate::domain::cash::{MovementKind, NewMovement};
use crate::domain::types::{Amount, BarberId, Concept};
use crate::forms::{FormError, non_blank};

#[derive(Deserialize, Validate)]
/// Manual income or expense typed on the cash page.
pub struct AddMovementForm {
    /// `income` or `expense`.
    pub kind: String,
    pub amount: f64,
    #[validate(length(min = 1, max = 200))]
    pub concept: String,
    #[serde(default)]
    pub payment_method: String,
}

impl AddMovementForm {
    /// Builds the payload, attributing it to the barber who typed it.
    pub fn into_movement(self, barber_id: Option<BarberId>) -> Result<NewMovement, FormError> {
        self.validate()?;
        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "income" | "ingreso" => MovementKind::Income,
            "expense" | "egreso" => MovementKind::Expense,
            other => return Err(FormError::InvalidValue(format!("movement kind {other}"))),
        };
        let payment_method = non_blank(&self.payment_method)
            .map(PaymentMethod::try_from)
            .transpose()
            .map_err(|_| FormError::InvalidPaymentMethod)?;

        Ok(NewMovement {
            amount: Amount::new(self.amount).map_err(|_| FormError::InvalidAmount)?,
            kind,
            concept: Concept::new(self.concept).map_err(|_| FormError::InvalidName)?,
            payment_method,
            barber_id,
        })
    }
}
