use serde::Deserialize;
use validator::Validate;

use crate::domain::appointment::{Checkout, PaymentMethod};
use crate::domain::block::NewScheduleBlock;
use crate::domain::types::BarberId;
use crate::forms::{FormError, non_blank, parse_datetime};

#[derive(Deserialize, Validate)]
/// Schedule block (bloqueo) created from the agenda page.
pub struct AddBlockForm {
    pub starts_at: String,
    pub ends_at: String,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    /// Empty blocks the whole business.
    #[serde(default)]
    pub barber_id: String,
}

impl TryFrom<AddBlockForm> for NewScheduleBlock {
    type Error = FormError;

    fn try_from(form: AddBlockForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let barber_id = non_blank(&form.barber_id)
            .map(|raw| {
                raw.parse::<i32>()
                    .ok()
                    .and_then(|id| BarberId::new(id).ok())
                    .ok_or(FormError::InvalidId)
            })
            .transpose()?;
        NewScheduleBlock::try_new(
            parse_datetime(&form.starts_at)?,
            parse_datetime(&form.ends_at)?,
            &form.reason,
            barber_id,
        )
        .map_err(|err| FormError::InvalidSchedule(err.to_string()))
    }
}

#[derive(Deserialize, Validate)]
/// Closing an appointment at the register.
pub struct CheckoutForm {
    pub payment_method: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

impl TryFrom<CheckoutForm> for Checkout {
    type Error = FormError;

    fn try_from(form: CheckoutForm) -> Result<Self, Self::Error> {
        form.validate().map_err(|_| FormError::InvalidAmount)?;
        if !form.amount.is_finite() {
            return Err(FormError::InvalidAmount);
        }
        Ok(Self {
            payment_method: PaymentMethod::try_from(form.payment_method.as_str())
                .map_err(|_| FormError::InvalidPaymentMethod)?,
            amount: form.amount,
        })
    }
}
