use serde::Deserialize;
use validator::Validate;

use crate::domain::business::UpdateBusiness;
use crate::domain::types::{Email, ImageUrl, PersonName, PhoneNumber, TimeOfDay};
use crate::forms::{FormError, non_blank};

#[derive(Deserialize, Validate)]
/// Business settings page. The gallery is edited through uploads and kept
/// as is.
pub struct BusinessForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub instagram: String,
    pub opening_time: String,
    pub closing_time: String,
    #[validate(range(max = 100))]
    pub deposit_percent: u8,
}

impl BusinessForm {
    /// Builds the update payload keeping the current gallery.
    pub fn into_update(self, gallery: &[String]) -> Result<UpdateBusiness, FormError> {
        self.validate()?;
        let opening_time: TimeOfDay = self.opening_time.parse().map_err(|_| FormError::InvalidTime)?;
        let closing_time: TimeOfDay = self.closing_time.parse().map_err(|_| FormError::InvalidTime)?;
        if closing_time <= opening_time {
            return Err(FormError::InvalidSchedule(
                "closing time must be after opening time".into(),
            ));
        }

        Ok(UpdateBusiness {
            name: PersonName::new(self.name.as_str()).map_err(|_| FormError::InvalidName)?,
            address: non_blank(&self.address).map(str::to_string),
            phone: non_blank(&self.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            email: non_blank(&self.email)
                .map(Email::new)
                .transpose()
                .map_err(|_| FormError::InvalidEmail)?,
            instagram: non_blank(&self.instagram)
                .map(|handle| handle.trim_start_matches('@').to_string()),
            opening_time,
            closing_time,
            deposit_percent: self.deposit_percent,
            gallery: gallery
                .iter()
                .map(|url| ImageUrl::new(url.as_str()))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
