use actix_multipart::form::MultipartForm;
use actix_multipart::form::bytes::Bytes;
use serde::Deserialize;
use validator::Validate;

use crate::domain::barber::{NewBarber, ScheduleRange, UpdateBarber, WeekdayIndex};
use crate::domain::types::{Email, ImageUrl, PersonName, PhoneNumber, TimeOfDay};
use crate::forms::{FormError, checkbox, non_blank};
use crate::gateway::ImageUpload;

#[derive(Deserialize, Validate)]
/// Create or edit a staff profile.
pub struct BarberForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub active: Option<String>,
}

struct BarberFields {
    name: PersonName,
    email: Email,
    phone: Option<PhoneNumber>,
    photo_url: Option<ImageUrl>,
}

impl BarberForm {
    fn fields(&self) -> Result<BarberFields, FormError> {
        self.validate()?;
        Ok(BarberFields {
            name: PersonName::new(self.name.as_str()).map_err(|_| FormError::InvalidName)?,
            email: Email::new(self.email.as_str()).map_err(|_| FormError::InvalidEmail)?,
            phone: non_blank(&self.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            photo_url: non_blank(&self.photo_url)
                .map(ImageUrl::new)
                .transpose()
                .map_err(|_| FormError::InvalidUrl)?,
        })
    }
}

impl TryFrom<BarberForm> for NewBarber {
    type Error = FormError;

    fn try_from(form: BarberForm) -> Result<Self, Self::Error> {
        let fields = form.fields()?;
        Ok(Self {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            photo_url: fields.photo_url,
        })
    }
}

impl TryFrom<BarberForm> for UpdateBarber {
    type Error = FormError;

    fn try_from(form: BarberForm) -> Result<Self, Self::Error> {
        let fields = form.fields()?;
        Ok(Self {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            photo_url: fields.photo_url,
            active: checkbox(&form.active),
        })
    }
}

#[derive(Deserialize, Default)]
/// Weekly schedule editor. The three lists are parallel, one entry per range.
///
/// Decoded with `serde_html_form` so repeated keys collect into vectors.
pub struct ScheduleForm {
    #[serde(default)]
    pub weekday: Vec<u8>,
    #[serde(default)]
    pub start: Vec<String>,
    #[serde(default)]
    pub end: Vec<String>,
}

impl ScheduleForm {
    /// Parses every row, skipping rows left completely empty.
    pub fn ranges(&self) -> Result<Vec<ScheduleRange>, FormError> {
        if self.weekday.len() != self.start.len() || self.start.len() != self.end.len() {
            return Err(FormError::InvalidSchedule(
                "mismatched schedule rows".to_string(),
            ));
        }

        let mut ranges = Vec::with_capacity(self.weekday.len());
        for ((weekday, start), end) in self.weekday.iter().zip(&self.start).zip(&self.end) {
            if start.trim().is_empty() && end.trim().is_empty() {
                continue;
            }
            let weekday = WeekdayIndex::new(*weekday)
                .map_err(|err| FormError::InvalidSchedule(err.to_string()))?;
            let start: TimeOfDay = start.parse().map_err(|_| FormError::InvalidTime)?;
            let end: TimeOfDay = end.parse().map_err(|_| FormError::InvalidTime)?;
            let range = ScheduleRange::new(weekday, start, end)
                .map_err(|err| FormError::InvalidSchedule(err.to_string()))?;
            ranges.push(range);
        }

        ranges.sort_by_key(|range| (range.weekday, range.start));
        if let Some(pair) = ranges
            .windows(2)
            .find(|pair| pair[0].weekday == pair[1].weekday && pair[1].start < pair[0].end)
        {
            return Err(FormError::InvalidSchedule(format!(
                "overlapping ranges on {}",
                pair[0].weekday.label()
            )));
        }

        Ok(ranges)
    }
}

#[derive(MultipartForm)]
/// Single image upload used for staff photos and the gallery.
pub struct UploadImageForm {
    #[multipart(limit = "5MB")]
    pub image: Bytes,
}

impl UploadImageForm {
    pub fn into_upload(self) -> Result<ImageUpload, FormError> {
        let content_type = self
            .image
            .content_type
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(FormError::InvalidValue("only images can be uploaded".into()));
        }
        if self.image.data.is_empty() {
            return Err(FormError::InvalidValue("empty file".into()));
        }
        Ok(ImageUpload {
            file_name: self
                .image
                .file_name
                .unwrap_or_else(|| "imagen".to_string()),
            content_type,
            bytes: self.image.data.to_vec(),
        })
    }
}
