use serde::Deserialize;
use validator::Validate;

use crate::domain::message::{NewMessage, NewReply};
use crate::domain::types::{Email, MessageText, PersonName, PhoneNumber};
use crate::forms::{FormError, non_blank};

#[derive(Deserialize, Validate)]
/// Public contact form.
pub struct ContactForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

impl TryFrom<ContactForm> for NewMessage {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: non_blank(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            body: MessageText::new(form.body)
                .map_err(|_| FormError::InvalidValue("empty message".into()))?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct ReplyForm {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

impl TryFrom<ReplyForm> for NewReply {
    type Error = FormError;

    fn try_from(form: ReplyForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            body: MessageText::new(form.body)
                .map_err(|_| FormError::InvalidValue("empty reply".into()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_form_sanitizes_body() {
        let message = NewMessage::try_from(ContactForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: String::new(),
            body: "¿Atienden el domingo?<script>x()</script>".into(),
        })
        .unwrap();
        assert_eq!(message.body.as_str(), "¿Atienden el domingo?");
    }

    #[test]
    fn markup_only_reply_is_rejected() {
        assert!(NewReply::try_from(ReplyForm {
            body: "<script></script>".into()
        })
        .is_err());
    }
}
