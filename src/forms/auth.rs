use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::{Credentials, NewAccount};
use crate::domain::types::{Email, PersonName, PhoneNumber};
use crate::forms::{FormError, non_blank};

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

impl TryFrom<RegisterForm> for NewAccount {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let phone = non_blank(&form.phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone,
            password: form.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RecoverForm {
    #[validate(email)]
    pub email: String,
}

impl TryFrom<RecoverForm> for Email {
    type Error = FormError;

    fn try_from(form: RecoverForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Email::new(form.email).map_err(|_| FormError::InvalidEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form(password_confirmation: &str) -> RegisterForm {
        RegisterForm {
            name: "Ana".into(),
            email: "ANA@example.com".into(),
            phone: "+1 (202) 555-0143".into(),
            password: "secreto123".into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    #[test]
    fn register_form_builds_normalized_account() {
        let account = NewAccount::try_from(register_form("secreto123")).unwrap();
        assert_eq!(account.email.as_str(), "ana@example.com");
        assert_eq!(
            account.phone.as_ref().map(PhoneNumber::as_str),
            Some("+12025550143")
        );
    }

    #[test]
    fn register_form_rejects_mismatched_passwords() {
        assert!(matches!(
            NewAccount::try_from(register_form("otra-cosa")),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn login_form_requires_email() {
        let form = LoginForm {
            email: "nope".into(),
            password: "x".into(),
        };
        assert!(Credentials::try_from(form).is_err());
    }
}
