use crate::domain::auth::{AuthenticatedUser, Credentials, NewAccount};
use crate::domain::types::Email;
use crate::forms::auth::{LoginForm, RecoverForm, RegisterForm};
use crate::gateway::AuthGateway;
use crate::gateway::errors::GatewayError;
use crate::services::{ServiceError, ServiceResult, form_error};

/// Exchanges the credentials for a session user carrying the backend token.
pub fn login<G>(gateway: &G, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    G: AuthGateway + ?Sized,
{
    let credentials = Credentials::try_from(form).map_err(form_error)?;

    match gateway.login(&credentials) {
        Ok(response) => Ok(response.into()),
        Err(GatewayError::Unauthorized | GatewayError::BadRequest(_)) => {
            log::info!("Rejected login for {}", credentials.email);
            Err(ServiceError::Form("Email o contraseña incorrectos.".to_string()))
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            Err(err.into())
        }
    }
}

pub fn register<G>(gateway: &G, form: RegisterForm) -> ServiceResult<()>
where
    G: AuthGateway + ?Sized,
{
    let account = NewAccount::try_from(form).map_err(form_error)?;

    match gateway.register(&account) {
        Ok(()) => Ok(()),
        Err(GatewayError::Conflict(_)) => Err(ServiceError::Form(
            "Ya existe una cuenta con ese email.".to_string(),
        )),
        Err(err) => {
            log::error!("Failed to register account: {err}");
            Err(err.into())
        }
    }
}

/// Asks the backend to email a reset link. Unknown addresses are not
/// reported to the caller.
pub fn recover_password<G>(gateway: &G, form: RecoverForm) -> ServiceResult<()>
where
    G: AuthGateway + ?Sized,
{
    let email = Email::try_from(form).map_err(form_error)?;

    match gateway.request_password_reset(&email) {
        Ok(()) | Err(GatewayError::NotFound) => Ok(()),
        Err(err) => {
            log::error!("Failed to request password reset: {err}");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{AccountProfile, LoginResponse, Role};
    use crate::domain::types::UserId;
    use crate::gateway::mock::MockGateway;

    fn form() -> LoginForm {
        LoginForm {
            email: "Lucas@Example.com".into(),
            password: "secreto".into(),
        }
    }

    #[test]
    fn login_returns_session_user() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_login()
            .withf(|credentials| credentials.email.as_str() == "lucas@example.com")
            .returning(|_| {
                Ok(LoginResponse {
                    token: "jwt".into(),
                    user: AccountProfile {
                        id: UserId::new(3).unwrap(),
                        name: "Lucas".into(),
                        email: "lucas@example.com".into(),
                        role: Role::Admin,
                        barber_id: None,
                    },
                })
            });

        let user = login(&gateway, form()).unwrap();

        assert_eq!(user.token, "jwt");
        assert!(user.is_admin());
    }

    #[test]
    fn rejected_credentials_become_form_error() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_login()
            .returning(|_| Err(GatewayError::Unauthorized));

        assert!(matches!(
            login(&gateway, form()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn invalid_form_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_login().never();

        let result = login(
            &gateway,
            LoginForm {
                email: "no-email".into(),
                password: String::new(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn unknown_email_recovery_still_succeeds() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_request_password_reset()
            .returning(|_| Err(GatewayError::NotFound));

        let result = recover_password(
            &gateway,
            RecoverForm {
                email: "nadie@example.com".into(),
            },
        );

        assert!(result.is_ok());
    }
}
