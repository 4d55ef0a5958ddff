use serde::{Deserialize, Serialize};

use crate::domain::types::{BarberId, Email, PersonName, PhoneNumber, UserId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Client,
    Barber,
    Admin,
}

impl Role {
    /// Barbers and admins operate the agenda and the cash register.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Barber | Role::Admin)
    }
}

/// The signed-in account, kept in the identity cookie between requests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Staff profile linked to a barber account.
    #[serde(default)]
    pub barber_id: Option<BarberId>,
    /// Bearer token injected on every backend call.
    pub token: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Response of `POST /auth/login`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountProfile,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AccountProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub barber_id: Option<BarberId>,
}

impl From<LoginResponse> for AuthenticatedUser {
    fn from(response: LoginResponse) -> Self {
        let LoginResponse { token, user } = response;
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            barber_id: user.barber_id,
            token,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewAccount {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub password: String,
}
