use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key holding the serialized session record.
pub const SESSION_KEY: &str = "user";

const KYC_LAST_REMINDER_PREFIX: &str = "kyc_last_reminder_";
const KYC_LOGIN_SESSION_PREFIX: &str = "kyc_login_session_";

/// Marketplace role attached to a signed-in user.
///
/// The backend treats roles as free-form strings, so unknown values are kept
/// verbatim in [`UserRole::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Buyer,
    Seller,
    Notary,
    Admin,
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Seller => "seller",
            UserRole::Notary => "notary",
            UserRole::Admin => "admin",
            UserRole::Other(value) => value,
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "buyer" => Self::Buyer,
            "seller" => Self::Seller,
            "notary" => Self::Notary,
            "admin" => Self::Admin,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<UserRole> for String {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user snapshot, persisted as-is under [`SESSION_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(rename = "kycVerified", default)]
    pub kyc_verified: bool,
    pub token: String,
}

impl UserSession {
    /// Identifier used to scope per-user auxiliary records: the id, or the
    /// email when the backend omitted one.
    pub fn owner_key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.email,
        }
    }

    pub fn kyc_last_reminder_key(&self) -> String {
        format!("{KYC_LAST_REMINDER_PREFIX}{}", self.owner_key())
    }

    pub fn kyc_login_session_key(&self) -> String {
        format!("{KYC_LOGIN_SESSION_PREFIX}{}", self.owner_key())
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
