use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ANONYMOUS_PROVIDER: &str = "anonymous";

/// How a viewer asks to be identified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SignInMethod {
    Anonymous,
    /// Identity already asserted by an external provider
    Federated {
        provider: String,
        subject: String,
        display_name: Option<String>,
    },
}

/// The signed-in viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub display_name: String,
    pub provider: String,
    pub is_anonymous: bool,
    pub signed_in_at: DateTime<Utc>,
}

impl Principal {
    pub fn anonymous(display_name: String) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            display_name,
            provider: ANONYMOUS_PROVIDER.to_string(),
            is_anonymous: true,
            signed_in_at: Utc::now(),
        }
    }

    /// Federated uids are stable per provider and subject
    pub fn federated(provider: &str, subject: &str, display_name: String) -> Self {
        Self {
            uid: format!("{}:{}", provider.to_lowercase(), subject),
            display_name,
            provider: provider.to_lowercase(),
            is_anonymous: false,
            signed_in_at: Utc::now(),
        }
    }
}

/// JWT claims identifying a principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityClaims {
    pub sub: String,
    pub name: String,
    pub provider: String,
    pub anonymous: bool,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}
