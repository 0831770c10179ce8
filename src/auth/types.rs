use serde::{Deserialize, Serialize};

use super::models::Principal;

/// Response structure for sign-in
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String, // The JWT token
    pub principal: Principal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub success: bool,
}
