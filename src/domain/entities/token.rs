use serde::{Serialize, Deserialize};

use crate::{entities::user::{PublicUser, Role}, errors::AuthError};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: PublicUser, token: String) -> Self {
        AuthResponse { user, token }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Outcome of bearer-token verification, attached to each request that carried one.
#[derive(Debug, Clone)]
pub enum Credential {
    Verified(Claims),
    Rejected(AuthError),
}
