use crate::{entities::{token::Claims, user::User}, errors::AuthError};

#[cfg_attr(test, mockall::automock)]
pub trait TokenServiceRepository: Send + Sync {
    /// Issues a signed token whose subject is the user's id.
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Verifies signature and expiry, returning the claims.
    fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError>;
}
