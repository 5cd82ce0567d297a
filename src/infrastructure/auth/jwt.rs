use jsonwebtoken::{encode, Header, decode, Validation, Algorithm};
use chrono::{Utc, Duration};
use crate::entities::token::Claims;
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.expiration).timestamp().max(0) as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp().max(0) as usize,
            exp,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        self.create_jwt(user)
    }

    fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::{Role, UserInsert};
    use uuid::Uuid;

    fn user(role: Role) -> User {
        UserInsert {
            username: "jane".into(),
            email: "jane@example.com".into(),
            password_hash: "hash".into(),
            role,
        }
        .into_user(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn token_round_trip_keeps_subject_and_role() {
        let service = JwtService::new(&AppConfig::for_testing());
        let admin = user(Role::Admin);

        let token = service.create_jwt(&admin).unwrap();
        let claims = service.decode_jwt(&token).unwrap();

        assert_eq!(claims.sub, admin.id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_tokens_are_rejected_as_expired() {
        let mut config = AppConfig::for_testing();
        config.jwt_expiration_minutes = -5;
        let service = JwtService::new(&config);

        let token = service.create_jwt(&user(Role::User)).unwrap();
        assert_eq!(service.decode_jwt(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_invalid() {
        let service = JwtService::new(&AppConfig::for_testing());
        let mut other = AppConfig::for_testing();
        other.jwt_secret = "another_secret_that_is_also_long_enough_for_hs512".into();
        let foreign = JwtService::new(&other).create_jwt(&user(Role::User)).unwrap();

        assert_eq!(service.decode_jwt(&foreign).unwrap_err(), AuthError::InvalidToken);
        assert_eq!(service.decode_jwt("not.a.token").unwrap_err(), AuthError::InvalidToken);
    }
}
