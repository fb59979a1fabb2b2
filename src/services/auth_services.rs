use std::time::{SystemTime, UNIX_EPOCH};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token encoding failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub exp: u64,
}

/// Stateless bearer-token auth: argon2id password hashes in the database,
/// HS256-signed tokens on the wire.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl AuthService {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_secs: u64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs,
        }
    }

    pub fn new_from_env(token_ttl_secs: u64) -> anyhow::Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET not set"))?;
        Ok(Self::new(jwt_secret, token_ttl_secs))
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: unix_now() + self.token_ttl_secs,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn decode_token(&self, token: &str) -> Result<(Uuid, String), AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AuthError::InvalidToken)?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok((user_id, data.claims.username))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "auth".into(),
            email: "auth@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_roundtrip() {
        let auth = AuthService::new("test-secret", 3600);
        let hash = auth.hash_password("s3cret-pass").unwrap();
        assert!(auth.verify_password("s3cret-pass", &hash).is_ok());
        assert!(auth.verify_password("wrong-pass", &hash).is_err());
    }

    #[test]
    fn token_roundtrip() {
        let auth = AuthService::new("test-secret", 3600);
        let user = test_user();
        let token = auth.issue_token(&user).unwrap();
        let (id, username) = auth.decode_token(&token).unwrap();
        assert_eq!(id, user.id);
        assert_eq!(username, "auth");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let auth = AuthService::new("test-secret", 3600);
        let other = AuthService::new("other-secret", 3600);
        let token = other.issue_token(&test_user()).unwrap();
        assert!(matches!(auth.decode_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = AuthService::new("test-secret", 3600);
        assert!(auth.decode_token("not.a.jwt").is_err());
    }
}
