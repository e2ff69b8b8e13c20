//! Admin credentials and session tokens.
//!
//! There is a single editor account configured from the environment. A
//! successful login yields a short-lived HS256 JWT that the admin dashboard
//! presents as a bearer token on every write.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token does not grant admin access")]
    NotAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against a PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            tracing::warn!(error = %err, "stored admin password hash is malformed");
            false
        }
    }
}

/// The configured editor account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    email: String,
    password_hash: Option<String>,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            email: email.into(),
            password_hash,
        }
    }

    /// Whether a password is configured at all; without one nobody can log in.
    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn check(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let Some(hash) = self.password_hash.as_deref() else {
            return Err(AuthError::InvalidCredentials);
        };
        if !email.trim().eq_ignore_ascii_case(&self.email) || !verify_password(password, hash) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(())
    }
}

/// Issues and verifies admin session tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        if data.claims.role != ADMIN_ROLE {
            return Err(AuthError::NotAdmin);
        }
        Ok(data.claims)
    }
}
