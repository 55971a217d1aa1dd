//! Session bearer tokens (HS256 JWT)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

const ISSUER: &str = "medequip-portal";

#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl TokenConfig {
    pub fn from_security(config: &SecurityConfig) -> Self {
        Self {
            secret: config.token_secret.clone(),
            expiration_hours: config.session_hours,
            issuer: ISSUER.to_string(),
        }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Server-side session id
    pub sid: String,
    /// Account id
    pub sub: String,
    /// Display name at login
    pub name: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl SessionClaims {
    pub fn new(session_id: &str, account_id: &str, name: &str, config: &TokenConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sid: session_id.to_string(),
            sub: account_id.to_string(),
            name: name.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

pub fn create_token(
    claims: &SessionClaims,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer.
pub fn verify_token(
    token: &str,
    config: &TokenConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
