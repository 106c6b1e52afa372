//! Token Service
//!
//! Issues and verifies the two token classes. Access tokens carry the
//! identity claims and are verified statelessly (signature + expiry, nothing
//! else); refresh tokens carry only the user id and are additionally checked
//! against the stored value by the session orchestrator. The two classes use
//! independent signing secrets and expiries.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::UserAccount;
use crate::error::{AccountsError, Result};

/// Signing configuration. Both secrets are required and must differ so that
/// compromise of one class cannot forge the other.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_secs: 15 * 60,
            refresh_ttl_secs: 10 * 24 * 60 * 60,
        }
    }
}

/// Claims carried by an access token. Verification succeeding means the
/// claims may be trusted as-is; there is no storage cross-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a refresh token: the user id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Result<Self> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(AccountsError::configuration(
                "access and refresh token secrets must be configured",
            ));
        }
        if config.access_secret == config.refresh_secret {
            return Err(AccountsError::configuration(
                "access and refresh token secrets must be independent",
            ));
        }

        // Zero leeway: an expired token is expired.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_ttl_secs),
            validation,
        })
    }

    /// Mint a short-lived access token for the account.
    pub fn issue_access_token(&self, account: &UserAccount) -> Result<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: account.id.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            fullname: account.fullname.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AccountsError::internal(format!("access token signing failed: {}", e)))
    }

    /// Mint a long-lived refresh token for the account.
    pub fn issue_refresh_token(&self, account: &UserAccount) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshTokenClaims {
            sub: account.id.clone(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AccountsError::internal(format!("refresh token signing failed: {}", e)))
    }

    /// Check signature and expiry of an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims> {
        decode::<AccessTokenClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Check signature and expiry of a refresh token. Storage is not
    /// consulted here; the equality check against the persisted token is the
    /// session orchestrator's job.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims> {
        decode::<RefreshTokenClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> AccountsError {
    match error.kind() {
        ErrorKind::ExpiredSignature => AccountsError::TokenExpired,
        _ => AccountsError::invalid_token(error.to_string()),
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
