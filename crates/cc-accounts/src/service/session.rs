//! Session Orchestrator
//!
//! The login/refresh/logout state transitions over the credential store and
//! token service. Single-session model: each account holds at most one valid
//! refresh token, and every successful refresh rotates it.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{UserAccount, UserProfile};
use crate::error::{AccountsError, Result};
use crate::repository::CredentialStore;
use crate::service::token::TokenService;

/// The pair returned by login and refresh. Both tokens also travel as
/// transport cookies; the JSON copy serves bearer-token clients.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login input: at least one of username/email plus the password.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
}

impl SessionService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Mint a fresh access/refresh pair and persist the refresh token onto
    /// the account record. Storage failure is reported to the caller only as
    /// a generic error; the cause goes to the operator log.
    pub async fn issue_session(&self, account: &UserAccount) -> Result<TokenPair> {
        let access_token = self.tokens.issue_access_token(account)?;
        let refresh_token = self.tokens.issue_refresh_token(account)?;

        if let Err(e) = self
            .store
            .set_refresh_token(&account.id, Some(&refresh_token))
            .await
        {
            error!(user_id = %account.id, error = %e, "failed to persist refresh token");
            return Err(AccountsError::internal("token generation failed"));
        }

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<(UserProfile, TokenPair)> {
        if credentials.username.is_none() && credentials.email.is_none() {
            return Err(AccountsError::validation("username or email is required"));
        }

        let identifier = credentials
            .username
            .as_deref()
            .or(credentials.email.as_deref())
            .unwrap_or_default()
            .to_string();

        let account = self
            .store
            .find_by_username_or_email(credentials.username.as_deref(), credentials.email.as_deref())
            .await?
            .ok_or_else(|| AccountsError::not_found("UserAccount", &identifier))?;

        if !self
            .store
            .verify_password(&account, &credentials.password)
            .await?
        {
            return Err(AccountsError::unauthorized("invalid user credentials"));
        }

        let pair = self.issue_session(&account).await?;
        info!(user_id = %account.id, "user logged in");

        Ok((account.profile(), pair))
    }

    /// Exchange a refresh token for a fresh pair, rotating the stored token.
    ///
    /// Terminal on any failure: the stored token is only written on the
    /// success path. Concurrent refreshes with the same token race on that
    /// write; the last one persisted wins and the other pair fails the
    /// equality check on its next use.
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair> {
        let presented =
            presented.ok_or_else(|| AccountsError::unauthorized("refresh token is required"))?;

        let claims = self
            .tokens
            .verify_refresh_token(presented)
            .map_err(|_| AccountsError::unauthorized("invalid refresh token"))?;

        let account = self
            .store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AccountsError::unauthorized("invalid refresh token"))?;

        // Rotation-reuse defense: a token that is no longer the stored one
        // was already rotated away, even if its signature window is open.
        if account.refresh_token.as_deref() != Some(presented) {
            return Err(AccountsError::unauthorized("refresh token expired or used"));
        }

        self.issue_session(&account).await
    }

    /// Clear the stored refresh token. Idempotent; clearing an already
    /// logged-out (or absent) account is a no-op.
    pub async fn logout(&self, user_id: &str) -> Result<()> {
        self.store.set_refresh_token(user_id, None).await?;
        info!(user_id = %user_id, "user logged out");
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if new_password.trim().is_empty() {
            return Err(AccountsError::validation("new password must not be empty"));
        }

        let account = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountsError::not_found("UserAccount", user_id))?;

        if !self.store.verify_password(&account, old_password).await? {
            return Err(AccountsError::unauthorized("incorrect old password"));
        }

        self.store.update_password(user_id, new_password).await?;
        info!(user_id = %user_id, "password changed");
        Ok(())
    }
}
