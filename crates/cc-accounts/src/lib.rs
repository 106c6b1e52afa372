//! ClipCast Accounts
//!
//! User-account backend for the ClipCast platform:
//! - Registration with avatar/cover-image upload to an external media host
//! - Credential login with Argon2id password verification
//! - Short-lived access tokens and rotating refresh tokens
//! - Single-session model: one active refresh token per account

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;

pub use error::AccountsError;
