//! Service Layer
//!
//! Business logic for the account backend: password hashing, token
//! issuance/verification, the session lifecycle, and registration.

pub mod password;
pub mod token;
pub mod session;
pub mod registration;
pub mod media;

pub use password::PasswordService;
pub use token::{TokenService, TokenConfig, AccessTokenClaims, RefreshTokenClaims, extract_bearer_token};
pub use session::{SessionService, TokenPair, LoginCredentials};
pub use registration::{RegistrationService, Registration};
pub use media::{MediaUploader, MediaHostClient, MediaAsset, StagedFile};
