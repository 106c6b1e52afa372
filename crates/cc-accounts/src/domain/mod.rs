//! Domain Models
//!
//! Core account entities. All entities use string ids and camelCase field
//! names in the document store.

pub mod user;

pub use user::*;
