//! Authentication and authorization.
//!
//! - `jwt`: token creation and validation (HS256, fixed 30-day expiry)
//! - `password`: injected credential-hashing service (Argon2id default)
//! - `authorization`: the single capability predicate for team-scoped actions
//! - `middleware`: axum layers for token validation and role allow-lists

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
