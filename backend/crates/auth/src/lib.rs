//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Forward-auth check endpoint for a fronting reverse proxy
//! - Email + password login with server-side sessions in a cookie
//! - OAuth2 client credentials with rotation and bearer token validation
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Session cookies are HttpOnly, Secure when served over TLS
//! - Clients and tokens are soft-deleted, never reused once retired
//! - Client secrets are shown once, at rotation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::sqlite::SqliteAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod observer {
    pub use crate::application::observer::*;
}

pub mod store {
    pub use crate::infra::sqlite::SqliteAuthRepository as AuthStore;
}
