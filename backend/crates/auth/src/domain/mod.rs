//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    oauth_client::OAuthClient,
    oauth_token::{OAuthToken, TokenKey},
    session::Session,
    stored::Stored,
    user::User,
};
pub use repository::{
    AuthRepository, ClientRepository, PasswordRepository, SessionRepository, TokenRepository,
    UserRepository,
};
