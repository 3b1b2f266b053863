//! Application Layer
//!
//! Use cases and application services.

pub mod check_request;
pub mod config;
pub mod issue_token;
pub mod oauth_server;
pub mod observer;
pub mod rotate_client;
pub mod session_store;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod update_profile;

// Re-exports
pub use check_request::{
    CheckOutcome, CheckRequestUseCase, RequestContext, UnauthenticatedReason,
};
pub use config::AuthConfig;
pub use issue_token::IssueTokenUseCase;
pub use oauth_server::{GrantValidator, OAuthServer, TokenInfo, TokenRequest, TokenResponse};
pub use observer::{AuthEvent, AuthMethod, AuthObserver, NoopObserver, SharedObserver, TracingObserver};
pub use rotate_client::{ListClientsUseCase, RotateClientUseCase};
pub use session_store::SessionStore;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_profile::{ProfileChanges, UpdateProfileUseCase};
