//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod context;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{SessionUser, access_control, require_session};
pub use router::{auth_router, auth_router_generic};
