//! Entity Module

pub mod oauth_client;
pub mod oauth_token;
pub mod session;
pub mod stored;
pub mod user;
