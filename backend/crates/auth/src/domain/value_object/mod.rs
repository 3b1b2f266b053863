//! Value Object Module

pub mod client_id;
pub mod email;
pub mod session_id;
pub mod user_id;
