//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random identifier generation and constant-time comparison
//! - Password hashing (Argon2id)
//! - Cookie management
//! - CORS allow headers for browser callers

pub mod cookie;
pub mod cors;
pub mod crypto;
pub mod password;
