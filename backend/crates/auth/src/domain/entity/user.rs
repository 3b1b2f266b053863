//! User Entity
//!
//! Profile record of a person who can sign in. The password hash lives in
//! its own table.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{
    email::Email,
    user_id::{UserId, new_user_id},
};

/// User entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "id")]
    pub user_id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub company_url: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh identifier and empty profile fields
    pub fn new(email: Email) -> Self {
        Self {
            user_id: new_user_id(),
            email,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            company_url: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}
