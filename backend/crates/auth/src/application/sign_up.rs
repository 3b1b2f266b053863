//! Sign Up Use Case
//!
//! Creates a user account with a password. Profile fields are stored as
//! given; only the email and password are checked.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::user::User;
use crate::domain::repository::{PasswordRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
#[derive(Debug, Clone, Default)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub company_url: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository + PasswordRepository,
{
    repo: Arc<R>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository + PasswordRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::BadRequest(e.to_string()))?;

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = tokio::task::spawn_blocking(move || password.hash())
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task: {e}")))?
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut user = User::new(email).with_name(input.first_name, input.last_name);
        user.phone = input.phone;
        user.company_url = input.company_url;

        // A concurrent sign up for the same email loses on the unique index
        self.repo.insert_user(&user).await.map_err(|e| match e {
            AuthError::Storage(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                AuthError::EmailTaken
            }
            other => other,
        })?;
        self.repo
            .upsert_password_hash(&user.user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(user)
    }
}
