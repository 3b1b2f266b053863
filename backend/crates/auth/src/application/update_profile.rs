//! Update Profile Use Case
//!
//! Signed-in users edit their own profile fields. Email and password are
//! not editable here.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Fields to change; `None` or an empty string leaves the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_url: Option<String>,
}

impl ProfileChanges {
    fn apply(self, user: &mut User) {
        let fields = [
            (self.first_name, &mut user.first_name),
            (self.last_name, &mut user.last_name),
            (self.phone, &mut user.phone),
            (self.company_url, &mut user.company_url),
        ];
        for (change, field) in fields {
            if let Some(value) = change.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }
}

/// Update profile use case
pub struct UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `actor` is the session user; only their own record may change
    pub async fn execute(
        &self,
        actor: &UserId,
        target: &UserId,
        changes: ProfileChanges,
    ) -> AuthResult<User> {
        if actor != target {
            tracing::warn!(actor = %actor, target = %target, "Profile update for another user");
            return Err(AuthError::NotOwner);
        }

        let mut user = self
            .repo
            .find_user_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        changes.apply(&mut user);

        if !self.repo.update_user_profile(&user).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user.user_id, "User profile updated");

        Ok(user)
    }
}
