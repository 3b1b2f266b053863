//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Every method is a single statement or a single transaction.

use platform::password::HashedPassword;

use crate::domain::entity::{
    oauth_client::OAuthClient,
    oauth_token::{OAuthToken, TokenKey},
    session::Session,
    stored::Stored,
    user::User,
};
use crate::domain::value_object::{
    client_id::ClientId, email::Email, session_id::SessionId, user_id::UserId,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Overwrite the profile fields of an existing user; `false` if absent
    async fn update_user_profile(&self, user: &User) -> AuthResult<bool>;
}

/// Password hash storage, kept apart from the profile row
#[trait_variant::make(PasswordRepository: Send)]
pub trait LocalPasswordRepository {
    async fn find_password_hash(&self, user_id: &UserId) -> AuthResult<Option<HashedPassword>>;

    async fn upsert_password_hash(&self, user_id: &UserId, hash: &HashedPassword) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a new session; a duplicate `session_id` is a storage error
    async fn insert_session(&self, session: &Session) -> AuthResult<()>;

    /// Find a session by id, expired or not
    async fn find_session(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Delete a session; returns whether a row was removed
    async fn delete_session(&self, session_id: &SessionId) -> AuthResult<bool>;

    /// Physically remove expired sessions
    async fn cleanup_expired_sessions(&self) -> AuthResult<u64>;
}

/// OAuth2 client credential store
#[trait_variant::make(ClientRepository: Send)]
pub trait LocalClientRepository {
    /// Active client by id
    async fn find_client_by_id(&self, client_id: &ClientId) -> AuthResult<Option<OAuthClient>>;

    /// Active clients for a user, most recent first
    async fn find_clients_by_user(&self, user_id: &UserId) -> AuthResult<Vec<OAuthClient>>;

    /// Plain insert, never an upsert
    async fn insert_client(&self, client: &OAuthClient) -> AuthResult<()>;

    /// Tombstone the active row; `false` if there was none
    async fn soft_delete_client(&self, client_id: &ClientId) -> AuthResult<bool>;

    /// Atomically tombstone every active client of `replacement.user_id` and
    /// insert `replacement`. Returns the clients that were retired.
    /// On error nothing is changed.
    async fn rotate_clients(&self, replacement: &OAuthClient) -> AuthResult<Vec<OAuthClient>>;

    /// Every client row for a user including tombstones, most recent first
    async fn client_history(&self, user_id: &UserId) -> AuthResult<Vec<Stored<OAuthClient>>>;
}

/// OAuth2 token store
#[trait_variant::make(TokenRepository: Send)]
pub trait LocalTokenRepository {
    /// Active token matching the given credential column
    async fn find_token(&self, key: TokenKey<'_>) -> AuthResult<Option<OAuthToken>>;

    /// Overwrite the active row with the same (code, access, refresh)
    /// triple, or insert a new one
    async fn create_or_replace_token(&self, token: &OAuthToken) -> AuthResult<()>;

    /// Tombstone matching active rows; returns how many were affected
    async fn soft_delete_token(&self, key: TokenKey<'_>) -> AuthResult<u64>;
}

/// Everything the HTTP layer needs from one store
pub trait AuthRepository:
    UserRepository
    + PasswordRepository
    + SessionRepository
    + ClientRepository
    + TokenRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthRepository for T where
    T: UserRepository
        + PasswordRepository
        + SessionRepository
        + ClientRepository
        + TokenRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
