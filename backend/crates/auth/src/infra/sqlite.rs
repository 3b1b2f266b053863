//! SQLite Repository Implementations

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::domain::entity::{
    oauth_client::OAuthClient,
    oauth_token::{OAuthToken, TokenKey},
    session::Session,
    stored::Stored,
    user::User,
};
use crate::domain::repository::{
    ClientRepository, PasswordRepository, SessionRepository, TokenRepository, UserRepository,
};
use crate::domain::value_object::{
    client_id::ClientId, email::Email, session_id::SessionId, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed auth repository
#[derive(Clone)]
pub struct SqliteAuthRepository {
    pool: SqlitePool,
}

impl SqliteAuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) a file-backed database
    pub async fn connect(database_url: &str, max_connections: u32) -> AuthResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(database_url, max_connections, "Connected to SQLite");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> AuthResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AuthError::Internal(format!("migration failed: {e}")))?;

        tracing::debug!("Migrations applied");
        Ok(())
    }

    /// Private in-memory database with migrations applied (for testing)
    pub async fn in_memory() -> AuthResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // In-memory must be a single connection that is never recycled,
        // otherwise the database vanishes with it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for SqliteAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                first_name,
                last_name,
                phone,
                company_url,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.user_id.as_str())
        .bind(user.email.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.company_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, first_name, last_name, phone, company_url, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, first_name, last_name, phone, company_url, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn update_user_profile(&self, user: &User) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, phone = ?, company_url = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.company_url)
        .bind(user.user_id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Password Repository Implementation
// ============================================================================

impl PasswordRepository for SqliteAuthRepository {
    async fn find_password_hash(&self, user_id: &UserId) -> AuthResult<Option<HashedPassword>> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM user_passwords WHERE user_id = ?")
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        hash.map(|(phc,)| {
            HashedPassword::from_phc_string(phc)
                .map_err(|e| AuthError::Internal(format!("Invalid password hash: {e}")))
        })
        .transpose()
    }

    async fn upsert_password_hash(&self, user_id: &UserId, hash: &HashedPassword) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_passwords (user_id, password_hash, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                password_hash = excluded.password_hash,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(hash.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for SqliteAuthRepository {
    async fn insert_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                expires_at_ms,
                domain,
                secure,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.session_id.as_str())
        .bind(session.user_id.as_str())
        .bind(session.expires_at_ms)
        .bind(&session.domain)
        .bind(session.secure)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, expires_at_ms, domain, secure, created_at
            FROM auth_sessions
            WHERE session_id = ?
            "#,
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_session(&self, session_id: &SessionId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE session_id = ?")
            .bind(session_id.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < ?")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Client Repository Implementation
// ============================================================================

impl ClientRepository for SqliteAuthRepository {
    async fn find_client_by_id(&self, client_id: &ClientId) -> AuthResult<Option<OAuthClient>> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, client_secret, domain, user_id, created_at, deleted_at
            FROM oauth2_clients
            WHERE client_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(client_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|r| r.into_stored().into_active()))
    }

    async fn find_clients_by_user(&self, user_id: &UserId) -> AuthResult<Vec<OAuthClient>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, client_secret, domain, user_id, created_at, deleted_at
            FROM oauth2_clients
            WHERE user_id = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.into_stored().into_active())
            .collect())
    }

    async fn insert_client(&self, client: &OAuthClient) -> AuthResult<()> {
        insert_client_row(&self.pool, client).await
    }

    async fn soft_delete_client(&self, client_id: &ClientId) -> AuthResult<bool> {
        let deleted = sqlx::query(
            "UPDATE oauth2_clients SET deleted_at = ? WHERE client_id = ? AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(client_id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn rotate_clients(&self, replacement: &OAuthClient) -> AuthResult<Vec<OAuthClient>> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction takes the write lock up front
        let retired = sqlx::query_as::<_, ClientRow>(
            r#"
            UPDATE oauth2_clients
            SET deleted_at = ?
            WHERE user_id = ? AND deleted_at IS NULL
            RETURNING client_id, client_secret, domain, user_id, created_at, deleted_at
            "#,
        )
        .bind(Utc::now())
        .bind(replacement.user_id.as_str())
        .fetch_all(&mut *tx)
        .await?;

        insert_client_row(&mut *tx, replacement).await?;

        tx.commit().await?;

        Ok(retired
            .into_iter()
            .map(|r| r.into_stored().record().clone())
            .collect())
    }

    async fn client_history(&self, user_id: &UserId) -> AuthResult<Vec<Stored<OAuthClient>>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, client_secret, domain, user_id, created_at, deleted_at
            FROM oauth2_clients
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClientRow::into_stored).collect())
    }
}

async fn insert_client_row<'e, E>(executor: E, client: &OAuthClient) -> AuthResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO oauth2_clients (client_id, client_secret, domain, user_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(client.client_id.as_str())
    .bind(&client.client_secret)
    .bind(&client.domain)
    .bind(client.user_id.as_str())
    .bind(client.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

// ============================================================================
// Token Repository Implementation
// ============================================================================

fn token_column(key: &TokenKey<'_>) -> &'static str {
    match key {
        TokenKey::Code(_) => "code",
        TokenKey::Access(_) => "access",
        TokenKey::Refresh(_) => "refresh",
    }
}

impl TokenRepository for SqliteAuthRepository {
    async fn find_token(&self, key: TokenKey<'_>) -> AuthResult<Option<OAuthToken>> {
        // Blank values are shared by every token that lacks that credential
        if key.value().is_empty() {
            return Ok(None);
        }

        let sql = format!(
            r#"
            SELECT client_id, user_id, redirect_uri, scope,
                   code, code_expires_in, access, access_expires_in,
                   refresh, refresh_expires_in, created_at, deleted_at
            FROM oauth2_tokens
            WHERE {} = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
            token_column(&key)
        );

        let row = sqlx::query_as::<_, TokenRow>(&sql)
            .bind(key.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|r| r.into_stored().into_active()))
    }

    async fn create_or_replace_token(&self, token: &OAuthToken) -> AuthResult<()> {
        let client_id = token.client_id.as_ref().map(|c| c.as_str()).unwrap_or("");
        let user_id = token.user_id.as_ref().map(|u| u.as_str()).unwrap_or("");
        let code_expires_in = format_duration(token.code_expires_in);
        let access_expires_in = format_duration(token.access_expires_in);
        let refresh_expires_in = format_duration(token.refresh_expires_in);

        let mut tx = self.pool.begin().await?;

        let replaced = sqlx::query(
            r#"
            UPDATE oauth2_tokens SET
                client_id = ?,
                user_id = ?,
                redirect_uri = ?,
                scope = ?,
                code_expires_in = ?,
                access_expires_in = ?,
                refresh_expires_in = ?,
                created_at = ?
            WHERE code = ? AND access = ? AND refresh = ? AND deleted_at IS NULL
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .bind(&token.redirect_uri)
        .bind(&token.scope)
        .bind(&code_expires_in)
        .bind(&access_expires_in)
        .bind(&refresh_expires_in)
        .bind(token.created_at)
        .bind(&token.code)
        .bind(&token.access)
        .bind(&token.refresh)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if replaced == 0 {
            sqlx::query(
                r#"
                INSERT INTO oauth2_tokens (
                    client_id, user_id, redirect_uri, scope,
                    code, code_expires_in, access, access_expires_in,
                    refresh, refresh_expires_in, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(client_id)
            .bind(user_id)
            .bind(&token.redirect_uri)
            .bind(&token.scope)
            .bind(&token.code)
            .bind(&code_expires_in)
            .bind(&token.access)
            .bind(&access_expires_in)
            .bind(&token.refresh)
            .bind(&refresh_expires_in)
            .bind(token.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn soft_delete_token(&self, key: TokenKey<'_>) -> AuthResult<u64> {
        if key.value().is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE oauth2_tokens SET deleted_at = ? WHERE {} = ? AND deleted_at IS NULL",
            token_column(&key)
        );

        let deleted = sqlx::query(&sql)
            .bind(Utc::now())
            .bind(key.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

/// Unparseable values degrade to zero, which reads as already expired
fn parse_duration(column: &'static str, raw: &str) -> Duration {
    match humantime::parse_duration(raw) {
        Ok(duration) => duration,
        Err(e) => {
            tracing::warn!(column, value = raw, error = %e, "Invalid stored token duration");
            Duration::ZERO
        }
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    email: String,
    first_name: String,
    last_name: String,
    phone: String,
    company_url: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_trusted(self.user_id),
            email: Email::from_db(self.email),
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            company_url: self.company_url,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: String,
    user_id: String,
    expires_at_ms: i64,
    domain: String,
    secure: bool,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from_trusted(self.session_id),
            user_id: UserId::from_trusted(self.user_id),
            expires_at_ms: self.expires_at_ms,
            domain: self.domain,
            secure: self.secure,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    client_id: String,
    client_secret: String,
    domain: String,
    user_id: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl ClientRow {
    fn into_stored(self) -> Stored<OAuthClient> {
        let client = OAuthClient {
            client_id: ClientId::from_trusted(self.client_id),
            client_secret: self.client_secret,
            domain: self.domain,
            user_id: UserId::from_trusted(self.user_id),
            created_at: self.created_at,
        };
        Stored::from_parts(client, self.deleted_at)
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    client_id: String,
    user_id: String,
    redirect_uri: String,
    scope: String,
    code: String,
    code_expires_in: String,
    access: String,
    access_expires_in: String,
    refresh: String,
    refresh_expires_in: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TokenRow {
    fn into_stored(self) -> Stored<OAuthToken> {
        let token = OAuthToken {
            client_id: ClientId::parse(&self.client_id).ok(),
            user_id: UserId::parse(&self.user_id).ok(),
            redirect_uri: self.redirect_uri,
            scope: self.scope,
            code: self.code,
            code_expires_in: parse_duration("code_expires_in", &self.code_expires_in),
            access: self.access,
            access_expires_in: parse_duration("access_expires_in", &self.access_expires_in),
            refresh: self.refresh,
            refresh_expires_in: parse_duration("refresh_expires_in", &self.refresh_expires_in),
            created_at: self.created_at,
        };
        Stored::from_parts(token, self.deleted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_format_parse() {
        let raw = format_duration(Duration::from_secs(2 * 3600));
        assert_eq!(raw, "2h");
        assert_eq!(parse_duration("access_expires_in", &raw), Duration::from_secs(7200));
    }

    #[test]
    fn test_bad_duration_degrades_to_zero() {
        assert_eq!(parse_duration("access_expires_in", "two hours"), Duration::ZERO);
        assert_eq!(parse_duration("code_expires_in", ""), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_in_memory_has_schema() {
        let repo = SqliteAuthRepository::in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM oauth2_tokens")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
