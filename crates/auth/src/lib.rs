mod password;
pub mod validation;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::SqlitePool;
use storefront_config::AuthConfig;
use storefront_database::{DatabaseError, NewUser, TokenRepository, UserChanges, UserRepository};
use thiserror::Error;
use tracing::{debug, info};

pub use password::{hash_password, verify_password};
pub use storefront_database::User;

/// Upper bound for token lifetimes so expiry arithmetic stays in range.
const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    tokens: TokenRepository,
    token_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,
    #[error("user account is disabled")]
    InactiveUser,
    #[error("a user with that {0} already exists")]
    UserExists(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("token not found")]
    TokenNotFound,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

/// A resolved token and its expiry.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

/// Changes a user may make to their own account. `None` keeps a field.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let seconds = i64::try_from(config.token_ttl_seconds)
            .unwrap_or(i64::MAX)
            .min(MAX_TOKEN_TTL_SECONDS);

        Self {
            users: UserRepository::new(pool.clone()),
            tokens: TokenRepository::new(pool),
            token_ttl: Duration::seconds(seconds),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Validates and stores a regular account.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        self.insert_account(registration, false).await
    }

    /// Creates an account flagged as staff and superuser.
    pub async fn create_superuser(&self, registration: &Registration) -> Result<User, AuthError> {
        let user = self.insert_account(registration, true).await?;
        info!(user_id = user.id, username = %user.username, "created superuser");
        Ok(user)
    }

    /// Exchanges username and password for a fresh token. Unknown users,
    /// wrong passwords and disabled accounts are indistinguishable.
    pub async fn issue_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            debug!(username, "token requested for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? || !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.issue_session(user.id).await?;
        self.users.record_login(user.id).await?;
        Ok(session)
    }

    /// Resolves a token to its active user. Expired tokens are deleted.
    pub async fn authenticate_token(&self, token: &str) -> Result<(User, AuthSession), AuthError> {
        let Some(record) = self.tokens.find(token).await? else {
            return Err(AuthError::TokenNotFound);
        };

        let expires_at = DateTime::parse_from_rfc3339(&record.expires_at)
            .map_err(|_| AuthError::InvalidToken)?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            self.tokens.delete(token).await?;
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        let session = AuthSession {
            token: record.token,
            user_id: user.id,
            expires_at,
        };

        Ok((user, session))
    }

    /// Updates the caller's own account; a new password is re-hashed and a
    /// new email normalised.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        if let Some(email) = &update.email {
            validation::validate_email(email)?;
        }
        if let Some(username) = &update.username {
            validation::validate_username(username)?;
        }
        if let Some(name) = &update.name {
            validation::validate_name(name)?;
        }
        let password_hash = match &update.password {
            Some(password) => {
                validation::validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            email: update.email.as_deref().map(|email| email.trim().to_string()),
            username: update.username.clone(),
            name: update.name.clone(),
            password_hash,
        };

        self.users
            .update(user_id, &changes)
            .await
            .map_err(map_account_error)
    }

    async fn insert_account(
        &self,
        registration: &Registration,
        superuser: bool,
    ) -> Result<User, AuthError> {
        validation::validate_email(&registration.email)?;
        validation::validate_username(&registration.username)?;
        validation::validate_name(&registration.name)?;
        validation::validate_password(&registration.password)?;

        let password_hash = hash_password(&registration.password)?;
        let new_user = if superuser {
            NewUser::superuser(
                &registration.email,
                &registration.username,
                &registration.name,
                password_hash,
            )
        } else {
            NewUser::new(
                &registration.email,
                &registration.username,
                &registration.name,
                password_hash,
            )
        }
        .map_err(map_account_error)?;

        self.users.create(&new_user).await.map_err(map_account_error)
    }

    async fn issue_session(&self, user_id: i64) -> Result<AuthSession, AuthError> {
        let token = generate_token();
        let expires_at = Utc::now() + self.token_ttl;

        self.tokens.create(user_id, &token, expires_at).await?;

        Ok(AuthSession {
            token,
            user_id,
            expires_at,
        })
    }
}

fn map_account_error(err: DatabaseError) -> AuthError {
    match err {
        DatabaseError::Duplicate(message) if message.contains("email") => {
            AuthError::UserExists("email")
        }
        DatabaseError::Duplicate(_) => AuthError::UserExists("username"),
        DatabaseError::Validation(message) => AuthError::Validation(message),
        other => AuthError::Database(other),
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
