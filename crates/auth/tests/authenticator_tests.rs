use std::collections::HashSet;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};
use storefront_auth::{AuthError, Authenticator, ProfileUpdate, Registration};
use storefront_config::{AuthConfig, DatabaseConfig};
use storefront_database::{prepare_database, run_migrations, UserRepository};
use tempfile::TempDir;

type TestResult<T = ()> = anyhow::Result<T>;

fn default_auth_config() -> AuthConfig {
    AuthConfig {
        token_ttl_seconds: 3_600,
    }
}

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
    config: AuthConfig,
}

impl TestContext {
    async fn new(config: AuthConfig) -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let database = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("auth.sqlite").display()),
            max_connections: 5,
            ..DatabaseConfig::default()
        };

        let pool = prepare_database(&database).await?;
        run_migrations(&pool).await?;

        let authenticator = Authenticator::new(pool.clone(), config.clone());

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
            config,
        })
    }

    async fn new_default() -> TestResult<Self> {
        Self::new(default_auth_config()).await
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }
}

fn registration(username: &str) -> Registration {
    Registration {
        email: format!("{username}@Example.COM"),
        username: username.to_string(),
        name: format!("{username} tester"),
        password: "s3cret".to_string(),
    }
}

#[tokio::test]
async fn register_persists_user_with_argon2_hash() -> TestResult {
    let ctx = TestContext::new_default().await?;

    let user = ctx.authenticator().register(&registration("alice")).await?;
    assert_eq!(user.email, "alice@example.com");
    assert!(!user.is_staff);
    assert!(!user.is_superuser);

    let row = sqlx::query("SELECT password_hash FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(ctx.pool())
        .await?;
    let hash: String = row.get("password_hash");
    assert!(hash.starts_with("$argon2"), "password must be an argon2 hash");
    assert_ne!(hash, "s3cret");

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_username() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.authenticator().register(&registration("alice")).await?;

    let mut same_email = registration("alice2");
    same_email.email = "alice@example.com".to_string();
    let err = ctx
        .authenticator()
        .register(&same_email)
        .await
        .expect_err("duplicate email should fail");
    assert!(matches!(err, AuthError::UserExists("email")), "got {err:?}");

    let mut same_username = registration("alice");
    same_username.email = "other@example.com".to_string();
    let err = ctx
        .authenticator()
        .register(&same_username)
        .await
        .expect_err("duplicate username should fail");
    assert!(matches!(err, AuthError::UserExists("username")), "got {err:?}");

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(ctx.pool())
        .await?;
    assert_eq!(user_count, 1, "no additional users should be created");

    Ok(())
}

#[tokio::test]
async fn register_validates_fields_before_writing() -> TestResult {
    let ctx = TestContext::new_default().await?;

    let mut empty_email = registration("alice");
    empty_email.email = String::new();
    let mut short_password = registration("bob");
    short_password.password = "pw".to_string();
    let mut bad_email = registration("carol");
    bad_email.email = "not-an-email".to_string();

    for payload in [empty_email, short_password, bad_email] {
        let err = ctx
            .authenticator()
            .register(&payload)
            .await
            .expect_err("invalid registration");
        assert!(matches!(err, AuthError::Validation(_)), "got {err:?}");
    }

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(ctx.pool())
        .await?;
    assert_eq!(user_count, 0);
    Ok(())
}

#[tokio::test]
async fn create_superuser_sets_staff_flags() -> TestResult {
    let ctx = TestContext::new_default().await?;

    let user = ctx
        .authenticator()
        .create_superuser(&registration("root"))
        .await?;

    assert!(user.is_staff);
    assert!(user.is_superuser);
    Ok(())
}

#[tokio::test]
async fn issue_token_returns_token_for_valid_credentials() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.authenticator().register(&registration("alice")).await?;

    let session = ctx.authenticator().issue_token("alice", "s3cret").await?;

    let ttl = Duration::seconds(ctx.config.token_ttl_seconds as i64);
    let remaining = session.expires_at - Utc::now();
    assert!(
        (remaining - ttl).num_seconds().abs() <= 2,
        "token ttl should respect configuration"
    );

    let stored_expires: String =
        sqlx::query_scalar("SELECT expires_at FROM auth_tokens WHERE token = ?")
            .bind(&session.token)
            .fetch_one(ctx.pool())
            .await?;
    let parsed = DateTime::parse_from_rfc3339(&stored_expires)?.with_timezone(&Utc);
    assert_eq!(parsed.timestamp(), session.expires_at.timestamp());

    let last_login: Option<String> =
        sqlx::query_scalar("SELECT last_login_at FROM users WHERE username = 'alice'")
            .fetch_one(ctx.pool())
            .await?;
    assert!(last_login.is_some(), "login should be recorded");

    Ok(())
}

#[tokio::test]
async fn issue_token_rejects_wrong_password_and_unknown_user() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.authenticator().register(&registration("alice")).await?;

    let err = ctx
        .authenticator()
        .issue_token("alice", "wrong")
        .await
        .expect_err("wrong password");
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = ctx
        .authenticator()
        .issue_token("nobody", "s3cret")
        .await
        .expect_err("unknown user");
    assert!(matches!(err, AuthError::InvalidCredentials));

    let tokens: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_tokens")
        .fetch_one(ctx.pool())
        .await?;
    assert_eq!(tokens, 0);
    Ok(())
}

#[tokio::test]
async fn issue_token_rejects_inactive_user() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;
    UserRepository::new(ctx.pool().clone())
        .set_active(user.id, false)
        .await?;

    let err = ctx
        .authenticator()
        .issue_token("alice", "s3cret")
        .await
        .expect_err("inactive user");
    assert!(matches!(err, AuthError::InvalidCredentials));
    Ok(())
}

#[tokio::test]
async fn issued_tokens_are_unique_and_urlsafe() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.authenticator().register(&registration("alice")).await?;

    let mut tokens = HashSet::new();
    for _ in 0..5 {
        let session = ctx.authenticator().issue_token("alice", "s3cret").await?;
        assert!(
            URL_SAFE_NO_PAD.decode(session.token.as_bytes()).is_ok(),
            "token should be URL safe base64"
        );
        assert!(
            tokens.insert(session.token.clone()),
            "tokens should be unique per login"
        );
    }
    Ok(())
}

#[tokio::test]
async fn authenticate_token_returns_user_for_active_token() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;
    let session = ctx.authenticator().issue_token("alice", "s3cret").await?;

    let (resolved_user, resolved_session) = ctx
        .authenticator()
        .authenticate_token(&session.token)
        .await?;

    assert_eq!(resolved_user.id, user.id);
    assert_eq!(resolved_session.token, session.token);
    Ok(())
}

#[tokio::test]
async fn authenticate_token_deletes_expired_tokens() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;

    let token = "expired-token";
    let created_at = (Utc::now() - Duration::hours(2)).to_rfc3339();
    let expires_at = (Utc::now() - Duration::hours(1)).to_rfc3339();

    sqlx::query(
        "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(token)
    .bind(user.id)
    .bind(&created_at)
    .bind(&expires_at)
    .execute(ctx.pool())
    .await?;

    let err = ctx
        .authenticator()
        .authenticate_token(token)
        .await
        .expect_err("expired token should be rejected");
    assert!(matches!(err, AuthError::TokenExpired));

    let remaining: Option<i64> = sqlx::query_scalar("SELECT 1 FROM auth_tokens WHERE token = ?")
        .bind(token)
        .fetch_optional(ctx.pool())
        .await?;
    assert!(
        remaining.is_none(),
        "expired token should be removed from the database"
    );

    Ok(())
}

#[tokio::test]
async fn zero_ttl_tokens_expire_immediately() -> TestResult {
    let ctx = TestContext::new(AuthConfig {
        token_ttl_seconds: 0,
    })
    .await?;
    ctx.authenticator().register(&registration("alice")).await?;
    let session = ctx.authenticator().issue_token("alice", "s3cret").await?;

    let err = ctx
        .authenticator()
        .authenticate_token(&session.token)
        .await
        .expect_err("token should already be expired");
    assert!(matches!(err, AuthError::TokenExpired));
    Ok(())
}

#[tokio::test]
async fn authenticate_token_rejects_unknown_token() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let err = ctx
        .authenticator()
        .authenticate_token("missing-token")
        .await
        .expect_err("unknown token should not authenticate");
    assert!(matches!(err, AuthError::TokenNotFound));
    Ok(())
}

#[tokio::test]
async fn authenticate_token_rejects_inactive_user() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;
    let session = ctx.authenticator().issue_token("alice", "s3cret").await?;

    UserRepository::new(ctx.pool().clone())
        .set_active(user.id, false)
        .await?;

    let err = ctx
        .authenticator()
        .authenticate_token(&session.token)
        .await
        .expect_err("inactive user");
    assert!(matches!(err, AuthError::InactiveUser));
    Ok(())
}

#[tokio::test]
async fn update_profile_rehashes_password_and_normalises_email() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;

    let updated = ctx
        .authenticator()
        .update_profile(
            user.id,
            &ProfileUpdate {
                email: Some("Alice@NEW.example.com".to_string()),
                password: Some("n3w-secret".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;

    assert_eq!(updated.email, "Alice@new.example.com");
    assert_eq!(updated.name, user.name);
    assert_ne!(updated.password_hash, user.password_hash);

    ctx.authenticator().issue_token("alice", "n3w-secret").await?;
    let err = ctx
        .authenticator()
        .issue_token("alice", "s3cret")
        .await
        .expect_err("old password should stop working");
    assert!(matches!(err, AuthError::InvalidCredentials));
    Ok(())
}

#[tokio::test]
async fn update_profile_rejects_short_password() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user = ctx.authenticator().register(&registration("alice")).await?;

    let err = ctx
        .authenticator()
        .update_profile(
            user.id,
            &ProfileUpdate {
                password: Some("abc".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .expect_err("short password");
    assert!(matches!(err, AuthError::Validation(_)));
    Ok(())
}
