use storefront_auth::AuthError;
use storefront_database::DatabaseError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound,
    BadRequest(String),
    Database(DatabaseError),
    Auth(AuthError),
}

impl ServiceError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::BadRequest(msg) => write!(f, "{msg}"),
            Self::Database(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl From<ServiceError> for crate::ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => crate::ApiError::not_found("not found"),
            ServiceError::BadRequest(msg) => crate::ApiError::bad_request(msg),
            ServiceError::Database(db_err) => {
                tracing::error!("database error: {}", db_err);
                crate::ApiError::internal_server_error("database operation failed")
            }
            ServiceError::Auth(auth_err) => crate::ApiError::from(auth_err),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => Self::NotFound,
            DatabaseError::Validation(msg) => Self::BadRequest(msg),
            DatabaseError::Duplicate(_) => {
                Self::BadRequest("an entry with this name already exists".to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}
