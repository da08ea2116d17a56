//! Domain entities for the database layer

pub mod product;
pub mod tag;
pub mod token;
pub mod user;

pub use product::{price_from_cents, price_to_cents, NewProduct, Product, ProductChanges};
pub use tag::Tag;
pub use token::AuthToken;
pub use user::{normalize_email, NewUser, User, UserChanges};

use crate::types::{DatabaseError, DatabaseResult};

pub const NAME_MAX_LENGTH: usize = 255;

/// Trims a product or tag name and checks it is between 1 and 255 characters.
pub fn validate_name(field: &str, value: &str) -> DatabaseResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::validation(format!("{field} may not be blank")));
    }
    if trimmed.chars().count() > NAME_MAX_LENGTH {
        return Err(DatabaseError::validation(format!(
            "{field} may not exceed {NAME_MAX_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}
