pub mod error;
pub mod product;
pub mod tag;
pub mod user;

pub use error::*;
