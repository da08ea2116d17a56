//! Database repository implementations

pub mod product_repository;
pub mod tag_repository;
pub mod token_repository;
pub mod user_repository;

pub use product_repository::ProductRepository;
pub use tag_repository::TagRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;
