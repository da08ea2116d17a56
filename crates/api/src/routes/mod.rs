pub mod health;
pub mod models;
pub mod products;
pub mod tags;
pub mod users;
