pub mod auth;
pub mod health;

pub use auth::{login, register};
pub use health::{health, root};
