pub mod rock_service;
pub mod user_service;

pub use rock_service::{CreateRock, ListScope, RockError, RockService};
pub use user_service::{LoginRequest, RegisterRequest, Session, UserService};
