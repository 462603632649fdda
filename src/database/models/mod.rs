pub mod rock;
pub mod rock_type;
pub mod user;

pub use rock::{DeleteOutcome, NewRock, RockRecord};
pub use rock_type::RockType;
pub use user::{NewUser, User};
