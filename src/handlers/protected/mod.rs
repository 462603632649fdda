pub mod rocks;
pub mod types;
