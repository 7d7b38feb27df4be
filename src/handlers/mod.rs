pub mod common;
pub mod health;
pub mod inventory;
pub mod products;
pub mod sales;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
