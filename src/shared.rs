pub mod error;
pub mod events;
pub mod settings;
pub mod types;

// Re-export the error alias for convenience
pub use error::{AppError, AppResult};
