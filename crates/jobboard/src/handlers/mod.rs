pub mod applications;
pub mod error;
pub mod events;
pub mod health;
pub mod jobs;

pub use error::{rejected, AppError};
