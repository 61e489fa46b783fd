pub mod error;
pub mod health;
pub mod parse;

pub use error::ApiError;
