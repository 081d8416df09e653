pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;

pub use error::{AppError, Result};
