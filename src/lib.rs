pub mod api;
pub mod config;
pub mod conversation;
pub mod dataset;
pub mod error;
pub mod fine_tune;
pub mod model;
pub mod upload;
pub mod util;

pub use error::{AppError, Result};
