pub mod analysis;
pub mod config;
pub mod error;
pub mod inference;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
