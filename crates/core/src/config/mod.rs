//! Configuration loading and schema definitions
//!
//! Options shared by the library crates and the CLI.

mod loader;
mod schema;

pub use loader::{Config, API_KEY_ENV, API_URL_ENV, TIMEOUT_ENV};
pub use schema::*;
