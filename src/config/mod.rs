//! Configuration module for breed-render
//!
//! Provides types and parsing for `breedrender.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
