//! Breedrender - Library for decoding creature breed sprites and
//! compositing them into finished images
//!
//! This library provides functionality to:
//! - Decode indexed-color sprite sheets (raw and run-length frames)
//! - Read named blocks from compressed resource containers
//! - Parse genomes into per-variant body-part mappings
//! - Resolve palettes and apply genome color transforms
//! - Composite a breed variant and write it to PNG

pub mod cancel;
pub mod cli;
pub mod composition;
pub mod config;
pub mod container;
pub mod error;
pub mod genome;
pub mod models;
pub mod output;
pub mod palettes;
pub mod pipeline;
pub mod sheet;

pub use cancel::CancelToken;
pub use error::CoreError;
pub use pipeline::{render_breed, render_request, RenderRequest};
