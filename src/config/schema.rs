//! Configuration schema types for `breedrender.toml`
//!
//! Every section and field is optional; missing values take the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::palettes::get_builtin;

/// Largest accepted output scale factor.
pub const MAX_SCALE: u32 = 10;

/// Rendering defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Integer upscale factor for written PNGs
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Transparent border added around the trimmed or untrimmed image
    #[serde(default)]
    pub padding: u32,
    /// Crop unpainted rows and columns from the edges
    #[serde(default)]
    pub trim: bool,
    /// Fail instead of falling back to the nearest age stage
    #[serde(default)]
    pub exact_match: bool,
    /// Decode sheets in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Override palette: `@builtin` or a file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Abandon a render after this many milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            padding: 0,
            trim: false,
            exact_match: false,
            parallel: default_parallel(),
            palette: None,
            timeout_ms: None,
        }
    }
}

fn default_scale() -> u32 {
    1
}

fn default_parallel() -> bool {
    true
}

/// Where resource containers are found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Containers or directories searched after those given on the command line
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// File extensions picked up when scanning a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self { paths: Vec::new(), extensions: default_extensions() }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["pray".to_string(), "agent".to_string(), "res".to_string()]
}

/// Complete breedrender.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedRenderConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "breedrender.toml: '{}' {}", self.field, self.message)
    }
}

impl BreedRenderConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if !(1..=MAX_SCALE).contains(&self.render.scale) {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        if let Some(name) = self.render.palette.as_deref().and_then(|p| p.strip_prefix('@')) {
            if get_builtin(name).is_none() {
                errors.push(ConfigValidationError {
                    field: "render.palette".to_string(),
                    message: format!("names unknown builtin palette '@{}'", name),
                });
            }
        }

        if self.render.timeout_ms == Some(0) {
            errors.push(ConfigValidationError {
                field: "render.timeout_ms".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.sources.extensions.is_empty() {
            errors.push(ConfigValidationError {
                field: "sources.extensions".to_string(),
                message: "must list at least one extension".to_string(),
            });
        }
        for ext in &self.sources.extensions {
            if ext.is_empty() || ext.contains(&['.', '/', '*'][..]) {
                errors.push(ConfigValidationError {
                    field: "sources.extensions".to_string(),
                    message: format!("'{}' must be a bare extension like \"pray\"", ext),
                });
            }
        }

        errors
    }
}
