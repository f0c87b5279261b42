//! Configuration loading and discovery for `breedrender.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::BreedRenderConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when discovering configuration.
pub const CONFIG_FILE_NAME: &str = "breedrender.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse breedrender.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub scale: Option<u32>,
    pub padding: Option<u32>,
    pub trim: Option<bool>,
    pub exact_match: Option<bool>,
    pub parallel: Option<bool>,
    pub palette: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Find breedrender.toml by walking up from the current working directory,
/// falling back to the XDG config directory.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find breedrender.toml in XDG_CONFIG_HOME/breedrender/ or
/// ~/.config/breedrender/.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("breedrender").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find breedrender.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from a discovered breedrender.toml.
///
/// When no path is given and none is found, the defaults are returned.
/// Relative source paths in a loaded file are resolved against the file's
/// directory.
pub fn load_config(path: Option<&Path>) -> Result<BreedRenderConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("Loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(BreedRenderConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<BreedRenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: BreedRenderConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = path.parent() {
        config.sources.paths = config.sources.paths.iter().map(|p| resolve_path(root, p)).collect();
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut BreedRenderConfig, overrides: &CliOverrides) {
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(padding) = overrides.padding {
        config.render.padding = padding;
    }
    if let Some(trim) = overrides.trim {
        config.render.trim = trim;
    }
    if let Some(exact_match) = overrides.exact_match {
        config.render.exact_match = exact_match;
    }
    if let Some(parallel) = overrides.parallel {
        config.render.parallel = parallel;
    }
    if let Some(ref palette) = overrides.palette {
        config.render.palette = Some(palette.clone());
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.render.timeout_ms = Some(timeout_ms);
    }
}

/// Resolve a path relative to the directory holding the config file.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\nscale = 2");

        assert_eq!(find_config_from(temp.path().to_path_buf()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\nscale = 2");
        let subdir = temp.path().join("breeds").join("norn");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        assert_eq!(find_config_from(subdir), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_load_config_resolves_source_paths() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[render]
scale = 3

[sources]
paths = ["sprites", "/abs/agents"]
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.render.scale, 3);
        assert_eq!(config.sources.paths, vec![temp.path().join("sprites"), PathBuf::from("/abs/agents")]);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");
        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\nscale = 0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = BreedRenderConfig::default();
        let overrides = CliOverrides {
            scale: Some(4),
            trim: Some(true),
            parallel: Some(false),
            palette: Some("@grayscale".to_string()),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.render.scale, 4);
        assert!(config.render.trim);
        assert!(!config.render.parallel);
        assert_eq!(config.render.palette.as_deref(), Some("@grayscale"));
        assert_eq!(config.render.padding, 0);
        assert!(!config.render.exact_match);
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(resolve_path(root, Path::new("agents")), PathBuf::from("/project/agents"));
    }
}
