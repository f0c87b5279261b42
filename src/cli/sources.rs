//! Resource source discovery and loading

use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::container::{ContainerError, ResourceContainer, CONTAINER_MAGIC};

/// Error when opening the resource sources of a render.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot read '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Cannot open container '{path}': {source}")]
    Container { path: PathBuf, source: ContainerError },
    #[error("Source '{0}' does not exist")]
    Missing(PathBuf),
}

/// Find all container files in a directory (recursively), sorted by path.
pub fn find_container_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let pattern_root = glob::Pattern::escape(&dir.display().to_string());
    for ext in extensions {
        if let Ok(paths) = glob(&format!("{}/**/*.{}", pattern_root, ext)) {
            files.extend(paths.filter_map(Result::ok));
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Expand directories into the container files they hold, keeping order.
///
/// Files are kept as given whatever their extension.
pub fn expand_sources(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>, SourceError> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = find_container_files(path, extensions);
            log::debug!("Found {} containers under {}", found.len(), path.display());
            out.extend(found);
        } else if path.exists() {
            out.push(path.clone());
        } else {
            return Err(SourceError::Missing(path.clone()));
        }
    }
    Ok(out)
}

/// Open every file as a resource container.
pub fn open_containers(paths: &[PathBuf]) -> Result<Vec<ResourceContainer>, SourceError> {
    paths
        .iter()
        .map(|path| {
            let bytes = fs::read(path).map_err(|source| SourceError::Io { path: path.clone(), source })?;
            ResourceContainer::open(bytes).map_err(|source| SourceError::Container { path: path.clone(), source })
        })
        .collect()
}

/// Whether `bytes` look like a resource container rather than a raw genome.
pub fn is_container(bytes: &[u8]) -> bool {
    bytes.starts_with(&CONTAINER_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerWriter;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["pray".to_string(), "agent".to_string()]
    }

    #[test]
    fn test_find_container_files_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        for name in ["b.pray", "a.agent", "notes.txt"] {
            fs::write(temp.path().join(name), b"").unwrap();
        }
        fs::write(nested.join("c.pray"), b"").unwrap();

        let files = find_container_files(temp.path(), &exts());
        assert_eq!(files, vec![temp.path().join("a.agent"), temp.path().join("b.pray"), nested.join("c.pray")]);
    }

    #[test]
    fn test_expand_keeps_explicit_files_and_order() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("first.bin");
        fs::write(&explicit, b"").unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("x.pray"), b"").unwrap();

        let expanded = expand_sources(&[explicit.clone(), dir.clone()], &exts()).unwrap();
        assert_eq!(expanded, vec![explicit, dir.join("x.pray")]);

        let missing = temp.path().join("nope.pray");
        assert!(matches!(expand_sources(&[missing], &exts()), Err(SourceError::Missing(_))));
    }

    #[test]
    fn test_open_containers_reports_path() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.pray");
        fs::write(&good, ContainerWriter::new().block("SPRT", "a", vec![1]).finish().unwrap()).unwrap();
        let bad = temp.path().join("bad.pray");
        fs::write(&bad, b"garbage").unwrap();

        assert_eq!(open_containers(&[good.clone()]).unwrap()[0].len(), 1);
        match open_containers(&[good, bad.clone()]) {
            Err(SourceError::Container { path, .. }) => assert_eq!(path, bad),
            other => panic!("expected container error, got {:?}", other.map(|c| c.len())),
        }
    }
}
