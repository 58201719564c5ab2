pub mod config;
pub mod generate;
pub mod inspect;
pub mod verify;

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use strata_codegen::{Document, DocumentCodec, JsonCodec};

use crate::config::StrataConfig;

pub(crate) fn read_document(path: &Path) -> Result<Document> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    JsonCodec::<Document>::new()
        .decode(&contents)
        .with_context(|| format!("Failed to parse document JSON: {}", path.display()))
}

pub(crate) fn load_config(config_path: &str) -> Result<Option<StrataConfig>> {
    let config = StrataConfig::load_optional(config_path)?;
    if config.is_some() {
        tracing::debug!(path = config_path, "loaded configuration");
    }
    Ok(config)
}

/// Write `contents` to `path` through a temporary file in the same directory,
/// so readers never observe a half-written file.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move generated file into place: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_creates_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.rs");

        write_atomically(&path, "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomically(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_read_document_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
