//! SDL Loading & Merging
//!
//! Type definitions live in externally supplied `.graphql` files; the
//! built-in AWS scalar declarations are prepended before parsing.

use scriptgate_core::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Built-in scalar declarations, always available to the loaded SDL.
pub const SCALAR_TYPE_DEFS: &str = "\
scalar AWSDate
scalar AWSDateTime
scalar AWSTime
scalar AWSTimestamp
scalar AWSEmail
scalar AWSJSON
scalar AWSURL
scalar AWSPhone
scalar AWSIPAddress
";

/// Load and merge every `*.graphql` file under `dir` (recursive).
///
/// Files are concatenated in sorted path order so the merged document is
/// deterministic across runs. An empty directory is a configuration error;
/// a gateway with no schema cannot serve anything useful.
pub fn load_type_defs(dir: &Path) -> Result<String> {
    let mut files = Vec::new();
    collect_graphql_files(dir, &mut files).map_err(|e| {
        AppError::Config(format!(
            "cannot read schema directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    if files.is_empty() {
        return Err(AppError::Config(format!(
            "no .graphql files found under {}",
            dir.display()
        )));
    }

    files.sort();

    let mut merged = String::from(SCALAR_TYPE_DEFS);
    for path in &files {
        let contents = fs::read_to_string(path)?;
        merged.push('\n');
        merged.push_str(&contents);
        merged.push('\n');
    }

    info!(
        dir = %dir.display(),
        files = files.len(),
        "Loaded GraphQL type definitions"
    );

    Ok(merged)
}

fn collect_graphql_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_graphql_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "graphql") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_schema_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scriptgate_sdl_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_load_merges_scalars_and_files_recursively() {
        let dir = temp_schema_dir("merge");
        fs::write(dir.join("b.graphql"), "type Mutation { x: Int }").unwrap();
        fs::write(dir.join("nested/a.graphql"), "type Query { y: Int }").unwrap();
        fs::write(dir.join("ignored.txt"), "not sdl").unwrap();

        let merged = load_type_defs(&dir).unwrap();

        assert!(merged.starts_with(SCALAR_TYPE_DEFS));
        assert!(merged.contains("type Mutation { x: Int }"));
        assert!(merged.contains("type Query { y: Int }"));
        assert!(!merged.contains("not sdl"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_directory_is_config_error() {
        let dir = temp_schema_dir("empty");
        let err = load_type_defs(&dir).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let err = load_type_defs(Path::new("/nonexistent/schema/dir")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
