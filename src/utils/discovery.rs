// src/utils/discovery.rs

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

use crate::error::Result;

/// Expands `pattern` to the regular files it matches, as absolute paths in
/// lexicographic order. Relative patterns are resolved against `base_dir`.
pub fn discover_inputs(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = base_dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut matches = Vec::new();
    for entry in glob(&pattern_str)? {
        match entry {
            Ok(path) if path.is_file() => matches.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Skipping unreadable path during input discovery"),
        }
    }
    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discovers_matching_files_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.fb2"), "x").unwrap();
        fs::write(dir.path().join("a.fb2"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("dir.fb2")).unwrap();

        let found = discover_inputs(dir.path(), "*.fb2").unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.fb2"), dir.path().join("b.fb2")]
        );
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_absolute_pattern_ignores_base() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.fb2"), "x").unwrap();
        let pattern = dir.path().join("*.fb2");
        let found = discover_inputs(Path::new("/unused"), &pattern.to_string_lossy()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = tempdir().unwrap();
        let result = discover_inputs(dir.path(), "[unclosed");
        assert!(matches!(result, Err(PipelineError::DiscoveryError(_))));
    }
}
