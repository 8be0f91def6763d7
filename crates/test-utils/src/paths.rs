//! Path utilities for locating test data files.
//!
//! Sample documents live in `testdata/` directories next to the crates and
//! services that use them.

use std::io::Write;
use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the testdata directory for a specific crate.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Returns the path to the service testdata directory.
pub fn service_testdata_dir(service_name: &str) -> PathBuf {
    workspace_root()
        .join("services")
        .join(service_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `services/template-render/testdata/`
/// 3. `crates/template-writers/testdata/`
/// 4. `testdata/` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        service_testdata_dir("template-render").join(name),
        crate_testdata_dir("template-writers").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Writes `content` to a temporary file that is removed on drop.
pub fn temp_file_with(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temporary test file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temporary test file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        // Should contain Cargo.toml at workspace level
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_service_testdata_dir() {
        let dir = service_testdata_dir("template-render");
        assert!(dir.to_string_lossy().contains("template-render"));
        assert!(dir.ends_with("testdata"));
    }

    #[test]
    fn test_temp_file_with() {
        let file = temp_file_with("flat_output: true\n", ".yaml");
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "flat_output: true\n");
        assert!(file.path().to_string_lossy().ends_with(".yaml"));
    }
}
