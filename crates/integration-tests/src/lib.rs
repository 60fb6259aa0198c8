//! Integration test helpers for Scriptgate.
//!
//! Tests live under `tests/` and exercise the real subprocess path with
//! `/bin/sh` scripts written to the system temp directory.

use std::path::PathBuf;

/// Write a shell script for a test and return its path.
///
/// Scripts are invoked as `/bin/sh <script> <json-envelope>`, so `$1` is
/// the request envelope inside the script body.
pub fn write_script(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "scriptgate_test_{}_{}.sh",
        name,
        std::process::id()
    ));
    std::fs::write(&path, body).expect("failed to write test script");
    path
}
