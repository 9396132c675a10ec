//! Shared helpers for `permseed` binary tests.
#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::PathBuf;
use std::time::Duration;

pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

pub const WIKI_DOC: &str = r#"{"groups": ["britAdmin", "editors"], "permissions": [{"name": "wiki.edit", "groups": ["editors"]}]}"#;

pub fn permseed_cmd() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("permseed");
    cmd.timeout(TIMEOUT_BASIC);
    cmd
}

/// Write `content` to `name` inside a fresh temp dir.
/// Returns (path, _guard). Keep the guard alive for the test's duration.
pub fn fixture(name: &str, content: &str) -> (PathBuf, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir for fixture");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    (path, dir)
}
