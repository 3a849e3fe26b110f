#![allow(dead_code)]

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const BRAINELF: &str = env!("CARGO_BIN_EXE_brainelf");
const TMP_DIR: &str = env!("CARGO_TARGET_TMPDIR");
pub const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/");

#[derive(Debug)]
pub struct Output {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Path to a fixture under `tests/fixtures/`.
pub fn fixture(file_name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(file_name)
}

/// A fresh, unused path under the per-test-binary tmp dir.
pub fn tmp_path(file_name: &str) -> PathBuf {
    Path::new(TMP_DIR).join(file_name)
}

pub fn run(args: &[&str]) -> Output {
    let mut command = Command::new(BRAINELF);
    command.env_remove("PAGER");

    for arg in args {
        command.arg(arg);
    }

    let output = command.output().unwrap();

    Output {
        exit_code: output.status.code().unwrap(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn checksum(path: &Path) -> String {
    let payload = std::fs::read(path).unwrap();
    let hash = blake3::hash(&payload);
    // Hexadecimal is nicer to debug than plain bytes.
    hash.to_hex().to_string()
}
