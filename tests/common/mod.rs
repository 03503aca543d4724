#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub use azkaban_jobs_test_utils::{init_tracing, with_timeout};

/// Write `contents` to a temporary `Jobs.toml`-style file.
pub fn jobs_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

/// Lines of a rendered job file, without the trailing empty line.
pub fn lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}
