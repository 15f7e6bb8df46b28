#![allow(dead_code)]

mod mocks;

pub use mocks::{BrokenSinkStorage, MockFile};

use std::{fs, path::PathBuf};

use alpha_csv::core::schema::{ColumnType, Schema};
use tempfile::TempDir;

pub const PEOPLE: &str = "# exported from the staff directory
Name,Surname,Age,Height,Hired,Active

John,Doe,42,1.80,2019-03-01 09:00:00,true
Jane,\"Smith, Jr.\",37,1.65,2021-11-15 14:30:00,false
";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn people_schema() -> Schema {
    Schema::builder()
        .column("Name", ColumnType::Text)
        .column("Surname", ColumnType::Text)
        .column("Age", ColumnType::Integer)
        .column("Height", ColumnType::Float)
        .column("Hired", ColumnType::DateTime)
        .column("Active", ColumnType::Boolean)
        .build()
        .expect("people schema is valid")
}

/// Writes `contents` to `name` inside a fresh temporary directory.
///
/// The directory is removed when the returned guard is dropped.
pub fn temp_file(name: &str, contents: impl AsRef<[u8]>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write CSV file");
    (dir, path)
}
