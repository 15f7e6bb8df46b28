//! Mock sink standing in for a file that cannot be written.
use mockall::mock;

use std::{
    io::{self, Write},
    path::Path,
};

use alpha_csv::{
    CsvResult,
    core::storage::{MemoryStorage, Storage},
};
use encoding_rs::Encoding;

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

/// Reads from memory but hands out a sink failing on every write.
#[derive(Default)]
pub struct BrokenSinkStorage {
    pub inner: MemoryStorage,
}

impl Storage for BrokenSinkStorage {
    fn read_all_lines(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<Vec<String>> {
        self.inner.read_all_lines(path, encoding)
    }

    fn read_first_line(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<String> {
        self.inner.read_first_line(path, encoding)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn delete(&self, path: &Path) -> CsvResult<()> {
        self.inner.delete(path)
    }

    fn open_for_write(&self, _path: &Path) -> CsvResult<Box<dyn Write>> {
        let mut file = MockFile::new();
        file.expect_write()
            .returning(|_| Err(io::Error::new(io::ErrorKind::StorageFull, "disk full")));
        file.expect_flush().returning(|| Ok(()));
        Ok(Box::new(file))
    }
}
