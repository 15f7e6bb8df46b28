use std::{
    cell::RefCell,
    collections::HashMap,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use encoding_rs::Encoding;
use log::debug;

use crate::error::{CsvError, CsvResult};

/// Access to the files read by the parser and written by the writer.
///
/// The parser and writer never touch the file system directly, so the
/// default [`FileSystem`] can be replaced by [`MemoryStorage`] or any other
/// implementation.
///
/// Lines are split on `\n`, a `\r` preceding it is removed and a final line
/// terminator does not produce an extra empty line.
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    fn read_all_lines(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<Vec<String>>;

    fn read_first_line(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<String>;

    fn exists(&self, path: &Path) -> bool;

    fn delete(&self, path: &Path) -> CsvResult<()>;

    /// Opens a sink positioned at the start of the file, creating it when missing.
    fn open_for_write(&self, path: &Path) -> CsvResult<Box<dyn Write>>;
}

/// Decodes raw bytes, honouring a byte order mark when present.
pub(crate) fn decode(path: &Path, bytes: &[u8], encoding: &'static Encoding) -> CsvResult<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding {
            path: path.to_path_buf(),
            encoding: used.name(),
        });
    }
    Ok(text.into_owned())
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn first_line(path: &Path, lines: Vec<String>) -> CsvResult<String> {
    lines
        .into_iter()
        .next()
        .ok_or_else(|| CsvError::NotFound(path.to_path_buf()))
}

/// [`Storage`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl Storage for FileSystem {
    fn read_all_lines(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<Vec<String>> {
        let bytes = fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        let text = decode(path, &bytes, encoding)?;
        Ok(split_lines(&text))
    }

    /// Reads up to the first line feed only, unless the encoding (declared or
    /// given by a byte order mark) can hold `0x0A` inside other characters.
    fn read_first_line(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<String> {
        if !encoding.is_ascii_compatible() {
            return first_line(path, self.read_all_lines(path, encoding)?);
        }

        let mut reader = BufReader::new(File::open(path)?);
        let mut bytes = Vec::new();
        reader.read_until(b'\n', &mut bytes)?;

        if Encoding::for_bom(&bytes).is_some_and(|(bom, _)| !bom.is_ascii_compatible()) {
            return first_line(path, self.read_all_lines(path, encoding)?);
        }

        debug!("Read first line ({} bytes) of {}", bytes.len(), path.display());
        let text = decode(path, &bytes, encoding)?;
        first_line(path, split_lines(&text))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete(&self, path: &Path) -> CsvResult<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn open_for_write(&self, path: &Path) -> CsvResult<Box<dyn Write>> {
        // Existing content beyond what is written is kept, callers delete first.
        let file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

type Files = Rc<RefCell<HashMap<PathBuf, Vec<u8>>>>;

/// [`Storage`] keeping every file in memory.
///
/// Clones share the same files, so a clone handed to a parser or writer can
/// be inspected afterwards.
///
/// ```
/// use alpha_csv::core::storage::{MemoryStorage, Storage};
/// use std::path::Path;
///
/// let storage = MemoryStorage::new();
/// storage.add_file("people.csv", "Name,Surname\r\nJohn,Doe\r\n");
///
/// let lines = storage
///     .read_all_lines(Path::new("people.csv"), encoding_rs::UTF_8)
///     .unwrap();
/// assert_eq!(lines, vec!["Name,Surname", "John,Doe"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    files: Files,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), contents.into());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn contents_as_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.contents(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    fn missing(path: &Path) -> CsvError {
        CsvError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        ))
    }
}

impl Storage for MemoryStorage {
    fn read_all_lines(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<Vec<String>> {
        let files = self.files.borrow();
        let bytes = files.get(path).ok_or_else(|| Self::missing(path))?;
        let text = decode(path, bytes, encoding)?;
        Ok(split_lines(&text))
    }

    fn read_first_line(&self, path: &Path, encoding: &'static Encoding) -> CsvResult<String> {
        first_line(path, self.read_all_lines(path, encoding)?)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn delete(&self, path: &Path) -> CsvResult<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::missing(path))
    }

    fn open_for_write(&self, path: &Path) -> CsvResult<Box<dyn Write>> {
        let buffer = self.files.borrow().get(path).cloned().unwrap_or_default();
        Ok(Box::new(MemoryFile {
            path: path.to_path_buf(),
            buffer,
            position: 0,
            files: Rc::clone(&self.files),
        }))
    }
}

/// Sink returned by [`MemoryStorage::open_for_write`]; content is stored on flush.
struct MemoryFile {
    path: PathBuf,
    buffer: Vec<u8>,
    position: usize,
    files: Files,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = self.position + buf.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(buf);
        self.position = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.files
            .borrow_mut()
            .insert(self.path.clone(), self.buffer.clone());
        Ok(())
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
