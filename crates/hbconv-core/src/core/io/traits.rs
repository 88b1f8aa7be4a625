use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Raised when an input path does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Input file '{path}' not found", path = path.display())]
pub struct FileNotFound {
    pub path: PathBuf,
}

/// Opens `path` for buffered reading, reporting a missing file as [`FileNotFound`]
/// rather than a bare I/O error.
pub fn open_input<E>(path: &Path) -> Result<BufReader<File>, E>
where
    E: From<io::Error> + From<FileNotFound>,
{
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FileNotFound {
            path: path.to_path_buf(),
        }
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Defines the interface for reading and writing line-oriented text formats.
///
/// Implementors handle format-specific parsing and serialization. The whole input is
/// materialized into [`TextFile::Content`]; there is no incremental reading.
pub trait TextFile {
    /// The in-memory representation of the file's content.
    type Content;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error> + From<FileNotFound>;

    /// Reads the content from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error>;

    /// Writes the content to a writer in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads the content from a file path.
    ///
    /// # Errors
    ///
    /// Returns a [`FileNotFound`]-derived error if the path does not exist, or any
    /// error [`TextFile::read_from`] produces.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Content, Self::Error> {
        let mut reader = open_input::<Self::Error>(path.as_ref())?;
        Self::read_from(&mut reader)
    }

    /// Writes the content to a file path, creating or truncating it.
    fn write_to_path<P: AsRef<Path>>(
        content: &Self::Content,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(content, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
