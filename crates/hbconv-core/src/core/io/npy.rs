//! Writer for NumPy `.npy` files (format version 1.0).
//!
//! Only the two array kinds this crate produces are supported: C-ordered `uint8`
//! arrays and 1-D fixed-width unicode (`<U{n}`) arrays.

use crate::core::models::label::HBondLabel;
use crate::core::models::matrix::ExistenceMatrix;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

const MAGIC: &[u8] = b"\x93NUMPY";
const VERSION: [u8; 2] = [1, 0];
const PREAMBLE_LEN: usize = MAGIC.len() + VERSION.len() + 2;
const ALIGNMENT: usize = 64;

#[derive(Debug, Error)]
pub enum NpyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Array data has {found} elements but shape {shape:?} requires {expected}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },
    #[error("Array header is too long ({0} bytes)")]
    HeaderTooLong(usize),
}

fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({},)", single),
        dims => format!(
            "({})",
            dims.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn write_header(writer: &mut impl Write, descr: &str, shape: &[usize]) -> Result<(), NpyError> {
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        descr,
        format_shape(shape)
    );
    let unpadded = PREAMBLE_LEN + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let header_len =
        u16::try_from(header.len()).map_err(|_| NpyError::HeaderTooLong(header.len()))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION)?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(header.as_bytes())?;
    Ok(())
}

/// Writes a C-ordered `uint8` array.
///
/// # Errors
///
/// Returns [`NpyError::ShapeMismatch`] if `data` does not hold exactly the number of
/// elements `shape` describes.
pub fn write_u8_array(
    writer: &mut impl Write,
    shape: &[usize],
    data: &[u8],
) -> Result<(), NpyError> {
    let expected: usize = shape.iter().product();
    if expected != data.len() {
        return Err(NpyError::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            found: data.len(),
        });
    }
    write_header(writer, "|u1", shape)?;
    writer.write_all(data)?;
    Ok(())
}

/// Writes a 1-D unicode array, as NumPy would store a list of Python strings.
///
/// Every element is padded with NUL code points to the length of the longest one.
pub fn write_unicode_array<S: AsRef<str>>(
    writer: &mut impl Write,
    values: &[S],
) -> Result<(), NpyError> {
    let width = values
        .iter()
        .map(|v| v.as_ref().chars().count())
        .max()
        .unwrap_or(0)
        .max(1);

    write_header(writer, &format!("<U{}", width), &[values.len()])?;
    for value in values {
        let mut written = 0;
        for c in value.as_ref().chars() {
            writer.write_all(&u32::from(c).to_le_bytes())?;
            written += 1;
        }
        for _ in written..width {
            writer.write_all(&0u32.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Appends `.npy` unless the path already ends with it, like `numpy.save` does.
pub fn npy_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "npy") {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".npy");
        PathBuf::from(name)
    }
}

fn persist_with<F>(path: &Path, write: F) -> Result<PathBuf, NpyError>
where
    F: FnOnce(&mut BufWriter<&mut std::fs::File>) -> Result<(), NpyError>,
{
    let target = npy_path(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.persist(&target).map_err(|e| NpyError::Io(e.error))?;

    debug!("Wrote {:?}", &target);
    Ok(target)
}

/// Saves an existence matrix as a `(n_samples, n_entities)` `uint8` array.
///
/// The data goes to a temporary file next to the target which only replaces the
/// target once fully written. Returns the final path (with `.npy` appended if needed).
pub fn save_matrix(path: &Path, matrix: &ExistenceMatrix) -> Result<PathBuf, NpyError> {
    let (n_samples, n_entities) = matrix.shape();
    persist_with(path, |w| {
        write_u8_array(w, &[n_samples, n_entities], matrix.as_slice())
    })
}

/// Saves hydrogen-bond labels as a 1-D unicode array, in the order given.
pub fn save_labels(path: &Path, labels: &[HBondLabel]) -> Result<PathBuf, NpyError> {
    persist_with(path, |w| write_unicode_array(w, labels))
}
