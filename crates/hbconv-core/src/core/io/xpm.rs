//! GROMACS XPixMap existence maps (`gmx hbond -hbm`).
//!
//! The layout this module understands is the one GROMACS writes:
//!
//! ```text
//! /* XPM */
//! /* title:   "Hydrogen Bond Existence Map" */
//! static char *gromacs_xpm[] = {
//! "6 3   2 1",
//! "   c #FFFFFF " /* "None" */,
//! "o  c #FF0000 " /* "Present" */,
//! /* x-axis:  0 1 2 3 4 5 */
//! "oo  o ",
//! "  oooo",
//! "o    o"
//! ```
//!
//! Comment lines are dropped first, then the next four lines (declaration, dimensions
//! and the two colour entries) are metadata. Every remaining line is the time trace
//! of one tracked entity.

use crate::core::io::traits::{FileNotFound, TextFile};
use crate::core::models::matrix::ExistenceMatrix;
use phf::{Map, phf_map};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

const COMMENT_MARKER: &str = "/*";
const METADATA_LINES: usize = 4;
const ABSENT_MARKER: char = ' ';
const PRESENT_MARKER: char = 'o';

static MARKER_VALUES: Map<char, u8> = phf_map! {
    ' ' => 0,
    'o' => 1,
};

#[derive(Debug, Error)]
pub enum XpmError {
    #[error(transparent)]
    NotFound(#[from] FileNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unknown marker {found:?} on line {line}, column {column}")]
    UnknownMarker {
        line: usize,
        column: usize,
        found: char,
    },
    #[error("Row on line {line} has {found} samples, expected {expected}")]
    ShapeMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

fn strip_pixel_line(line: &str) -> &str {
    line.trim_matches(|c| matches!(c, '"' | '\n' | ','))
}

fn decode_pixel_line(pixels: &str, line: usize) -> Result<Vec<u8>, XpmError> {
    pixels
        .chars()
        .enumerate()
        .map(|(i, c)| {
            MARKER_VALUES
                .get(&c)
                .copied()
                .ok_or(XpmError::UnknownMarker {
                    line,
                    column: i + 1,
                    found: c,
                })
        })
        .collect()
}

/// Reader and writer for hydrogen-bond existence maps.
pub struct XpmFile;

impl TextFile for XpmFile {
    type Content = ExistenceMatrix;
    type Error = XpmError;

    fn read_from(reader: &mut impl BufRead) -> Result<ExistenceMatrix, XpmError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        let mut row_lines: Vec<usize> = Vec::new();
        let mut content_lines = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line.starts_with(COMMENT_MARKER) {
                continue;
            }
            content_lines += 1;
            if content_lines <= METADATA_LINES {
                continue;
            }

            rows.push(decode_pixel_line(strip_pixel_line(&line), line_num)?);
            row_lines.push(line_num);
        }

        debug!(
            "Decoded {} existence rows ({} content lines).",
            rows.len(),
            content_lines
        );

        ExistenceMatrix::from_entity_rows(&rows).map_err(|e| XpmError::ShapeMismatch {
            line: row_lines[e.row],
            expected: e.expected,
            found: e.found,
        })
    }

    fn write_to(matrix: &ExistenceMatrix, writer: &mut impl Write) -> Result<(), XpmError> {
        let rows = matrix.to_entity_rows();

        writeln!(writer, "/* XPM */")?;
        writeln!(writer, "/* Generated by hbconv */")?;
        writeln!(writer, "static char *gromacs_xpm[] = {{")?;
        writeln!(
            writer,
            "\"{} {}   2 1\",",
            matrix.n_samples(),
            matrix.n_entities()
        )?;
        writeln!(writer, "\"{}  c #FFFFFF \" /* \"None\" */,", ABSENT_MARKER)?;
        writeln!(writer, "\"{}  c #FF0000 \" /* \"Present\" */,", PRESENT_MARKER)?;

        for (i, row) in rows.iter().enumerate() {
            let pixels: String = row
                .iter()
                .map(|&v| if v == 0 { ABSENT_MARKER } else { PRESENT_MARKER })
                .collect();
            let separator = if i + 1 < rows.len() { "," } else { "" };
            writeln!(writer, "\"{}\"{}", pixels, separator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const HEADER: &str = "/* XPM */\n\
        /* title:   \"Hydrogen Bond Existence Map\" */\n\
        static char *gromacs_xpm[] = {\n\
        \"4 3   2 1\",\n\
        \"   c #FFFFFF \" /* \"None\" */,\n\
        \"o  c #FF0000 \" /* \"Present\" */,\n\
        /* x-axis:  0 1 2 3 */\n\
        /* y-axis:  0 1 2 */\n";

    fn decode(text: &str) -> Result<ExistenceMatrix, XpmError> {
        XpmFile::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn read_from_decodes_and_transposes_rows() {
        let text = format!("{HEADER}\"oo o\",\n\"  oo\",\n\"o   \"\n");
        let matrix = decode(&text).unwrap();

        assert_eq!(matrix.shape(), (4, 3));
        assert_eq!(matrix.entity_trace(0).collect::<Vec<_>>(), vec![1, 1, 0, 1]);
        assert_eq!(matrix.entity_trace(1).collect::<Vec<_>>(), vec![0, 0, 1, 1]);
        assert_eq!(matrix.entity_trace(2).collect::<Vec<_>>(), vec![1, 0, 0, 0]);
        assert_eq!(matrix.sample(3), Some(&[1u8, 1, 0][..]));
    }

    #[test]
    fn read_from_does_not_count_comments_toward_metadata_skip() {
        let text = "/* a */\nmeta1\n/* b */\nmeta2\nmeta3\n/* c */\nmeta4\n\"o \",\n\" o\"\n";
        let matrix = decode(text).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.as_slice(), &[1, 0, 0, 1]);
    }

    #[test]
    fn read_from_rejects_ragged_rows_with_shape_mismatch() {
        let text = format!("{HEADER}\"oo o\",\n\"  o\",\n\"o   \"\n");
        match decode(&text) {
            Err(XpmError::ShapeMismatch {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 10);
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn read_from_rejects_unknown_marker_characters() {
        let text = format!("{HEADER}\"oo o\",\n\" xoo\"\n");
        match decode(&text) {
            Err(XpmError::UnknownMarker {
                line,
                column,
                found,
            }) => {
                assert_eq!(line, 10);
                assert_eq!(column, 2);
                assert_eq!(found, 'x');
            }
            other => panic!("expected UnknownMarker, got {:?}", other),
        }
    }

    #[test]
    fn read_from_treats_markers_case_sensitively() {
        let text = format!("{HEADER}\"oO\"\n");
        assert!(matches!(
            decode(&text),
            Err(XpmError::UnknownMarker { found: 'O', .. })
        ));
    }

    #[test]
    fn read_from_returns_empty_matrix_when_only_metadata_present() {
        let matrix = decode(HEADER).unwrap();
        assert_eq!(matrix.shape(), (0, 0));

        let matrix = decode("").unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn read_from_handles_crlf_line_endings() {
        let text = "m1\r\nm2\r\nm3\r\nm4\r\n\"o o\",\r\n\" o \"\r\n";
        let matrix = decode(text).unwrap();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.as_slice(), &[1, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn write_to_then_read_from_reproduces_matrix() {
        let original =
            ExistenceMatrix::from_entity_rows(&[vec![0, 1, 1, 0, 1], vec![1, 0, 0, 0, 1]])
                .unwrap();

        let mut buffer = Vec::new();
        XpmFile::write_to(&original, &mut buffer).unwrap();
        let decoded = XpmFile::read_from(&mut Cursor::new(buffer)).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn read_from_path_reports_missing_file_as_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("notafile.xpm");
        match XpmFile::read_from_path(&missing) {
            Err(XpmError::NotFound(e)) => assert_eq!(e.path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn write_to_path_and_read_from_path_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hbm.xpm");
        let original = ExistenceMatrix::from_entity_rows(&[vec![1, 1], vec![0, 1]]).unwrap();

        XpmFile::write_to_path(&original, &path).unwrap();
        assert_eq!(XpmFile::read_from_path(&path).unwrap(), original);
    }
}
