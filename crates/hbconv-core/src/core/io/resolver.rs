use crate::core::io::traits::{FileNotFound, open_input};
use crate::core::models::label::HBondLabel;
use crate::core::models::mapping::IdentifierMapping;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    NotFound(#[from] FileNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Section '{header}' not found in index file")]
    SectionNotFound { header: String },
    #[error("Line {line} has {tokens} fields, expected 'donor hydrogen acceptor'")]
    MalformedLine { line: usize, tokens: usize },
    #[error("Identifier '{identifier}' on line {line} is not in the mapping")]
    UnknownIdentifier { line: usize, identifier: String },
}

/// Translates the `[ hbonds_<selection> ]` section of a `gmx hbond -hbn` index file
/// into hydrogen-bond labels.
///
/// GROMACS lists the donor/hydrogen/acceptor triples in the opposite order to the rows
/// of the matching existence map: the first triple belongs to the last column of the
/// decoded matrix. The labels are therefore returned in reverse file order, so that
/// label `i` names column `i` of the matrix.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierResolver<'a> {
    mapping: &'a IdentifierMapping,
    selection: &'a str,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(mapping: &'a IdentifierMapping, selection: &'a str) -> Self {
        Self { mapping, selection }
    }

    /// The exact header line that opens the hydrogen-bond section.
    pub fn section_header(&self) -> String {
        format!("[ hbonds_{} ]", self.selection)
    }

    fn lookup(&self, identifier: &str, line: usize) -> Result<&'a str, ResolveError> {
        self.mapping
            .group_of(identifier)
            .ok_or_else(|| ResolveError::UnknownIdentifier {
                line,
                identifier: identifier.to_string(),
            })
    }

    pub fn resolve_from(&self, reader: &mut impl BufRead) -> Result<Vec<HBondLabel>, ResolveError> {
        let header = self.section_header();
        let mut lines = reader.lines().enumerate();

        let mut found = false;
        for (_, line_res) in lines.by_ref() {
            if line_res?.trim_end() == header {
                found = true;
                break;
            }
        }
        if !found {
            return Err(ResolveError::SectionNotFound { header });
        }

        let mut labels = Vec::new();
        for (line_num, line_res) in lines {
            let line = line_res?;
            let line_num = line_num + 1;

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [donor, _hydrogen, acceptor] = tokens.as_slice() else {
                return Err(ResolveError::MalformedLine {
                    line: line_num,
                    tokens: tokens.len(),
                });
            };

            let donor_group = self.lookup(donor, line_num)?;
            let acceptor_group = self.lookup(acceptor, line_num)?;
            labels.push(HBondLabel::new(donor_group, acceptor_group));
        }

        debug!(
            "Resolved {} hydrogen bonds from section '{}'.",
            labels.len(),
            header
        );
        labels.reverse();
        Ok(labels)
    }

    pub fn resolve_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<HBondLabel>, ResolveError> {
        let mut reader = open_input::<ResolveError>(path.as_ref())?;
        self.resolve_from(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn mapping() -> IdentifierMapping {
        [
            ("1", "A"),
            ("2", "H"),
            ("3", "B"),
            ("4", "C"),
            ("5", "H"),
            ("6", "D"),
        ]
        .into_iter()
        .collect()
    }

    fn resolve(text: &str, selection: &str) -> Result<Vec<String>, ResolveError> {
        let mapping = mapping();
        IdentifierResolver::new(&mapping, selection)
            .resolve_from(&mut Cursor::new(text.as_bytes()))
            .map(|labels| labels.into_iter().map(HBondLabel::into_string).collect())
    }

    #[test]
    fn resolve_returns_labels_in_reverse_file_order() {
        let labels = resolve("[ hbonds_Protein ]\n1 2 3\n4 5 6\n", "Protein").unwrap();
        assert_eq!(labels, vec!["C-D", "A-B"]);
    }

    #[test]
    fn resolve_skips_everything_before_the_selected_section() {
        let text = "[ donors_hydrogens_Protein ]\n1 2\n4 5\n[ acceptors_Protein ]\n3\n6\n\
                    [ hbonds_Protein ]\n4 5 3\n";
        assert_eq!(resolve(text, "Protein").unwrap(), vec!["C-B"]);
    }

    #[test]
    fn resolve_matches_selection_case_sensitively() {
        let err = resolve("[ hbonds_protein ]\n1 2 3\n", "Protein").unwrap_err();
        match err {
            ResolveError::SectionNotFound { header } => {
                assert_eq!(header, "[ hbonds_Protein ]")
            }
            other => panic!("expected SectionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn resolve_fails_when_section_is_missing() {
        assert!(matches!(
            resolve("", "Protein"),
            Err(ResolveError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn resolve_rejects_lines_without_exactly_three_fields() {
        match resolve("[ hbonds_Protein ]\n1 2 3\n4 5\n", "Protein") {
            Err(ResolveError::MalformedLine { line, tokens }) => {
                assert_eq!(line, 3);
                assert_eq!(tokens, 2);
            }
            other => panic!("expected MalformedLine, got {:?}", other),
        }
        assert!(matches!(
            resolve("[ hbonds_Protein ]\n1 2 3 4\n", "Protein"),
            Err(ResolveError::MalformedLine { tokens: 4, .. })
        ));
    }

    #[test]
    fn resolve_reports_unknown_donor_or_acceptor() {
        match resolve("[ hbonds_Protein ]\n1 2 9\n", "Protein") {
            Err(ResolveError::UnknownIdentifier { line, identifier }) => {
                assert_eq!(line, 2);
                assert_eq!(identifier, "9");
            }
            other => panic!("expected UnknownIdentifier, got {:?}", other),
        }
        assert!(matches!(
            resolve("[ hbonds_Protein ]\n8 2 3\n", "Protein"),
            Err(ResolveError::UnknownIdentifier { ref identifier, .. }) if identifier == "8"
        ));
    }

    #[test]
    fn resolve_ignores_hydrogen_identifier() {
        let labels = resolve("[ hbonds_Protein ]\n1 999 6\n", "Protein").unwrap();
        assert_eq!(labels, vec!["A-D"]);
    }

    #[test]
    fn resolve_from_path_reports_missing_file_as_not_found() {
        let dir = tempdir().unwrap();
        let mapping = mapping();
        let resolver = IdentifierResolver::new(&mapping, "Protein");
        assert!(matches!(
            resolver.resolve_from_path(dir.path().join("hbn.ndx")),
            Err(ResolveError::NotFound(_))
        ));
    }
}
