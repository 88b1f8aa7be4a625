use crate::core::io::traits::{FileNotFound, TextFile};
use crate::core::models::mapping::{GroupMapping, MemberId};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const MEMBERS_PER_LINE: usize = 15;

/// A named group of atom indices from a GROMACS index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup {
    pub name: String,
    pub members: Vec<u64>,
}

#[derive(Debug, Error)]
pub enum NdxError {
    #[error(transparent)]
    NotFound(#[from] FileNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid integer '{value}' on line {line}")]
    InvalidInteger { line: usize, value: String },
    #[error("Line {line} lists members before any '[ group ]' header")]
    MemberOutsideGroup { line: usize },
}

/// Returns the group name if `line` is a `[ name ]` section header.
pub fn parse_section_header(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Reader and writer for GROMACS index (`.ndx`) files.
pub struct NdxFile;

impl NdxFile {
    /// Converts index groups into a group mapping, keeping file order.
    ///
    /// A group name that appears twice has its members merged.
    pub fn to_group_mapping(groups: &[IndexGroup]) -> GroupMapping {
        let mut mapping = GroupMapping::new();
        for group in groups {
            mapping
                .entry(group.name.clone())
                .or_default()
                .extend(group.members.iter().copied().map(MemberId::from));
        }
        mapping
    }
}

impl TextFile for NdxFile {
    type Content = Vec<IndexGroup>;
    type Error = NdxError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<IndexGroup>, NdxError> {
        let mut groups: Vec<IndexGroup> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if let Some(name) = parse_section_header(&line) {
                groups.push(IndexGroup {
                    name: name.to_string(),
                    members: Vec::new(),
                });
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some(current) = groups.last_mut() else {
                return Err(NdxError::MemberOutsideGroup { line: line_num });
            };
            for token in line.split_whitespace() {
                let member = token.parse().map_err(|_| NdxError::InvalidInteger {
                    line: line_num,
                    value: token.to_string(),
                })?;
                current.members.push(member);
            }
        }

        Ok(groups)
    }

    fn write_to(groups: &Vec<IndexGroup>, writer: &mut impl Write) -> Result<(), NdxError> {
        for group in groups {
            writeln!(writer, "[ {} ]", group.name)?;
            for chunk in group.members.chunks(MEMBERS_PER_LINE) {
                let line: Vec<String> = chunk.iter().map(|m| format!("{:>4}", m)).collect();
                writeln!(writer, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Vec<IndexGroup>, NdxError> {
        NdxFile::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn parse_section_header_accepts_bracketed_names() {
        assert_eq!(parse_section_header("[ Protein ]"), Some("Protein"));
        assert_eq!(parse_section_header("[hbonds_SOL]  "), Some("hbonds_SOL"));
        assert_eq!(parse_section_header("1 2 3"), None);
    }

    #[test]
    fn read_from_collects_members_until_next_header() {
        let groups = parse("[ System ]\n1 2 3\n4\n\n[ Water ]\n  10   11\n").unwrap();
        assert_eq!(
            groups,
            vec![
                IndexGroup {
                    name: "System".into(),
                    members: vec![1, 2, 3, 4]
                },
                IndexGroup {
                    name: "Water".into(),
                    members: vec![10, 11]
                },
            ]
        );
    }

    #[test]
    fn read_from_rejects_non_integer_members() {
        match parse("[ A ]\n1 two 3\n") {
            Err(NdxError::InvalidInteger { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "two");
            }
            other => panic!("expected InvalidInteger, got {:?}", other),
        }
    }

    #[test]
    fn read_from_rejects_members_before_first_header() {
        assert!(matches!(
            parse("1 2\n[ A ]\n"),
            Err(NdxError::MemberOutsideGroup { line: 1 })
        ));
    }

    #[test]
    fn write_to_wraps_long_groups_and_reads_back() {
        let groups = vec![IndexGroup {
            name: "Long".into(),
            members: (1..=20).collect(),
        }];
        let mut buffer = Vec::new();
        NdxFile::write_to(&groups, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(parse(&text).unwrap(), groups);
    }

    #[test]
    fn to_group_mapping_merges_repeated_group_names() {
        let groups = vec![
            IndexGroup {
                name: "A".into(),
                members: vec![1],
            },
            IndexGroup {
                name: "B".into(),
                members: vec![2],
            },
            IndexGroup {
                name: "A".into(),
                members: vec![3],
            },
        ];
        let mapping = NdxFile::to_group_mapping(&groups);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(
            mapping["A"],
            vec![MemberId::Integer(1), MemberId::Integer(3)]
        );
    }
}
