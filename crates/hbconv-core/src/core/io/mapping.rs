//! Loading of group mappings (`{"Group": [id, id, ...], ...}`) from disk.
//!
//! The caller states which serialization to try first and, optionally, which one to
//! fall back to. Nothing is guessed from file contents or extensions.

use crate::core::io::ndx::NdxFile;
use crate::core::io::traits::{FileNotFound, TextFile};
use crate::core::models::mapping::GroupMapping;
use phf::{Map, phf_map};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingFormat {
    /// A JSON object of group name to member list.
    Json,
    /// A TOML table of group name to member list.
    Toml,
    /// A GROMACS index file; each `[ group ]` section becomes one group.
    Ndx,
}

static FORMAT_NAMES: Map<&'static str, MappingFormat> = phf_map! {
    "json" => MappingFormat::Json,
    "toml" => MappingFormat::Toml,
    "ndx" => MappingFormat::Ndx,
};

impl MappingFormat {
    pub fn name(&self) -> &'static str {
        match self {
            MappingFormat::Json => "json",
            MappingFormat::Toml => "toml",
            MappingFormat::Ndx => "ndx",
        }
    }
}

impl fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown mapping format '{0}'. Expected one of: json, toml, ndx.")]
pub struct UnknownMappingFormat(pub String);

impl FromStr for MappingFormat {
    type Err = UnknownMappingFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FORMAT_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownMappingFormat(s.to_string()))
    }
}

/// The formats to attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPreference {
    pub primary: MappingFormat,
    pub fallback: Option<MappingFormat>,
}

impl FormatPreference {
    pub fn only(format: MappingFormat) -> Self {
        Self {
            primary: format,
            fallback: None,
        }
    }

    pub fn with_fallback(primary: MappingFormat, fallback: MappingFormat) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    fn candidates(&self) -> impl Iterator<Item = MappingFormat> {
        std::iter::once(self.primary).chain(self.fallback.filter(|f| *f != self.primary))
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    NotFound(#[from] FileNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(
        "Failed to read mapping '{path}' as {formats}",
        path = path.display(),
        formats = describe_attempts(attempts)
    )]
    Unreadable {
        path: PathBuf,
        attempts: Vec<(MappingFormat, String)>,
    },
}

fn describe_attempts(attempts: &[(MappingFormat, String)]) -> String {
    attempts
        .iter()
        .map(|(format, reason)| format!("{} ({})", format, reason))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn parse_as(format: MappingFormat, content: &str) -> Result<GroupMapping, String> {
    match format {
        MappingFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        MappingFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        MappingFormat::Ndx => NdxFile::read_from(&mut content.as_bytes())
            .map(|groups| NdxFile::to_group_mapping(&groups))
            .map_err(|e| e.to_string()),
    }
}

/// Parses a group mapping from in-memory text, trying the preferred formats in order.
pub fn parse_group_mapping(
    content: &str,
    preference: FormatPreference,
) -> Result<GroupMapping, Vec<(MappingFormat, String)>> {
    let mut attempts = Vec::new();
    for format in preference.candidates() {
        match parse_as(format, content) {
            Ok(mapping) => {
                debug!("Interpreted mapping as {} ({} groups).", format, mapping.len());
                return Ok(mapping);
            }
            Err(reason) => {
                debug!("Failed to interpret mapping as {}: {}", format, reason);
                attempts.push((format, reason));
            }
        }
    }
    Err(attempts)
}

/// Loads a group mapping from `path`.
///
/// # Errors
///
/// Returns [`MappingError::NotFound`] if the file does not exist and
/// [`MappingError::Unreadable`] if none of the preferred formats parse it.
pub fn load_group_mapping(
    path: &Path,
    preference: FormatPreference,
) -> Result<GroupMapping, MappingError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    parse_group_mapping(&content, preference).map_err(|attempts| MappingError::Unreadable {
        path: path.to_path_buf(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::mapping::MemberId;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const JSON_MAPPING: &str = r#"{"ARG12": [1, 2, "3"], "GLU40": [4]}"#;
    const TOML_MAPPING: &str = "ARG12 = [1, 2, 3]\nGLU40 = [4]\n";

    #[test]
    fn mapping_format_parses_case_insensitively() {
        assert_eq!("json".parse(), Ok(MappingFormat::Json));
        assert_eq!(" TOML ".parse(), Ok(MappingFormat::Toml));
        assert_eq!("ndx".parse(), Ok(MappingFormat::Ndx));
        assert_eq!(
            "pickle".parse::<MappingFormat>(),
            Err(UnknownMappingFormat("pickle".into()))
        );
    }

    #[test]
    fn parse_group_mapping_reads_json_in_file_order() {
        let mapping =
            parse_group_mapping(JSON_MAPPING, FormatPreference::only(MappingFormat::Json))
                .unwrap();
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["ARG12", "GLU40"]);
        assert_eq!(mapping["ARG12"][2], MemberId::Text("3".into()));
    }

    #[test]
    fn parse_group_mapping_falls_back_when_primary_fails() {
        let preference = FormatPreference::with_fallback(MappingFormat::Json, MappingFormat::Toml);
        let mapping = parse_group_mapping(TOML_MAPPING, preference).unwrap();
        assert_eq!(mapping["GLU40"], vec![MemberId::Integer(4)]);
    }

    #[test]
    fn parse_group_mapping_does_not_try_formats_outside_preference() {
        let attempts =
            parse_group_mapping(TOML_MAPPING, FormatPreference::only(MappingFormat::Json))
                .unwrap_err();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].0, MappingFormat::Json);
    }

    #[test]
    fn parse_group_mapping_reads_index_groups() {
        let mapping = parse_group_mapping(
            "[ SOL ]\n10 11 12\n[ LIG ]\n20\n",
            FormatPreference::only(MappingFormat::Ndx),
        )
        .unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["LIG"], vec![MemberId::Integer(20)]);
    }

    #[test]
    fn load_group_mapping_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_group_mapping(
            &dir.path().join("groups.json"),
            FormatPreference::only(MappingFormat::Json),
        );
        assert!(matches!(result, Err(MappingError::NotFound(_))));
    }

    #[test]
    fn load_group_mapping_reports_every_failed_attempt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("groups.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "this is neither json nor toml").unwrap();

        let preference = FormatPreference::with_fallback(MappingFormat::Json, MappingFormat::Toml);
        match load_group_mapping(&path, preference) {
            Err(MappingError::Unreadable { attempts, .. }) => {
                let formats: Vec<_> = attempts.iter().map(|(f, _)| *f).collect();
                assert_eq!(formats, vec![MappingFormat::Json, MappingFormat::Toml]);
            }
            other => panic!("expected Unreadable, got {:?}", other),
        }
    }
}
