mod defaults;

use crate::cli::HbondArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use hbconv::core::io::mapping::{FormatPreference, MappingFormat};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialHbondConfig {
    selection: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialMappingConfig {
    format: Option<String>,
    /// A format name, or "none" to disable the fallback.
    fallback: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    hbond: Option<PartialHbondConfig>,
    mapping: Option<PartialMappingConfig>,
}

/// Fully resolved settings for the `hbond` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HbondConfig {
    pub selection: String,
    pub mapping_formats: FormatPreference,
}

fn parse_format(key: &str, value: &str) -> Result<MappingFormat> {
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for '{}': {}", key, e)))
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final settings: command-line flags win over the file, which wins
    /// over the built-in defaults.
    pub fn merge_with_cli(self, args: &HbondArgs) -> Result<HbondConfig> {
        let defaults = DefaultsConfig::default();
        let hbond = self.hbond.unwrap_or_default();
        let mapping = self.mapping.unwrap_or_default();

        let selection = args
            .selection
            .clone()
            .or(hbond.selection)
            .unwrap_or(defaults.selection);
        if selection.trim().is_empty() {
            return Err(CliError::Config("'hbond.selection' cannot be empty".into()));
        }

        let primary = match (args.mapping_format, mapping.format) {
            (Some(format), _) => format,
            (None, Some(name)) => parse_format("mapping.format", &name)?,
            (None, None) => defaults.mapping_format,
        };

        let fallback = if args.no_mapping_fallback {
            None
        } else if let Some(format) = args.mapping_fallback {
            Some(format)
        } else {
            match mapping.fallback.as_deref() {
                Some("none") => None,
                Some(name) => Some(parse_format("mapping.fallback", name)?),
                None => defaults.mapping_fallback,
            }
        };

        let mapping_formats = FormatPreference {
            primary,
            fallback: fallback.filter(|f| *f != primary),
        };
        debug!(
            "Resolved configuration: selection='{}', mapping formats={:?}",
            selection, mapping_formats
        );

        Ok(HbondConfig {
            selection,
            mapping_formats,
        })
    }
}
