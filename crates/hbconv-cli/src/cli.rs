use clap::{ArgGroup, Args, Parser, Subcommand};
use hbconv::core::io::mapping::MappingFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "shiny-md-collection contributors",
    version,
    about = "hbconv - Convert GROMACS hydrogen-bond analysis output to NumPy files.",
    help_template = HELP_TEMPLATE,
    after_help = "https://github.com/janjoswig/shiny-md-collection",
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert `gmx hbond` output (hbm.xpm and/or hbn.ndx) to NumPy files.
    Hbond(HbondArgs),
}

/// Arguments for the `hbond` subcommand.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("inputs")
        .required(true)
        .multiple(true)
        .args(["hbm", "hbn"]),
))]
pub struct HbondArgs {
    // --- Existence Map ---
    /// Hydrogen-bond existence map written by `gmx hbond -hbm` (.xpm).
    #[arg(long, value_name = "PATH")]
    pub hbm: Option<PathBuf>,

    /// Output path for the existence matrix.
    /// Defaults to the input path with a `.npy` extension.
    #[arg(long = "output-hbm", visible_alias = "ohbm", value_name = "PATH")]
    pub output_hbm: Option<PathBuf>,

    // --- Hydrogen-Bond Names ---
    /// Hydrogen-bond index written by `gmx hbond -hbn` (.ndx). Requires a mapping (-d).
    #[arg(long, value_name = "PATH", requires = "mapping")]
    pub hbn: Option<PathBuf>,

    /// Output path for the hydrogen-bond names.
    /// Defaults to the input path with a `.npy` extension.
    #[arg(long = "output-hbn", visible_alias = "ohbn", value_name = "PATH")]
    pub output_hbn: Option<PathBuf>,

    /// Group mapping used to name hydrogen-bond identifiers,
    /// e.g. {"GroupA": [atom_a, atom_b, ...], ...}.
    #[arg(short = 'd', long = "dictionary", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Format to read the mapping as first (json, toml, ndx).
    #[arg(long, value_name = "FORMAT")]
    pub mapping_format: Option<MappingFormat>,

    /// Format to try if the first one fails (json, toml, ndx).
    #[arg(long, value_name = "FORMAT", conflicts_with = "no_mapping_fallback")]
    pub mapping_fallback: Option<MappingFormat>,

    /// Only try the first mapping format.
    #[arg(long)]
    pub no_mapping_fallback: bool,

    /// Name of the group that was used for the hbond analysis (default: Protein).
    #[arg(short, long, value_name = "NAME")]
    pub selection: Option<String>,
}
