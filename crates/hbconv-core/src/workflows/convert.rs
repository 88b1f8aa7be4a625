use super::error::WorkflowError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::mapping::{FormatPreference, load_group_mapping};
use crate::core::io::npy;
use crate::core::io::resolver::IdentifierResolver;
use crate::core::io::traits::TextFile;
use crate::core::io::xpm::XpmFile;
use crate::core::models::mapping::IdentifierMapping;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Summary of a finished existence-map conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixReport {
    pub output: PathBuf,
    pub n_samples: usize,
    pub n_hbonds: usize,
}

/// Summary of a finished name conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelReport {
    pub output: PathBuf,
    pub n_hbonds: usize,
}

/// Options for [`convert_hbond_names`].
#[derive(Debug, Clone)]
pub struct NameOptions<'a> {
    pub mapping_path: &'a Path,
    pub mapping_formats: FormatPreference,
    pub selection: &'a str,
}

/// The input path with its last extension replaced by `.npy`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("npy")
}

/// Decodes a `gmx hbond -hbm` existence map and saves it as a `uint8` array of shape
/// `(n_samples, n_hbonds)`.
#[instrument(skip_all, name = "existence_map")]
pub fn convert_existence_map(
    input: &Path,
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<MatrixReport, WorkflowError> {
    reporter.report(Progress::PhaseStart {
        name: "Decoding existence map",
    });
    info!("Reading existence map from {:?}", input);
    let matrix = XpmFile::read_from_path(input)?;
    let (n_samples, n_hbonds) = matrix.shape();
    reporter.report(Progress::Message(format!(
        "{} hydrogen bonds over {} frames",
        n_hbonds, n_samples
    )));
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Writing existence matrix",
    });
    let output = npy::save_matrix(output, &matrix)?;
    reporter.report(Progress::PhaseFinish);
    info!("Saved existence matrix to {:?}", &output);

    Ok(MatrixReport {
        output,
        n_samples,
        n_hbonds,
    })
}

/// Translates the hydrogen-bond triples of a `gmx hbond -hbn` index file into
/// `"donor-acceptor"` group labels and saves them as a unicode array.
///
/// The labels are stored in reverse file order so that entry `i` names column `i` of
/// the matrix written by [`convert_existence_map`].
#[instrument(skip_all, name = "hbond_names", fields(selection = options.selection))]
pub fn convert_hbond_names(
    input: &Path,
    output: &Path,
    options: &NameOptions,
    reporter: &ProgressReporter,
) -> Result<LabelReport, WorkflowError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading group mapping",
    });
    info!("Loading group mapping from {:?}", options.mapping_path);
    let groups = load_group_mapping(options.mapping_path, options.mapping_formats)?;
    let mapping = IdentifierMapping::from_groups(&groups);
    reporter.report(Progress::Message(format!(
        "{} identifiers in {} groups",
        mapping.len(),
        groups.len()
    )));
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Resolving hydrogen-bond names",
    });
    info!("Reading hydrogen-bond index from {:?}", input);
    let labels = IdentifierResolver::new(&mapping, options.selection).resolve_from_path(input)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Writing hydrogen-bond names",
    });
    let output = npy::save_labels(output, &labels)?;
    reporter.report(Progress::PhaseFinish);
    info!("Saved {} names to {:?}", labels.len(), &output);

    Ok(LabelReport {
        output,
        n_hbonds: labels.len(),
    })
}
