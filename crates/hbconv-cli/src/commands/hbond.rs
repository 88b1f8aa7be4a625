use crate::cli::HbondArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use hbconv::workflows::convert::{self, NameOptions};
use hbconv::workflows::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

pub fn run(args: HbondArgs, config_path: Option<&Path>, quiet: bool) -> Result<()> {
    let config = PartialConfig::load(config_path)?.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    if let Some(input) = &args.hbm {
        let output = args
            .output_hbm
            .clone()
            .unwrap_or_else(|| convert::default_output_path(input));
        info!("Converting existence map {:?} -> {:?}", input, &output);

        let report = convert::convert_existence_map(input, &output, &reporter)?;
        if !quiet {
            println!(
                "✓ Existence matrix ({} frames × {} hydrogen bonds) written to: {}",
                report.n_samples,
                report.n_hbonds,
                report.output.display()
            );
        }
    }

    if let Some(input) = &args.hbn {
        let mapping_path = args.mapping.as_deref().ok_or_else(|| {
            CliError::Argument("--hbn requires a mapping (-d/--dictionary)".to_string())
        })?;
        let output = args
            .output_hbn
            .clone()
            .unwrap_or_else(|| convert::default_output_path(input));
        info!(
            "Converting hydrogen-bond names {:?} -> {:?} (selection '{}')",
            input, &output, &config.selection
        );

        let options = NameOptions {
            mapping_path,
            mapping_formats: config.mapping_formats,
            selection: &config.selection,
        };
        let report = convert::convert_hbond_names(input, &output, &options, &reporter)?;
        if !quiet {
            println!(
                "✓ {} hydrogen-bond names written to: {}",
                report.n_hbonds,
                report.output.display()
            );
        }
    }

    Ok(())
}
