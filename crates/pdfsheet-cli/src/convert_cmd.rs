use std::path::Path;

use pdfsheet::pdfsheet_core::DetectOptions;
use pdfsheet::convert_with;

use crate::cli::SummaryFormat;
use crate::shared::{ProgressReporter, convert_options, require_extension};

/// Run the `convert` subcommand.
///
/// Exit codes: 0 on success (including a run with skipped pages or no
/// tables), 1 on a fatal pipeline error, 2 on a usage error.
pub fn run(
    input: &Path,
    output: &Path,
    pages: Option<&str>,
    format: &SummaryFormat,
    detect: &DetectOptions,
) -> Result<(), i32> {
    require_extension(input, "pdf")?;
    require_extension(output, "xlsx")?;
    let options = convert_options(pages, detect)?;
    log::debug!(
        "converting {} -> {} ({:?})",
        input.display(),
        output.display(),
        options.pages
    );

    let mut reporter = ProgressReporter::new();
    let summary = convert_with(input, output, &options, |p| reporter.handle(&p)).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    // Skipped pages are warnings; they never change the exit code.
    for fault in &summary.faults {
        eprintln!("Warning: skipped {fault}");
    }

    match format {
        SummaryFormat::Text => {
            if summary.output.is_some() {
                println!(
                    "Wrote {} sheet(s) from {} page(s) to {}",
                    summary.sheets.len(),
                    summary.pages,
                    output.display()
                );
            } else {
                println!("No tables found in {}; nothing written", input.display());
            }
        }
        SummaryFormat::Json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize summary: {e}");
                return Err(1);
            }
        },
    }

    Ok(())
}
