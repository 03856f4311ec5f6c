use anyhow::{Context, Result};
use std::path::PathBuf;

use cbiohub::combine::{CategoryOutcome, Combiner};
use cbiohub::config::StorePaths;
use cbiohub::store::StoreWriterConfig;

use super::ui;

/// Combine every processed study into the combined store
pub fn run(
    output_dir: Option<PathBuf>,
    paths: &StorePaths,
    writer_config: StoreWriterConfig,
) -> Result<()> {
    let mut combiner = Combiner::new(paths).with_writer_config(writer_config);
    if let Some(dir) = output_dir {
        combiner = combiner.with_output_dir(dir);
    }

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Combining studies from {}", paths.studies_dir().display()));
    let report = combiner
        .run()
        .with_context(|| format!("Failed to combine into {}", combiner.output_dir().display()))?;
    spinner.finish_and_clear();

    for issue in &report.study_issues {
        if issue.category.is_none() {
            println!("{}", ui::warning(&format!("Skipping {}", issue)));
        }
    }

    for (category, outcome) in &report.categories {
        match outcome {
            CategoryOutcome::Written(summary) => {
                println!(
                    "{}",
                    ui::success(&format!(
                        "Combined {} saved to {} ({} rows from {} studies)",
                        category,
                        summary.path.display(),
                        summary.stats.rows_written,
                        summary.studies.len()
                    ))
                );
                println!("  Concatenation time: {:.3?}", summary.concat_time);
                println!("  Write time: {:.3?}", summary.write_time);
            }
            CategoryOutcome::Skipped => {
                println!("{}", ui::warning(&format!("No {} tables to combine", category)))
            }
            CategoryOutcome::Failed(e) => {
                println!("{}", ui::failure(&format!("{} failed: {}", category, e)))
            }
        }
    }

    println!(
        "{}: {} written, {} skipped, {} failed",
        ui::heading("Summary"),
        report.written_count(),
        report.skipped_count(),
        report.failed_count()
    );
    log::info!("{}", report);

    if report.has_failures() {
        anyhow::bail!("{} categories failed to combine", report.failed_count());
    }
    Ok(())
}
