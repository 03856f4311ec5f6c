use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use cbiohub::config::StorePaths;
use cbiohub::loader::{find_study_folders, Loader};
use cbiohub::store::StoreWriterConfig;

use super::ui;

/// Ingest one study folder or a folder of studies
pub fn run(folder: PathBuf, paths: &StorePaths, writer_config: StoreWriterConfig) -> Result<()> {
    if !folder.is_dir() {
        bail!("{} is not a directory", folder.display());
    }

    let total = find_study_folders(&folder)
        .with_context(|| format!("Failed to list {}", folder.display()))?
        .len();
    if total == 0 {
        println!("No valid studies found in {}.", folder.display());
        return Ok(());
    }

    let loader = Loader::new(paths).with_writer_config(writer_config);
    let bar = ui::study_progress(total as u64, "Processing studies");
    let mut started = false;
    let report = loader
        .ingest(&folder, |study_id| {
            if started {
                bar.inc(1);
            }
            started = true;
            bar.set_message(format!("Processing {}", study_id));
        })
        .with_context(|| format!("Failed to ingest {}", folder.display()))?;
    bar.inc(1);
    bar.finish_and_clear();

    println!(
        "{}",
        ui::success(&format!(
            "Finished processing {} studies into {}.",
            report.processed.len(),
            paths.studies_dir().display()
        ))
    );
    println!("{} studies were already processed.", report.already_processed.len());
    println!(
        "{}",
        ui::failure(&format!(
            "{} studies were skipped due to errors during Parquet creation.",
            report.skipped_errors.len()
        ))
    );
    for (study_id, error) in &report.skipped_errors {
        println!("  {}: {}", study_id, error);
    }
    println!(
        "{}",
        ui::warning(&format!(
            "{} studies were skipped due to missing required files.",
            report.skipped_missing.len()
        ))
    );
    for (study_id, files) in &report.skipped_missing {
        println!("  {}: {}", study_id, files.join(", "));
    }

    Ok(())
}
