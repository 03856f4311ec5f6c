use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::config::StorePaths;
use crate::normalize::normalize_table;
use crate::schema::{
    TableCategory, CBIOHUB_FORMAT_VERSION, KEY_CATEGORY, KEY_CREATED_AT, KEY_FORMAT_VERSION,
    KEY_STUDIES,
};
use crate::store::{write_table_atomic, ReaderConfig, StoreLock, StoreWriterConfig};
use crate::study::{discover_studies, ProcessedStudy, StudyTable};

use super::promote::{concat_tables, ensure_study_id};
use super::report::{CategoryOutcome, CategorySummary, CombineReport, StudyIssue, StudyIssueKind};
use super::CombineError;

/// Rebuilds the combined store from every processed study.
///
/// ```rust,no_run
/// use cbiohub::combine::Combiner;
/// use cbiohub::config::StorePaths;
///
/// let report = Combiner::new(&StorePaths::new("~/cbiohub")).run()?;
/// println!("{}", report);
/// # Ok::<(), cbiohub::combine::CombineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Combiner {
    paths: StorePaths,
    output_dir: Option<PathBuf>,
    reader_config: ReaderConfig,
    writer_config: StoreWriterConfig,
}

impl Combiner {
    /// Combiner reading studies under `paths` and writing to its combined directory
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            paths: paths.clone(),
            output_dir: None,
            reader_config: ReaderConfig::default(),
            writer_config: StoreWriterConfig::default(),
        }
    }

    /// Write combined tables to `dir` instead of the canonical combined directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the Parquet writer configuration
    pub fn with_writer_config(mut self, config: StoreWriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Set the per-study reader configuration
    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader_config = config;
        self
    }

    /// Directory the combined tables are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.paths.combined_dir())
    }

    /// Run a full combine.
    ///
    /// Studies and categories are independent: a study whose manifest cannot be read
    /// and a category that fails to combine are recorded in the report while the rest
    /// still run. Only failing to take the lock or to list the studies aborts the run.
    pub fn run(&self) -> Result<CombineReport, CombineError> {
        let output_dir = self.output_dir();
        let _lock = StoreLock::acquire(&output_dir)?;
        let mut report = CombineReport::new(output_dir.clone());

        let studies = discover_studies(self.paths.studies_dir())?;
        report.studies_found = studies.len();
        info!(
            "Combining {} studies from {}",
            studies.len(),
            self.paths.studies_dir().display()
        );

        let mut processed = Vec::with_capacity(studies.len());
        for study in studies {
            let study = match study {
                Ok(study) => study,
                Err(e) => {
                    let study_id = e.study_id().unwrap_or("<unknown>").to_string();
                    warn!("Skipping {}: {}", study_id, e);
                    report.study_issues.push(StudyIssue {
                        study_id,
                        category: None,
                        kind: StudyIssueKind::Unreadable(e),
                    });
                    continue;
                }
            };
            if study.is_processed() {
                processed.push(study);
            } else {
                warn!("Skipping {}: not successfully processed", study.study_id());
                report.study_issues.push(StudyIssue {
                    study_id: study.study_id().to_string(),
                    category: None,
                    kind: StudyIssueKind::NotProcessed,
                });
            }
        }

        for category in TableCategory::ALL {
            let tables = self.collect_category(&processed, category, &mut report);
            let outcome = if tables.is_empty() {
                info!("No {} tables to combine, leaving previous table in place", category);
                CategoryOutcome::Skipped
            } else {
                match self.combine_category(category, tables) {
                    Ok(summary) => CategoryOutcome::Written(summary),
                    Err(e) => {
                        error!("Failed to combine {}: {}", category, e);
                        CategoryOutcome::Failed(e)
                    }
                }
            };
            report.categories.push((category, outcome));
        }

        Ok(report)
    }

    /// Load and normalize one category's table from every study that has a usable one.
    fn collect_category(
        &self,
        studies: &[ProcessedStudy],
        category: TableCategory,
        report: &mut CombineReport,
    ) -> Vec<StudyTable> {
        let mut tables = Vec::new();
        for study in studies {
            let issue = |kind| StudyIssue {
                study_id: study.study_id().to_string(),
                category: Some(category),
                kind,
            };

            let table = match study.load_table(category, &self.reader_config) {
                Ok(Some(table)) => table,
                Ok(None) => {
                    debug!("{} has no {} table", study.study_id(), category);
                    report.study_issues.push(issue(StudyIssueKind::MissingInput));
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {} {} table: {}", study.study_id(), category, e);
                    report.study_issues.push(issue(StudyIssueKind::Unreadable(e)));
                    continue;
                }
            };

            match normalize_table(table) {
                Ok(table) => tables.push(table),
                Err(e) => {
                    warn!("Skipping {} {} table: {}", study.study_id(), category, e);
                    report.study_issues.push(issue(StudyIssueKind::SchemaCast(e)));
                }
            }
        }
        tables
    }

    fn combine_category(
        &self,
        category: TableCategory,
        tables: Vec<StudyTable>,
    ) -> Result<CategorySummary, CombineError> {
        let start = Instant::now();
        let tables = if category == TableCategory::Mutations {
            tables
                .into_iter()
                .map(ensure_study_id)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            tables
        };
        let combined = concat_tables(category, tables)?;
        let concat_time = start.elapsed();
        info!(
            "Concatenated {} {} rows from {} studies in {:.3?}",
            combined.num_rows(),
            category,
            combined.studies().len(),
            concat_time
        );

        let mut metadata = HashMap::new();
        metadata.insert(
            KEY_FORMAT_VERSION.to_string(),
            CBIOHUB_FORMAT_VERSION.to_string(),
        );
        metadata.insert(KEY_CATEGORY.to_string(), category.to_string());
        metadata.insert(
            KEY_STUDIES.to_string(),
            serde_json::to_string(combined.studies())?,
        );
        metadata.insert(
            KEY_CREATED_AT.to_string(),
            chrono::Utc::now().to_rfc3339(),
        );

        let path = StorePaths::combined_file_in(&self.output_dir(), category);
        let start = Instant::now();
        let stats = write_table_atomic(
            &path,
            combined.schema(),
            combined.batches(),
            &self.writer_config,
            &metadata,
        )?;
        let write_time = start.elapsed();
        info!("{} to {} in {:.3?}", stats, path.display(), write_time);

        Ok(CategorySummary {
            path,
            studies: combined.studies().to_vec(),
            columns: combined.schema().fields().len(),
            concat_time,
            write_time,
            stats,
        })
    }
}
