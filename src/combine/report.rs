use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::normalize::NormalizeError;
use crate::schema::TableCategory;
use crate::store::WriteStats;
use crate::study::StudyError;

use super::CombineError;

/// Summary of one combined table that was written
#[derive(Debug, Clone)]
pub struct CategorySummary {
    /// Destination file
    pub path: PathBuf,
    /// Contributing study ids in input order
    pub studies: Vec<String>,
    /// Number of columns of the promoted schema
    pub columns: usize,
    /// Time spent promoting and concatenating
    pub concat_time: Duration,
    /// Time spent writing the file
    pub write_time: Duration,
    /// Writer statistics
    pub stats: WriteStats,
}

/// What happened to one category during a combine run
#[derive(Debug)]
pub enum CategoryOutcome {
    /// The combined table was replaced
    Written(CategorySummary),
    /// No study contributed a table; any previous file was left in place
    Skipped,
    /// The category failed; any previous file was left in place
    Failed(CombineError),
}

/// Why one study was left out of (part of) a combine run
#[derive(Debug)]
pub enum StudyIssueKind {
    /// The study directory has no manifest
    NotProcessed,
    /// The study has no table for the category
    MissingInput,
    /// The per-study table could not be read
    Unreadable(StudyError),
    /// The per-study table could not be normalized
    SchemaCast(NormalizeError),
}

/// A study skipped for one category (or, for [`StudyIssueKind::NotProcessed`], entirely)
#[derive(Debug)]
pub struct StudyIssue {
    /// Study identifier
    pub study_id: String,
    /// Affected category, `None` when the whole study was skipped
    pub category: Option<TableCategory>,
    /// Reason
    pub kind: StudyIssueKind,
}

impl fmt::Display for StudyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.category {
            Some(category) => format!("{} [{}]", self.study_id, category),
            None => self.study_id.clone(),
        };
        match &self.kind {
            StudyIssueKind::NotProcessed => write!(f, "{}: not processed", scope),
            StudyIssueKind::MissingInput => write!(f, "{}: no table", scope),
            StudyIssueKind::Unreadable(e) => write!(f, "{}: unreadable ({})", scope, e),
            StudyIssueKind::SchemaCast(e) => write!(f, "{}: {}", scope, e),
        }
    }
}

/// Result of a combine run
#[derive(Debug)]
pub struct CombineReport {
    /// Directory the combined tables were written to
    pub output_dir: PathBuf,
    /// Number of study directories found
    pub studies_found: usize,
    /// Per-category outcomes in combine order
    pub categories: Vec<(TableCategory, CategoryOutcome)>,
    /// Studies left out of a category or of the whole run
    pub study_issues: Vec<StudyIssue>,
}

impl CombineReport {
    pub(crate) fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            studies_found: 0,
            categories: Vec::new(),
            study_issues: Vec::new(),
        }
    }

    /// Outcome of a category, if it was attempted
    pub fn outcome(&self, category: TableCategory) -> Option<&CategoryOutcome> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, outcome)| outcome)
    }

    /// Number of categories written
    pub fn written_count(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::Written(_)))
    }

    /// Number of categories skipped for lack of input
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::Skipped))
    }

    /// Number of failed categories
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, CategoryOutcome::Failed(_)))
    }

    /// Check if any category failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    fn count(&self, pred: impl Fn(&CategoryOutcome) -> bool) -> usize {
        self.categories.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for CombineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Combine Report: {}", self.output_dir.display())?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Studies found: {}", self.studies_found)?;

        for (category, outcome) in &self.categories {
            match outcome {
                CategoryOutcome::Written(summary) => writeln!(
                    f,
                    "[OK]   {:<17} {} rows, {} columns from {} studies (concat {:.3?}, write {:.3?})",
                    category.to_string(),
                    summary.stats.rows_written,
                    summary.columns,
                    summary.studies.len(),
                    summary.concat_time,
                    summary.write_time
                )?,
                CategoryOutcome::Skipped => {
                    writeln!(f, "[SKIP] {:<17} no input tables", category.to_string())?
                }
                CategoryOutcome::Failed(e) => {
                    writeln!(f, "[FAIL] {:<17} {}", category.to_string(), e)?
                }
            }
        }

        if !self.study_issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Study issues:")?;
            for issue in &self.study_issues {
                writeln!(f, "  - {}", issue)?;
            }
        }

        writeln!(f, "{}", "=".repeat(60))?;
        write!(
            f,
            "Summary: {} written, {} skipped, {} failed",
            self.written_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}
