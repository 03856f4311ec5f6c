//! Terminal output helpers.
//!
//! Colors and symbols are only emitted with the `colorized_output` feature.

use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "colorized_output")]
use console::{style, Emoji};

#[cfg(feature = "colorized_output")]
static OK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
#[cfg(feature = "colorized_output")]
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");
#[cfg(feature = "colorized_output")]
static FAIL: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");

/// A line reporting success
pub fn success(message: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        format!("{}{}", OK, style(message).green())
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        format!("[OK] {}", message)
    }
}

/// A line reporting something skipped
pub fn warning(message: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        format!("{}{}", WARN, style(message).yellow())
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        format!("[WARN] {}", message)
    }
}

/// A line reporting a failure
pub fn failure(message: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        format!("{}{}", FAIL, style(message).red())
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        format!("[FAIL] {}", message)
    }
}

/// A section heading
pub fn heading(message: &str) -> String {
    #[cfg(feature = "colorized_output")]
    {
        style(message).bold().to_string()
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        message.to_string()
    }
}

/// Progress bar over `total` studies
pub fn study_progress(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Render rows as a borderless table with a bold header
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}
