use anyhow::{Context, Result};
use std::path::PathBuf;

use cbiohub::config::StorePaths;
use cbiohub::query::{
    find_variant, resolve_coordinates, variant_frequency, CoordinateKey, GeneKey, VariantArgs,
    VariantKey,
};
use cbiohub::store::CombinedStore;

use super::ui;

/// Positional `find` arguments: three or more select coordinate mode, fewer gene mode.
fn variant_args(args: Vec<String>) -> VariantArgs {
    let coordinate_mode = args.len() >= 3;
    let mut values = args.into_iter();
    let mut next = || values.next();
    if coordinate_mode {
        VariantArgs {
            chromosome: next(),
            start: next(),
            end: next(),
            reference: next(),
            alternate: next(),
            ..Default::default()
        }
    } else {
        VariantArgs {
            gene: next(),
            protein_change: next(),
            ..Default::default()
        }
    }
}

/// Find the samples carrying a variant
pub fn find(args: Vec<String>, paths: &StorePaths, processed_dir: Option<PathBuf>) -> Result<()> {
    let key = VariantKey::try_from(variant_args(args))?;
    let store = CombinedStore::open_with_override(paths, processed_dir.as_deref());
    let result =
        find_variant(&store, &key).with_context(|| format!("Failed to look up {}", key))?;

    if result.found {
        println!(
            "{}",
            ui::success(&format!(
                "Variant found in {} samples across {} studies:",
                result.sample_ids.len(),
                result.studies().len()
            ))
        );
        for id in &result.sample_ids {
            println!("{}", id);
        }
    } else {
        println!("{}", ui::failure("Variant not found."));
    }
    Ok(())
}

/// Count a variant per clinical attribute value
pub fn frequency(
    key: CoordinateKey,
    attribute: &str,
    paths: &StorePaths,
    processed_dir: Option<PathBuf>,
) -> Result<()> {
    let store = CombinedStore::open_with_override(paths, processed_dir.as_deref());
    let rows = variant_frequency(&store, &key, attribute)
        .with_context(|| format!("Failed to count {} per {}", key, attribute))?;

    if rows.is_empty() {
        println!("{}", ui::failure("No data found."));
        return Ok(());
    }

    println!(
        "{}",
        ui::success(&format!("Variant frequency per {}:", attribute))
    );
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.value.clone().unwrap_or_else(|| "<none>".to_string()),
                r.count.to_string(),
            ]
        })
        .collect();
    println!("{}", ui::table(&[attribute, "Count"], &table));
    Ok(())
}

/// Resolve a gene-level variant to genomic coordinates
pub fn convert(key: GeneKey, paths: &StorePaths, processed_dir: Option<PathBuf>) -> Result<()> {
    let store = CombinedStore::open_with_override(paths, processed_dir.as_deref());
    let rows = resolve_coordinates(&store, &key)
        .with_context(|| format!("Failed to resolve {}", key))?;

    if rows.is_empty() {
        println!("{}", ui::failure("No data found."));
        return Ok(());
    }

    println!(
        "{}",
        ui::success(&format!("Genomic coordinates for {}:", key))
    );
    let table: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.chromosome,
                r.start,
                r.end,
                r.reference,
                r.alternate,
                r.count.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        ui::table(
            &["Chromosome", "Start", "End", "Ref", "Alt", "Frequency"],
            &table
        )
    );
    Ok(())
}
