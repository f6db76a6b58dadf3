//! Offline views of collected feedback: summary tables and Parquet export.

use std::path::Path;

use anyhow::Context;
use arrow::util::pretty::pretty_format_batches;
use breedscope_store::{FeedbackStore, FeedbackSummary};

fn open_existing(db: &Path) -> anyhow::Result<FeedbackStore> {
    anyhow::ensure!(db.exists(), "no feedback database at {db:?}");
    let store = FeedbackStore::open_persistent(db)
        .with_context(|| format!("opening feedback database {}", db.display()))?;
    store.init_schema().context("initialising feedback schema")?;
    Ok(store)
}

/// Print totals, per-breed counts and the latest submissions.
pub fn print_stats(db: &Path, recent: usize) -> anyhow::Result<()> {
    let store = open_existing(db)?;

    let total = store.count()?;
    println!("{total} corrections in {}", db.display());
    if total == 0 {
        return Ok(());
    }

    let counts = store.breed_counts()?;
    println!("{}", pretty_format_batches(&counts)?);

    let rows = store.recent(recent)?;
    if !rows.is_empty() {
        println!("\nMost recent:");
        for row in &rows {
            println!("  {}", format_summary(row));
        }
    }
    Ok(())
}

/// Write all feedback to Parquet and report the row count.
pub fn export(db: &Path, out: &Path) -> anyhow::Result<()> {
    let store = open_existing(db)?;
    let rows = store
        .export_parquet(out)
        .with_context(|| format!("exporting to {}", out.display()))?;
    println!("Exported {rows} corrections to {}", out.display());
    Ok(())
}

fn format_summary(row: &FeedbackSummary) -> String {
    let predicted = if row.original_top_breed.is_empty() {
        "-"
    } else {
        row.original_top_breed.as_str()
    };
    format!(
        "#{:<5} {}  {} (predicted: {}, {} bytes)",
        row.id, row.timestamp, row.correct_breed, predicted, row.image_bytes
    )
}
