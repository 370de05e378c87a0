use crate::models::PropertyRecord;
use crate::scrapers::BrowserPage;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: [&str; 8] = [
    "building",
    "modality",
    "neighborhood",
    "city",
    "price (COP)",
    "area (m²)",
    "rooms",
    "bathrooms",
];

/// Pipe-delimited so free text with commas needs no escaping
pub fn to_csv(records: &[PropertyRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        let row: [String; 8] = [
            record.building_type.to_string(),
            record.modality.to_string(),
            record.neighborhood.clone().unwrap_or_default(),
            record.city.clone(),
            record.price_cop.to_string(),
            record.area_sq_meters.clone(),
            record.rooms.to_string(),
            record.bathrooms.to_string(),
        ];
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush CSV buffer")
}

fn run_file(dir: &Path, started: DateTime<Utc>, extension: &str) -> PathBuf {
    dir.join(format!("m2-{}.{}", started.timestamp(), extension))
}

pub async fn write_csv(dir: &Path, records: &[PropertyRecord], started: DateTime<Utc>) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = run_file(dir, started, "csv");
    tokio::fs::write(&path, to_csv(records)?)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(path)
}

pub async fn write_json(dir: &Path, records: &[PropertyRecord], started: DateTime<Utc>) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = run_file(dir, started, "json");
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(path)
}

/// Dump the page HTML and a screenshot for looking into a failed run
pub fn write_debug_snapshot<P: BrowserPage>(page: &P, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");

    let html_path = dir.join(format!("m2-{stamp}.html"));
    let html = page.content()?;
    std::fs::write(&html_path, &html)?;
    info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

    let png_path = dir.join(format!("m2-{stamp}.png"));
    std::fs::write(&png_path, page.screenshot()?)?;
    info!("Saved screenshot to {}", png_path.display());

    Ok(vec![html_path, png_path])
}
