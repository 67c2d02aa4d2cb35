//! Export command implementation

use super::{load_book, spinner};
use anyhow::{bail, Context, Result};
use folio_core::export::{
    deliver, exporter_for_format, render, ExportContext, Exporter, FontAsset, PdfExporter,
    FORMATS,
};
use folio_core::storage::LocalStorage;
use folio_core::EditorConfig;
use rayon::prelude::*;
use std::path::Path;

/// Export a book file to one format, or to every format with `all`
pub async fn export(path: &Path, format: &str, output_dir: &Path) -> Result<()> {
    let formats: Vec<&str> = if format.eq_ignore_ascii_case("all") {
        FORMATS.to_vec()
    } else {
        vec![format]
    };

    let config = EditorConfig::from_env();
    let font = match &config.devanagari_font {
        Some(font_path) => Some(
            FontAsset::from_file(font_path)
                .await
                .with_context(|| format!("Failed to load font {}", font_path.display()))?,
        ),
        None => None,
    };

    let exporters = formats
        .iter()
        .map(|format| {
            exporter(format, font.as_ref())
                .with_context(|| format!("No exporter available for {} format", format))
        })
        .collect::<Result<Vec<_>>>()?;

    let pb = spinner();
    pb.set_message("Reading book...");
    let book = load_book(path).await?;

    pb.set_message(format!("Exporting '{}'...", book.title));
    let ctx = ExportContext::now();
    let results: Vec<_> = exporters
        .par_iter()
        .map(|exporter| (exporter.format_name().to_string(), render(exporter.as_ref(), &book, &ctx)))
        .collect();
    pb.finish_and_clear();

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let storage = LocalStorage::new(output_dir);

    let mut failures = 0;
    for (name, result) in results {
        match result {
            Ok(artifact) => {
                deliver(&artifact, &storage)
                    .await
                    .with_context(|| format!("Failed to write {}", artifact.file_name))?;
                println!(
                    "{} successfully exported! -> {}",
                    name,
                    output_dir.join(&artifact.file_name).display()
                );
                for companion in &artifact.companions {
                    println!("  with {}", output_dir.join(&companion.path).display());
                }
            }
            Err(e) => {
                failures += 1;
                tracing::error!("{} export failed: {}", name, e);
                println!("{} export failed", name);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} exports failed", failures, exporters.len());
    }
    Ok(())
}

fn exporter(format: &str, font: Option<&FontAsset>) -> Option<Box<dyn Exporter>> {
    match (format.to_lowercase().as_str(), font) {
        ("pdf", Some(font)) => Some(Box::new(
            PdfExporter::new().with_devanagari_font(font.clone()),
        )),
        _ => exporter_for_format(format),
    }
}
