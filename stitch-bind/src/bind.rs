//! The pairing orchestrator: drives the discovery-first reconciliation
//! and produces the final catalogue.
//!
//! Three steps, in order: pair discovered models with price rows, emit
//! synthetic entries for orphan models, emit model-less entries for
//! unpaired rows. Claims are explicit accumulator sets folded here, so
//! the matcher stays pure and auditable.

use std::collections::HashSet;

use stitch_core::{infer_category, infer_name, infer_sku};

use crate::config::BindConfig;
use crate::entry::{CatalogueEntry, SkuRegistry};
use crate::error::BindError;
use crate::matcher;
use crate::output::CatalogueSink;
use crate::source;

/// The outcome of one binding run.
#[derive(Debug)]
pub enum BindRun {
    /// The models directory is absent but a committed catalogue exists —
    /// a cloud/CI build. Nothing was read or written.
    SkippedExistingCatalogue,
    /// Full reconciliation ran.
    Completed(BindOutcome),
}

/// The computed catalogue plus run counters.
#[derive(Debug)]
pub struct BindOutcome {
    pub entries: Vec<CatalogueEntry>,
    pub summary: BindSummary,
}

/// Counters for the human-readable run report.
#[derive(Debug, Default, Clone)]
pub struct BindSummary {
    pub rows_loaded: usize,
    pub rows_dropped_no_sku: usize,
    pub rows_unpaired: usize,
    pub models_discovered: usize,
    pub models_paired: usize,
    pub models_orphaned: usize,
    pub oversized_excluded: usize,
    pub entries_with_model: usize,
    pub entries_with_image: usize,
}

/// True when this run should preserve the committed catalogue instead of
/// regenerating one: no local models, but an output file already exists.
/// Checked before any other I/O.
pub fn preserves_committed_catalogue(config: &BindConfig) -> bool {
    !config.models_dir.exists() && config.output_path.exists()
}

/// Run the full binding pass and write the catalogue through `sink`.
pub fn run(config: &BindConfig, sink: &mut dyn CatalogueSink) -> Result<BindRun, BindError> {
    if preserves_committed_catalogue(config) {
        return Ok(BindRun::SkippedExistingCatalogue);
    }

    let outcome = build_catalogue(config)?;
    sink.write(&outcome.entries)?;
    Ok(BindRun::Completed(outcome))
}

/// Compute the catalogue without writing it anywhere.
///
/// Still performs the filename-sanitization renames in the models
/// directory; that pre-processing step is part of discovery.
pub fn build_catalogue(config: &BindConfig) -> Result<BindOutcome, BindError> {
    let price_list = source::load_price_list(&config.csv_path)?;
    let models = source::sanitize_models(&config.models_dir)?;
    let images = source::scan_images(&config.images_dir);

    let max_bytes = config.max_model_bytes();
    let mut summary = BindSummary {
        rows_loaded: price_list.rows.len(),
        rows_dropped_no_sku: price_list.dropped_no_sku,
        models_discovered: models.len(),
        ..Default::default()
    };

    let mut entries = Vec::new();
    let mut skus = SkuRegistry::default();
    let mut claimed_rows: HashSet<usize> = HashSet::new();
    let mut claimed_models: HashSet<usize> = HashSet::new();

    // Step 1: pair models with price rows.
    for (mi, model) in models.iter().enumerate() {
        let Some(m) = matcher::find_row_match(&model.file_name, &price_list.rows, &claimed_rows)
        else {
            continue;
        };
        let row = &price_list.rows[m.row_index];

        if model.size > max_bytes {
            // The row's metadata is preserved, the asset is not delivered.
            // Note the model itself is NOT claimed here: step 2 will also
            // emit an inferred entry for it, matching long-standing
            // behavior the storefront depends on.
            log::warn!(
                "Excluding oversized model {} ({})",
                model.file_name,
                format_mb(model.size)
            );
            entries.push(CatalogueEntry::from_row(
                row,
                skus.claim(&row.sku),
                None,
                None,
            ));
            claimed_rows.insert(m.row_index);
            summary.oversized_excluded += 1;
            continue;
        }

        let image = matcher::find_image_match(&row.sku, &row.name, &images);
        entries.push(CatalogueEntry::from_row(
            row,
            skus.claim(&row.sku),
            Some(model_reference(config, &model.file_name)),
            image.map(image_reference),
        ));
        claimed_rows.insert(m.row_index);
        claimed_models.insert(mi);
        summary.models_paired += 1;
    }

    // Step 2: synthesize entries for orphan models.
    for (mi, model) in models.iter().enumerate() {
        if claimed_models.contains(&mi) {
            continue;
        }
        let sku = infer_sku(&model.file_name);
        let name = infer_name(&model.file_name);
        let category = infer_category(&model.file_name);

        if model.size > max_bytes {
            log::warn!(
                "Excluding oversized orphan model {} ({})",
                model.file_name,
                format_mb(model.size)
            );
            entries.push(CatalogueEntry::inferred(
                category,
                skus.claim(&sku),
                name,
                None,
                None,
            ));
            summary.oversized_excluded += 1;
            continue;
        }

        let image = matcher::find_image_match(&sku, &name, &images);
        entries.push(CatalogueEntry::inferred(
            category,
            skus.claim(&sku),
            name,
            Some(model_reference(config, &model.file_name)),
            image.map(image_reference),
        ));
        summary.models_orphaned += 1;
    }

    // Step 3: model-less entries for unpaired rows.
    for (i, row) in price_list.rows.iter().enumerate() {
        if claimed_rows.contains(&i) {
            continue;
        }
        let image = matcher::find_image_match(&row.sku, &row.name, &images);
        entries.push(CatalogueEntry::from_row(
            row,
            skus.claim(&row.sku),
            None,
            image.map(image_reference),
        ));
        summary.rows_unpaired += 1;
    }

    summary.entries_with_model = entries.iter().filter(|e| e.has_model).count();
    summary.entries_with_image = entries.iter().filter(|e| e.has_image).count();

    Ok(BindOutcome { entries, summary })
}

/// Model reference: absolute URL against the configured asset host, or a
/// local storefront path.
fn model_reference(config: &BindConfig, file_name: &str) -> String {
    match &config.base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), file_name),
        None => format!("/assets/models/{file_name}"),
    }
}

fn image_reference(file_name: &str) -> String {
    format!("/assets/images/{file_name}")
}

fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
