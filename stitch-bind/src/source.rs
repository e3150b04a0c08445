//! Source loading: the price-list CSV and the two asset directories.
//!
//! Every input here is optional. A missing CSV puts the run in
//! discovery-only mode; a missing asset directory yields an empty
//! listing. Loaders warn and degrade, they never fail the run.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use stitch_core::{canonical_category, sanitize_file_name};

use crate::error::BindError;

/// Recognized 3D model extensions (case-insensitive).
pub const MODEL_EXTENSIONS: &[&str] = &["glb"];

/// Recognized raster image extensions (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Price-list columns consumed by the binder. Anything else passes
/// through to the catalogue untouched.
const KNOWN_COLUMNS: &[&str] = &["Category", "SKU", "Product Name", "WAS", "NOW", "SAVE"];

/// One sanitized row of the price list.
#[derive(Debug, Clone)]
pub struct PriceRow {
    pub category: String,
    pub sku: String,
    pub name: String,
    pub was: Option<String>,
    pub now: Option<String>,
    pub save: Option<String>,
    /// Unrecognized columns, sorted by header name.
    pub extra: BTreeMap<String, String>,
}

/// The loaded price list plus load-time counters for the run summary.
#[derive(Debug, Default)]
pub struct PriceList {
    pub rows: Vec<PriceRow>,
    /// Rows discarded for having an empty SKU.
    pub dropped_no_sku: usize,
}

/// A discovered model file.
#[derive(Debug, Clone)]
pub struct ModelFile {
    pub file_name: String,
    pub size: u64,
}

/// Load and sanitize the price list.
///
/// Fields are trimmed, the category is canonicalized, and rows without a
/// SKU are dropped (counted, not reported as errors). A missing file is
/// discovery-only mode, not a failure.
pub fn load_price_list(path: &Path) -> Result<PriceList, BindError> {
    if !path.exists() {
        log::warn!(
            "Price list not found at {}; proceeding in discovery-only mode",
            path.display()
        );
        return Ok(PriceList::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let category_col = column("Category");
    let sku_col = column("SKU");
    let name_col = column("Product Name");
    let was_col = column("WAS");
    let now_col = column("NOW");
    let save_col = column("SAVE");

    let mut list = PriceList::default();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed price list row: {e}");
                continue;
            }
        };

        let field = |col: Option<usize>| col.and_then(|i| record.get(i));

        let sku = field(sku_col).unwrap_or("").to_string();
        if sku.is_empty() {
            list.dropped_no_sku += 1;
            continue;
        }

        let mut extra = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            if !KNOWN_COLUMNS.contains(&header) {
                extra.insert(header.to_string(), record.get(i).unwrap_or("").to_string());
            }
        }

        list.rows.push(PriceRow {
            category: canonical_category(field(category_col).unwrap_or("")),
            sku,
            name: field(name_col).unwrap_or("").to_string(),
            was: field(was_col).map(str::to_string),
            now: field(now_col).map(str::to_string),
            save: field(save_col).map(str::to_string),
            extra,
        });
    }

    Ok(list)
}

/// List model files in `dir`, sorted by filename.
pub fn scan_models(dir: &Path) -> Vec<ModelFile> {
    list_files(dir, MODEL_EXTENSIONS)
        .into_iter()
        .map(|(file_name, size)| ModelFile { file_name, size })
        .collect()
}

/// List image filenames in `dir`, sorted.
pub fn scan_images(dir: &Path) -> Vec<String> {
    list_files(dir, IMAGE_EXTENSIONS)
        .into_iter()
        .map(|(file_name, _)| file_name)
        .collect()
}

/// One-way rename pass over the models directory.
///
/// Every model whose sanitized filename differs from its current one is
/// renamed in place, and the returned listing reflects the post-rename
/// state — later stages never re-list the directory.
pub fn sanitize_models(dir: &Path) -> Result<Vec<ModelFile>, BindError> {
    let mut models = scan_models(dir);
    for model in &mut models {
        let sanitized = sanitize_file_name(&model.file_name);
        if sanitized != model.file_name {
            fs::rename(dir.join(&model.file_name), dir.join(&sanitized))?;
            log::info!("Sanitized {} -> {}", model.file_name, sanitized);
            model.file_name = sanitized;
        }
    }
    models.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(models)
}

/// Files in `dir` with an allowed extension, as `(name, size)` sorted by
/// name. A missing or unreadable directory yields an empty list.
fn list_files(dir: &Path, extensions: &[&str]) -> Vec<(String, u64)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            log::warn!("Asset directory not found at {}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<(String, u64)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_file() || !has_matching_extension(&path, extensions) {
                return None;
            }
            let name = path.file_name()?.to_str()?.to_string();
            let size = entry.metadata().ok()?.len();
            Some((name, size))
        })
        .collect();

    files.sort();
    files
}

fn has_matching_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|allowed| e.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}
