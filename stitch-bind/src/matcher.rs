//! Matching heuristics: which price row a model describes, and which
//! image depicts a product.
//!
//! Everything here is pure — claims are folded by the orchestrator, so a
//! match result can be inspected and tested in isolation.

use std::collections::HashSet;

use stitch_core::comparison_key;

use crate::source::PriceRow;

/// How a model→row match was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// The model's comparison key contains the row's SKU key.
    Sku,
    /// The model's comparison key contains the row's product-name key.
    Name,
}

/// Result of matching a model filename against the price list.
#[derive(Debug, Clone, Copy)]
pub struct RowMatch {
    /// Index into the price list's row Vec.
    pub row_index: usize,
    pub method: MatchMethod,
}

/// SKU keys this short are too ambiguous to match on.
const MIN_SKU_KEY_LEN: usize = 3;

/// Name keys this short produce false positives via substring containment.
const MIN_NAME_KEY_LEN: usize = 9;

/// Names shorter than this aren't used for image candidate selection.
const MIN_IMAGE_NAME_KEY_LEN: usize = 6;

/// Find the price row a model filename describes, if any.
///
/// Two passes over not-yet-claimed rows in source order, first match wins:
/// SKU-key containment first (SKUs are short, high-signal identifiers the
/// maintainers embed in filenames), then product-name containment with a
/// higher length floor. Ties are never scored further.
pub fn find_row_match(
    model_file: &str,
    rows: &[PriceRow],
    claimed: &HashSet<usize>,
) -> Option<RowMatch> {
    let file_key = comparison_key(model_file);

    for (i, row) in rows.iter().enumerate() {
        if claimed.contains(&i) {
            continue;
        }
        let sku_key = comparison_key(&row.sku);
        if sku_key.len() >= MIN_SKU_KEY_LEN && file_key.contains(&sku_key) {
            return Some(RowMatch {
                row_index: i,
                method: MatchMethod::Sku,
            });
        }
    }

    for (i, row) in rows.iter().enumerate() {
        if claimed.contains(&i) {
            continue;
        }
        let name_key = comparison_key(&row.name);
        if name_key.len() >= MIN_NAME_KEY_LEN && file_key.contains(&name_key) {
            return Some(RowMatch {
                row_index: i,
                method: MatchMethod::Name,
            });
        }
    }

    None
}

/// Find the best image for a SKU/name pair.
///
/// Candidates are images whose comparison key contains the SKU key, or the
/// name key when the name is long enough. The shortest filename wins —
/// shorter names are more likely the primary product shot than a variant
/// or composite. Image matching is a lookup, not a claim: the same image
/// may serve multiple entries.
pub fn find_image_match<'a>(sku: &str, name: &str, images: &'a [String]) -> Option<&'a str> {
    let sku_key = comparison_key(sku);
    let name_key = comparison_key(name);

    let mut candidates: Vec<&'a String> = images
        .iter()
        .filter(|file| {
            let file_key = comparison_key(file);
            file_key.contains(&sku_key)
                || (name_key.len() >= MIN_IMAGE_NAME_KEY_LEN && file_key.contains(&name_key))
        })
        .collect();

    candidates.sort_by_key(|file| file.len());
    candidates.first().map(|s| s.as_str())
}
