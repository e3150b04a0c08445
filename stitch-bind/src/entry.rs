//! The unified catalogue record and SKU disambiguation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::source::PriceRow;

/// Placeholder price for entries synthesized from an orphan model.
pub const ASK_FOR_PRICE: &str = "Ask for Price";

/// One record of the output catalogue.
///
/// Field names match the storefront's data contract exactly. Invariants:
/// `has_model == model_path.is_some()`, `has_image == image_path.is_some()`,
/// and SKUs are unique across the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "WAS")]
    pub was: Option<String>,
    #[serde(rename = "NOW")]
    pub now: Option<String>,
    #[serde(rename = "SAVE")]
    pub save: Option<String>,
    #[serde(rename = "modelPath")]
    pub model_path: Option<String>,
    #[serde(rename = "imagePath")]
    pub image_path: Option<String>,
    #[serde(rename = "hasModel")]
    pub has_model: bool,
    #[serde(rename = "hasImage")]
    pub has_image: bool,
    /// Extra price-list columns, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CatalogueEntry {
    /// Entry backed by a price-list row. `sku` is the disambiguated SKU.
    pub fn from_row(
        row: &PriceRow,
        sku: String,
        model_path: Option<String>,
        image_path: Option<String>,
    ) -> Self {
        Self {
            category: row.category.clone(),
            sku,
            name: row.name.clone(),
            was: row.was.clone(),
            now: row.now.clone(),
            save: row.save.clone(),
            has_model: model_path.is_some(),
            has_image: image_path.is_some(),
            model_path,
            image_path,
            extra: row.extra.clone(),
        }
    }

    /// Entry synthesized from a model filename alone.
    pub fn inferred(
        category: &str,
        sku: String,
        name: String,
        model_path: Option<String>,
        image_path: Option<String>,
    ) -> Self {
        Self {
            category: category.to_string(),
            sku,
            name,
            was: None,
            now: Some(ASK_FOR_PRICE.to_string()),
            save: None,
            has_model: model_path.is_some(),
            has_image: image_path.is_some(),
            model_path,
            image_path,
            extra: BTreeMap::new(),
        }
    }
}

/// Guarantees catalogue-wide SKU uniqueness across all emission paths.
///
/// The first occurrence of a base SKU is emitted unchanged; the n-th
/// occurrence gets an `_<n>` suffix (n starts at 2), in emission order.
#[derive(Debug, Default)]
pub struct SkuRegistry {
    counts: HashMap<String, u32>,
}

impl SkuRegistry {
    /// Claim the next unique SKU for `base`.
    pub fn claim(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{base}_{count}")
        }
    }
}
