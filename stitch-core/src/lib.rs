//! Core helpers for the stitch catalogue binder.
//!
//! Pure string transforms shared by the binding pipeline and the CLI:
//! filename sanitization, comparison keys for fuzzy matching, and
//! name/category/SKU inference for models with no price-list entry.

pub mod infer;
pub mod sanitize;

pub use infer::{canonical_category, infer_category, infer_name, infer_sku};
pub use sanitize::{comparison_key, sanitize_file_name};
