//! Catalogue binding for the stitch storefront.
//!
//! One offline pass reconciles three unreliable local sources — a CSV
//! price list, a directory of `.glb` models, and a directory of product
//! images — into the single `products.json` the storefront reads. Every
//! model and every retained price row ends up in exactly one catalogue
//! entry; "no match" is a valid terminal state, never an error.

pub mod bind;
pub mod config;
pub mod curate;
pub mod entry;
pub mod error;
pub mod matcher;
pub mod output;
pub mod source;

pub use bind::{BindOutcome, BindRun, BindSummary, build_catalogue, run};
pub use config::BindConfig;
pub use entry::{CatalogueEntry, SkuRegistry};
pub use error::BindError;
pub use output::{CatalogueSink, JsonFileSink, MemorySink};
pub use source::{ModelFile, PriceList, PriceRow};
