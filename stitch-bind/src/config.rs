//! Binding configuration.
//!
//! Defaults mirror the storefront layout (`public/products.csv`,
//! `public/assets/...`, `public/products.json`). An optional `stitch.toml`
//! at the project root can set the remote asset base URL and the model
//! size ceiling; CLI flags override both.

use std::path::{Path, PathBuf};

/// All paths and policy settings for one binding run.
#[derive(Debug, Clone)]
pub struct BindConfig {
    /// Price list CSV. Optional input: absence means discovery-only mode.
    pub csv_path: PathBuf,
    /// Directory of `.glb` model files.
    pub models_dir: PathBuf,
    /// Directory of product images.
    pub images_dir: PathBuf,
    /// Output catalogue JSON.
    pub output_path: PathBuf,
    /// When set, model references are absolute URLs against this host
    /// instead of local `/assets/models/...` paths.
    pub base_url: Option<String>,
    /// Models larger than this are excluded from delivery.
    pub max_model_mb: u64,
}

impl BindConfig {
    /// Default configuration rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        Self {
            csv_path: root.join("public").join("products.csv"),
            models_dir: root.join("public").join("assets").join("models"),
            images_dir: root.join("public").join("assets").join("images"),
            output_path: root.join("public").join("products.json"),
            base_url: None,
            max_model_mb: 10,
        }
    }

    /// Defaults plus any overrides from `<root>/stitch.toml`:
    ///
    /// ```toml
    /// [assets]
    /// base_url = "https://cdn.example.com"
    /// max_model_mb = 10
    /// ```
    pub fn load(root: &Path) -> Self {
        let mut config = Self::for_root(root);

        let Ok(contents) = std::fs::read_to_string(root.join("stitch.toml")) else {
            return config;
        };
        let doc: toml::Value = match contents.parse() {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Ignoring malformed stitch.toml: {e}");
                return config;
            }
        };

        if let Some(url) = doc
            .get("assets")
            .and_then(|a| a.get("base_url"))
            .and_then(|v| v.as_str())
        {
            if !url.is_empty() {
                config.base_url = Some(url.trim_end_matches('/').to_string());
            }
        }
        if let Some(mb) = doc
            .get("assets")
            .and_then(|a| a.get("max_model_mb"))
            .and_then(|v| v.as_integer())
        {
            if mb > 0 {
                config.max_model_mb = mb as u64;
            }
        }

        config
    }

    /// The size ceiling in bytes.
    pub fn max_model_bytes(&self) -> u64 {
        self.max_model_mb * 1024 * 1024
    }
}
