//! stitch CLI
//!
//! Command-line interface for binding the storefront catalogue and for
//! staging heavyweight models around deploys.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use stitch_bind::bind::{self, BindRun, BindSummary};
use stitch_bind::output::JsonFileSink;
use stitch_bind::{BindConfig, curate};

#[derive(Parser)]
#[command(name = "stitch")]
#[command(about = "Bind the product catalogue from CSV, models and images", long_about = None)]
struct Cli {
    /// Project root containing public/ (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the price list and asset directories into products.json
    Bind {
        /// Price list CSV (default: <root>/public/products.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Models directory (default: <root>/public/assets/models)
        #[arg(long)]
        models: Option<PathBuf>,

        /// Images directory (default: <root>/public/assets/images)
        #[arg(long)]
        images: Option<PathBuf>,

        /// Output catalogue path (default: <root>/public/products.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Serve models from this base URL instead of local paths
        #[arg(long)]
        base_url: Option<String>,

        /// Exclude models larger than this many megabytes
        #[arg(long)]
        max_model_mb: Option<u64>,

        /// Compute the catalogue without writing products.json
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Move models at or over the size ceiling out of the deploy tree
    Stage {
        /// Staging directory (default: <root>/models-staging)
        #[arg(long)]
        staging_dir: Option<PathBuf>,

        /// Size ceiling in megabytes
        #[arg(long)]
        max_model_mb: Option<u64>,
    },

    /// Move staged models back into the models directory
    Merge {
        /// Staging directory (default: <root>/models-staging)
        #[arg(long)]
        staging_dir: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let root = cli
        .root
        .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current directory"));

    match cli.command {
        Commands::Bind {
            csv,
            models,
            images,
            output,
            base_url,
            max_model_mb,
            dry_run,
        } => {
            let mut config = BindConfig::load(&root);
            if let Some(path) = csv {
                config.csv_path = path;
            }
            if let Some(path) = models {
                config.models_dir = path;
            }
            if let Some(path) = images {
                config.images_dir = path;
            }
            if let Some(path) = output {
                config.output_path = path;
            }
            if let Some(url) = base_url {
                config.base_url = Some(url.trim_end_matches('/').to_string());
            }
            if let Some(mb) = max_model_mb {
                config.max_model_mb = mb;
            }
            run_bind(&config, dry_run);
        }
        Commands::Stage {
            staging_dir,
            max_model_mb,
        } => {
            let mut config = BindConfig::load(&root);
            if let Some(mb) = max_model_mb {
                config.max_model_mb = mb;
            }
            let staging = staging_dir.unwrap_or_else(|| root.join("models-staging"));
            run_stage(&config, &staging);
        }
        Commands::Merge { staging_dir } => {
            let config = BindConfig::load(&root);
            let staging = staging_dir.unwrap_or_else(|| root.join("models-staging"));
            run_merge(&config, &staging);
        }
    }
}

/// Run the bind command.
fn run_bind(config: &BindConfig, dry_run: bool) {
    println!(
        "Binding catalogue in: {}",
        config
            .output_path
            .parent()
            .unwrap_or(Path::new("."))
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        println!(
            "{}",
            "Dry run: products.json will not be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if let Some(ref base) = config.base_url {
        println!(
            "{}",
            format!("Models served from {base}").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!();

    let outcome = if dry_run {
        if bind::preserves_committed_catalogue(config) {
            print_skip(config);
            return;
        }
        bind::build_catalogue(config)
    } else {
        let mut sink = JsonFileSink::new(&config.output_path);
        match bind::run(config, &mut sink) {
            Ok(BindRun::SkippedExistingCatalogue) => {
                print_skip(config);
                return;
            }
            Ok(BindRun::Completed(outcome)) => Ok(outcome),
            Err(e) => Err(e),
        }
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!(
                "{} Error: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            process::exit(1);
        }
    };

    print_summary(&outcome.summary, outcome.entries.len());
    if !dry_run {
        println!(
            "  {} {} written",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            config.output_path.display(),
        );
    }
}

fn print_skip(config: &BindConfig) {
    println!(
        "{}",
        format!(
            "No local models at {} and {} already exists; keeping the committed catalogue.",
            config.models_dir.display(),
            config.output_path.display(),
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
}

fn print_summary(summary: &BindSummary, entries: usize) {
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  {} {} catalogue entries ({} with model, {} with image)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        entries,
        summary.entries_with_model,
        summary.entries_with_image,
    );
    println!(
        "  {} {} models paired with price rows",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.models_paired,
    );
    if summary.models_orphaned > 0 {
        println!(
            "  {} {} orphan models (details inferred from filenames)",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.models_orphaned,
        );
    }
    if summary.rows_unpaired > 0 {
        println!(
            "  {} {} price rows without a model",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.rows_unpaired,
        );
    }
    if summary.oversized_excluded > 0 {
        println!(
            "  {} {} oversized models excluded",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.oversized_excluded,
        );
    }
    if summary.rows_dropped_no_sku > 0 {
        println!(
            "  {} {} price rows dropped (no SKU)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.rows_dropped_no_sku,
        );
    }
}

/// Run the stage command.
fn run_stage(config: &BindConfig, staging: &Path) {
    println!(
        "Staging models {} MB and over into: {}",
        config.max_model_mb,
        staging.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    match curate::stage_heavy_models(&config.models_dir, staging, config.max_model_bytes()) {
        Ok(summary) => {
            println!(
                "  {} {} staged, {} kept",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                summary.moved,
                summary.kept,
            );
        }
        Err(e) => {
            eprintln!(
                "{} Error: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            process::exit(1);
        }
    }
}

/// Run the merge command.
fn run_merge(config: &BindConfig, staging: &Path) {
    match curate::merge_staged_models(staging, &config.models_dir) {
        Ok(moved) => {
            println!(
                "  {} {} models merged back into {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                moved,
                config.models_dir.display(),
            );
        }
        Err(e) => {
            eprintln!(
                "{} Error: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            process::exit(1);
        }
    }
}
