//! CLI for `gen-apidocs`.
//!
//! # Subcommands
//!
//! ```text
//! # Render Markdown into reference/build
//! gen-apidocs generate --model api-model.yaml --config-dir reference
//!
//! # HTML without operations, printing the table of contents
//! gen-apidocs generate --model api-model.yaml --config-dir reference \
//!   --format html --no-operations --print-toc
//!
//! # Validate a model
//! gen-apidocs check --model api-model.yaml
//! ```

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use apidocs_core::ApiModel;
use clap::Parser;
use gen_apidocs::{Format, GenerateConfig, ProjectConfig};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// API reference documentation generator.
#[derive(Parser)]
#[command(name = "gen-apidocs", version, about)]
enum Cli {
    /// Render the reference in one format.
    ///
    /// Static sections are read from `<config-dir>/static_includes`,
    /// fragments land in `<config-dir>/includes` (HTML, TeX) or
    /// `<config-dir>/build` (Markdown), and the final document in
    /// `<config-dir>/build`.
    Generate(GenerateArgs),

    /// Load and validate a model, then print a summary of it.
    Check(CheckArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Path to the API model (YAML or JSON).
    #[arg(short, long)]
    model: PathBuf,

    /// Directory holding the static sections and receiving the output.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Path to a project config YAML file.
    ///
    /// Defaults to `<config-dir>/config.yaml` when that file exists.
    /// CLI flags override values from the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Skip HTTP operations (resource reference only).
    #[arg(long)]
    no_operations: bool,

    /// Document title. Overrides `title` from the config file.
    #[arg(long)]
    title: Option<String>,

    /// Print the table of contents after generating.
    #[arg(long)]
    print_toc: bool,

    /// Print the table of contents as JSON (with `--print-toc`).
    #[arg(long, requires = "print_toc")]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the API model (YAML or JSON).
    #[arg(short, long)]
    model: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Generate(args) => {
            init_tracing(args.verbose);
            run_generate(&args)
        }
        Cli::Check(args) => {
            init_tracing(args.verbose);
            run_check(&args)
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` raises the level from
/// `warn`.
fn init_tracing(verbose: u8) {
    let base_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn load_model(path: &Path) -> anyhow::Result<ApiModel> {
    eprintln!("Loading model: {}", path.display());
    ApiModel::load(path).with_context(|| format!("Failed to load model: {}", path.display()))
}

/// Explicit `--config`, else `<config-dir>/config.yaml` if present, else
/// defaults.
fn load_project_config(args: &GenerateArgs) -> anyhow::Result<ProjectConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let default_path = args.config_dir.join("config.yaml");
            if !default_path.exists() {
                return Ok(ProjectConfig::default());
            }
            default_path
        }
    };
    eprintln!("Loading config: {}", path.display());
    ProjectConfig::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let model = load_model(&args.model)?;
    let project = load_project_config(args)?;

    // Project config first, then CLI overrides
    let mut config = GenerateConfig::new(&args.config_dir)
        .with_project_config(&project)
        .format(args.format);
    if args.no_operations {
        config = config.build_operations(false);
    }
    if let Some(title) = &args.title {
        config = config.title(title);
    }

    eprintln!(
        "Generating {} reference ({} definitions, {} categories)...",
        args.format,
        model.definitions.len(),
        model.resource_categories.len(),
    );
    let report = gen_apidocs::generate_files(&model, &config).with_context(|| {
        format!(
            "Failed to generate {} reference in {}",
            args.format,
            args.config_dir.display()
        )
    })?;

    for name in &report.skipped {
        eprintln!("Warning: missing definition for item in TOC {name}");
    }
    for file in &report.missing {
        eprintln!("Warning: fragment not found: {file}");
    }
    eprintln!(
        "Wrote {} resources, {} definitions, {} old versions to {}",
        report.resources,
        report.definitions,
        report.old_versions,
        config.build_dir().display(),
    );

    if args.print_toc {
        if args.json {
            let json =
                serde_json::to_string_pretty(&report.toc).context("Failed to serialize TOC")?;
            println!("{json}");
        } else {
            print!("{}", report.toc.outline());
        }
    }

    Ok(())
}

fn run_check(args: &CheckArgs) -> anyhow::Result<()> {
    let model = load_model(&args.model)?;

    println!(
        "spec version: {} (release {})",
        model.spec_version,
        model.release()
    );

    println!("groups:");
    for (group, versions) in model.group_versions() {
        let versions: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        println!("  {group}: {}", versions.join(", "));
    }

    println!("categories:");
    let mut missing = 0;
    for category in &model.resource_categories {
        println!("  {} ({} resources)", category.name, category.resources.len());
        for resource in &category.resources {
            if model.resource_definition(resource).is_none() {
                eprintln!("Warning: missing definition for item in TOC {}", resource.name);
                missing += 1;
            }
        }
    }

    let old = model.definitions.iter().filter(|d| d.is_old_version).count();
    let inlined = model.definitions.iter().filter(|d| d.is_inlined).count();
    println!(
        "definitions: {} ({old} old versions, {inlined} inlined)",
        model.definitions.len()
    );

    if missing > 0 {
        eprintln!("{missing} resources have no definition and will be skipped");
    }
    Ok(())
}
