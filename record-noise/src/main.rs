use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};

use record_noise::{config, corrupt_files, reporters, tsv, MutationKind, NoiseRng};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inject reproducible noise into encoded record-linkage datasets",
    long_about = None
)]
struct Cli {
    /// Directory holding the *_encoded.tsv inputs
    #[arg(long, short)]
    input_dir: PathBuf,

    /// Directory for the corrupted outputs (same file names)
    #[arg(long, short)]
    output_dir: PathBuf,

    /// TOML settings file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Seed of the random stream (overrides the config)
    #[arg(long, short, value_parser = parse_seed)]
    seed: Option<u64>,

    /// Multiplier for the default probabilities (overrides the config)
    #[arg(long)]
    noise_level: Option<f64>,

    /// Probability of the encoding swap (overrides the config)
    #[arg(long)]
    swap_prob: Option<f64>,

    /// Write a JSON report of every run to this path
    #[arg(long, short)]
    report: Option<PathBuf>,

    /// Also mutate plaintext columns other than names and dates
    #[arg(long)]
    mutate_other_fields: bool,
}

fn parse_seed(raw: &str) -> Result<u64, String> {
    NoiseRng::from_seed_str(raw)
        .map(|rng| rng.seed())
        .map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = config::load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if let Some(level) = cli.noise_level {
        settings.noise_level = level;
    }
    if let Some(p) = cli.swap_prob {
        settings.set_probability(MutationKind::EncodingSwap, p);
    }
    if cli.mutate_other_fields {
        settings.mutate_other_fields = true;
    }
    if cli.report.is_some() {
        settings.report_path = cli.report;
    }
    settings.validate()?;

    if !cli.input_dir.is_dir() {
        bail!("Input directory {} does not exist", cli.input_dir.display());
    }

    let files = tsv::discover_encoded_files(&cli.input_dir)?;
    if files.is_empty() {
        bail!("No encoded TSV files found in {}", cli.input_dir.display());
    }
    info!("Found {} encoded file(s) in {}", files.len(), cli.input_dir.display());

    let reports = corrupt_files(&settings, &files, &cli.output_dir)
        .with_context(|| format!("Failed to corrupt files from {}", cli.input_dir.display()))?;
    for report in &reports {
        report.log_summary();
    }

    if let Some(path) = &settings.report_path {
        reporters::write_reports(&reports, path)?;
        info!("Report written to {}", path.display());
    }

    info!("Noise injection complete for {} file(s)", reports.len());
    Ok(())
}
