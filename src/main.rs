//! enzyme-correlation command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use enzyme_correlation::config::{AnalysisConfig, ErrorPolicy, FilterKind};
use enzyme_correlation::correlation::CorrelationMethod;
use enzyme_correlation::pipeline;
use log::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliErrorPolicy {
    /// Stop at the first enzyme that cannot be analysed
    Abort,
    /// Warn, skip the enzyme and continue
    Skip,
}

impl From<CliErrorPolicy> for ErrorPolicy {
    fn from(policy: CliErrorPolicy) -> Self {
        match policy {
            CliErrorPolicy::Abort => ErrorPolicy::Abort,
            CliErrorPolicy::Skip => ErrorPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFilter {
    /// Longest ranked prefix whose p-values sum to at most 1.0
    Cumulative,
    /// Benjamini-Hochberg adjusted p-value below --alpha
    BenjaminiHochberg,
}

impl From<CliFilter> for FilterKind {
    fn from(filter: CliFilter) -> Self {
        match filter {
            CliFilter::Cumulative => FilterKind::Cumulative,
            CliFilter::BenjaminiHochberg => FilterKind::BenjaminiHochberg,
        }
    }
}

/// Correlate enzyme abundances with a pollution-abundance profile
#[derive(Parser)]
#[command(name = "enzyme-correlation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate with one method and write the all_/sig_ tables
    Correlate {
        /// Correlation method: pearson or spearman
        #[arg(short, long)]
        method: Option<CorrelationMethod>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Cross-reference previously written sig_pearson/sig_spearman tables
    Overlap {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run both methods and the overlap in one pass
    Run {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pollution abundance TSV with an `abundance` column
    #[arg(short, long)]
    pollution: Option<PathBuf>,

    /// Enzyme abundance TSV
    #[arg(short, long)]
    enzymes: Option<PathBuf>,

    /// Directory receiving the report files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Confidence level of the Fisher-z intervals (default: 0.95)
    #[arg(long)]
    confidence_level: Option<f64>,

    /// Metadata lines preceding the enzyme header row (default: 2)
    #[arg(long)]
    metadata_lines: Option<usize>,

    /// Behaviour when an enzyme cannot be analysed
    #[arg(long, value_enum)]
    on_error: Option<CliErrorPolicy>,

    /// Significance filter applied to the ranked table
    #[arg(long, value_enum)]
    filter: Option<CliFilter>,

    /// FDR level for the benjamini-hochberg filter (default: 0.05)
    #[arg(long)]
    alpha: Option<f64>,
}

impl CommonArgs {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(path) = self.pollution {
            config.pollution_file = path;
        }
        if let Some(path) = self.enzymes {
            config.enzyme_file = path;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(level) = self.confidence_level {
            config.confidence_level = level;
        }
        if let Some(lines) = self.metadata_lines {
            config.metadata_lines = lines;
        }
        if let Some(policy) = self.on_error {
            config.error_policy = policy.into();
        }
        if let Some(filter) = self.filter {
            config.filter = filter.into();
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Correlate { method, common } => {
            let mut config = common.into_config()?;
            if let Some(method) = method {
                config.method = method;
            }

            let report = pipeline::run_method(&config, config.method)
                .with_context(|| format!("{} analysis failed", config.method.label()))?;
            info!(
                "{} correlation results saved ({} significant)",
                report.method.label(),
                report.significant.len()
            );
        }
        Commands::Overlap { common } => {
            let config = common.into_config()?;
            let overlap = pipeline::run_overlap(&config).context("overlap step failed")?;
            info!("{} overlapping enzymes", overlap.len());
        }
        Commands::Run { common } => {
            let config = common.into_config()?;
            let summary = pipeline::run_all(&config).context("analysis failed")?;
            info!(
                "Pearson: {} significant, Spearman: {} significant, overlap: {}",
                summary.pearson.significant.len(),
                summary.spearman.significant.len(),
                summary.overlap.len()
            );
        }
    }

    Ok(())
}
