use anyhow::Context;
use clap::{Parser, Subcommand};
use cohort_extract::{
    ExtractionValidator, Result, SchemaRegistry, ValidatorConfig, batch, compare, export, merge,
    response,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cohort-extract")]
#[command(about = "Validate patient characteristics extracted from research articles", long_about = None)]
struct Cli {
    /// Custom schema JSON; replaces the built-in field set.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Validator settings (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single extraction JSON file.
    File {
        input: PathBuf,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Validate every *.json file in a directory.
    Dir {
        dir: PathBuf,

        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write all reports as one CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Parse a raw LLM completion (text file) and validate the result.
    Parse {
        input: PathBuf,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Merge per-chunk extraction files into one record.
    Merge {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Compare two extraction files.
    Compare {
        left: PathBuf,
        right: PathBuf,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_validator(schema: Option<&Path>, config: Option<&Path>) -> Result<ExtractionValidator> {
    let schema = match schema {
        Some(path) => {
            let schema = SchemaRegistry::from_json_file(path)?;
            info!("loaded custom schema from {} ({} fields)", path.display(), schema.len());
            schema
        }
        None => SchemaRegistry::default(),
    };
    let config = match config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };
    Ok(ExtractionValidator::new(schema, config))
}

/// Pretty JSON to `out` if given, else stdout.
fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::File { input, out } => {
            let validator = build_validator(cli.schema.as_deref(), cli.config.as_deref())?;
            let report = batch::validate_file(&validator, &input);
            match out {
                Some(out) => {
                    batch::write_file_report(&input, &report, &out)?;
                    println!("Wrote {}", out.display());
                }
                None => emit(&report, None)?,
            }
        }
        Commands::Dir { dir, out_dir, csv } => {
            let validator = build_validator(cli.schema.as_deref(), cli.config.as_deref())?;
            let (summary, reports) = batch::validate_dir(&validator, &dir, out_dir.as_deref())?;
            if let Some(csv) = csv {
                let reports: Vec<_> = reports.into_iter().map(|(_, r)| r).collect();
                export::write_reports_csv(&csv, &reports)?;
            }
            emit(&summary, None)?;
        }
        Commands::Parse { input, out } => {
            let validator = build_validator(cli.schema.as_deref(), cli.config.as_deref())?;
            let completion = fs::read_to_string(&input)
                .with_context(|| format!("read completion {}", input.display()))?;
            let record = response::parse_completion(&completion);
            let report = validator.validate(&record);
            emit(&report, out.as_deref())?;
        }
        Commands::Merge { inputs, out } => {
            let records = inputs
                .iter()
                .map(|p| batch::read_record(p))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge::merge_extractions(&records);
            emit(&merged, out.as_deref())?;
        }
        Commands::Compare { left, right, out } => {
            let comparison =
                compare::compare_records(&batch::read_record(&left)?, &batch::read_record(&right)?);
            info!("similarity score: {:.2}", comparison.similarity_score);
            emit(&comparison, out.as_deref())?;
        }
    }

    Ok(())
}
