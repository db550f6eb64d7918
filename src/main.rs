use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lite_report::format::Store;
use lite_report::manager::{ReportManager, ReportOptions, ReportRequest};
use lite_report::model::DuplicateKeyPolicy;
use lite_report::{ReportError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::New(args) => execute_new(args),
        Command::Generate(args) => execute_generate(args),
    }
}

fn execute_new(args: NewArgs) -> Result<()> {
    let manager = ReportManager::default();
    let path = manager.create_new_file(&args.output, args.overwrite)?;
    println!("created {}", path.display());
    Ok(())
}

fn execute_generate(args: GenerateArgs) -> Result<()> {
    let manager = ReportManager::new(ReportOptions {
        duplicates: args.on_duplicate.into(),
    });
    let request = ReportRequest {
        input: args.input,
        output: args.output,
        subtract: args.subtract,
        store: args.store.into(),
    };

    let summary = manager.generate_report(&request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: {} parsed, {} updated, {} added, {} total in {}",
            summary.store,
            summary.parsed,
            summary.updated,
            summary.inserted,
            summary.total,
            summary.output.display()
        );
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge retailer sales exports into a running report workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty report workbook.
    New(NewArgs),
    /// Add (or subtract) a retailer export to a report workbook.
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct NewArgs {
    /// Report file to create; the .xlsx extension is enforced.
    output: PathBuf,

    /// Replace the file if it already exists.
    #[arg(long)]
    overwrite: bool,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Retailer export (.xlsx or .xls).
    #[arg(long)]
    input: PathBuf,

    /// Report workbook to update; created when missing.
    #[arg(long)]
    output: PathBuf,

    /// Retailer layout of the input file.
    #[arg(long, value_enum)]
    store: StoreKind,

    /// Subtract input quantities instead of adding them.
    #[arg(long)]
    subtract: bool,

    /// What to do when the input lists the same article twice.
    #[arg(long, value_enum, default_value_t = DuplicateKind::Reject)]
    on_duplicate: DuplicateKind,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StoreKind {
    Technopolis,
    Technomarket,
}

impl From<StoreKind> for Store {
    fn from(kind: StoreKind) -> Self {
        match kind {
            StoreKind::Technopolis => Store::Technopolis,
            StoreKind::Technomarket => Store::Technomarket,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DuplicateKind {
    Reject,
    LastWins,
}

impl From<DuplicateKind> for DuplicateKeyPolicy {
    fn from(kind: DuplicateKind) -> Self {
        match kind {
            DuplicateKind::Reject => DuplicateKeyPolicy::Reject,
            DuplicateKind::LastWins => DuplicateKeyPolicy::LastWins,
        }
    }
}
