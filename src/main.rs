use clap::{Parser, Subcommand};
use colored::Colorize;
use sales_updater::cli::{self, UpdateOptions};
use sales_updater::error::UpdaterResult;
use sales_updater::types::UpdateTarget;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sales-updater")]
#[command(about = "Add daily stock and sales figures to a company/variety row of an Excel workbook.")]
#[command(long_about = "Sales Updater - daily stock and sales bookkeeping for Excel workbooks

The workbook must contain the 'SPECILA' data sheet (two header rows) and the
'total' sheet. Only the selected row's stock/sales cells change; all other
cells, formulas and formatting are preserved.

COMMANDS:
  companies   - List companies in the data sheet
  varieties   - List varieties of one company
  update      - Add quantities and write updated_sales_<date>.xlsx

EXAMPLES:
  sales-updater companies daily.xlsx
  sales-updater varieties daily.xlsx --company AgriCo
  sales-updater update daily.xlsx --company AgriCo --variety Hybrid-9 --stock 25
  sales-updater update daily.xlsx -c AgriCo --targets sales --sales 10 -o out/")]
#[command(version)]
struct Cli {
    /// YAML file overriding sheet names and column identifiers
    #[arg(long, global = true, env = "SALES_UPDATER_LAYOUT")]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List companies in the data sheet
    Companies {
        /// Path to Excel file (.xlsx)
        file: PathBuf,
    },

    /// List varieties of one company
    Varieties {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Company name
        #[arg(short, long)]
        company: String,
    },

    #[command(long_about = "Add stock and/or sales quantities to one row.

The row is identified by company and variety. Existing numeric values are
increased by the given amount; empty cells receive the amount; non-numeric
content is replaced by the amount. A zero amount leaves the cell untouched.

The result is written to updated_sales_<YYYY-MM-DD>.xlsx (current directory
by default). The input file is never modified.")]
    /// Add quantities to a company/variety row
    Update {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Company name
        #[arg(short, long)]
        company: String,

        /// Variety name (defaults to the company's first variety)
        #[arg(short = 'V', long)]
        variety: Option<String>,

        /// Fields to update: stock, sales or both (comma separated)
        #[arg(short, long, value_parser = parse_targets)]
        targets: Option<BTreeSet<UpdateTarget>>,

        /// Amount to add to stock
        #[arg(long, default_value = "0")]
        stock: u64,

        /// Amount to add to sales
        #[arg(long, default_value = "0")]
        sales: u64,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview changes without writing a file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn parse_targets(input: &str) -> Result<BTreeSet<UpdateTarget>, String> {
    UpdateTarget::parse_list(input)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sales_updater=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {}", "❌ Error:".bold().red(), err);
        std::process::exit(1);
    }
}

fn run() -> UpdaterResult<()> {
    let cli = Cli::parse();
    let layout = cli.layout;

    match cli.command {
        Commands::Companies { file } => {
            init_tracing(false);
            cli::companies(file, layout)
        }

        Commands::Varieties { file, company } => {
            init_tracing(false);
            cli::varieties(file, company, layout)
        }

        Commands::Update {
            file,
            company,
            variety,
            targets,
            stock,
            sales,
            output,
            dry_run,
            verbose,
        } => {
            init_tracing(verbose);
            cli::update(UpdateOptions {
                file,
                company,
                variety,
                targets,
                stock,
                sales,
                output,
                dry_run,
                verbose,
                layout,
            })
        }
    }
}
