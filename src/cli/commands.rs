use crate::config::LayoutConfig;
use crate::delivery::today;
use crate::error::UpdaterResult;
use crate::session::UpdateSession;
use crate::types::{Selections, SkipReason, UpdateReport, UpdateTarget, WriteOutcome};
use colored::Colorize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn open_session(file: &Path, layout: Option<&Path>) -> UpdaterResult<UpdateSession> {
    let layout = LayoutConfig::load(layout)?;
    let bytes = fs::read(file)?;
    UpdateSession::open(bytes, layout)
}

/// Execute the companies command
pub fn companies(file: PathBuf, layout: Option<PathBuf>) -> UpdaterResult<()> {
    let session = open_session(&file, layout.as_deref())?;

    println!("{}", "🏢 Companies".bold().green());
    println!("   File: {}", file.display());
    println!();
    for company in session.companies() {
        println!("   {}", company.bright_blue());
    }
    Ok(())
}

/// Execute the varieties command
pub fn varieties(file: PathBuf, company: String, layout: Option<PathBuf>) -> UpdaterResult<()> {
    let session = open_session(&file, layout.as_deref())?;
    // Validates the company name
    session.choose_company(Selections::default(), &company)?;

    println!("{}", "🌱 Varieties".bold().green());
    println!("   File: {}", file.display());
    println!("   Company: {}", company.bright_blue().bold());
    println!();
    for variety in session.varieties(&company) {
        println!("   {}", variety.cyan());
    }
    Ok(())
}

/// Options for the update command
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub file: PathBuf,
    pub company: String,
    /// Defaults to the company's first variety
    pub variety: Option<String>,
    /// Defaults to both targets
    pub targets: Option<BTreeSet<UpdateTarget>>,
    pub stock: u64,
    pub sales: u64,
    /// File or directory; defaults to the dated file name in the current directory
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    pub layout: Option<PathBuf>,
}

/// Execute the update command
pub fn update(options: UpdateOptions) -> UpdaterResult<()> {
    println!("{}", "📦 Sales Updater - Updating stock and sales".bold().green());
    println!("   File: {}", options.file.display());
    println!();

    if options.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No changes will be written\n".yellow()
        );
    }

    if options.verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let session = open_session(&options.file, options.layout.as_deref())?;
    if options.verbose {
        println!(
            "   Found {} rows, {} companies\n",
            session.view().len(),
            session.companies().len()
        );
    }

    let mut selections = session.choose_company(session.initial_selections(), &options.company)?;
    if let Some(ref variety) = options.variety {
        selections = session.choose_variety(selections, variety)?;
    }
    if let Some(targets) = options.targets.clone() {
        selections = session.choose_targets(selections, targets);
    }
    selections = session.set_increment(selections, UpdateTarget::Stock, options.stock);
    selections = session.set_increment(selections, UpdateTarget::Sales, options.sales);

    println!(
        "   Company: {}",
        selections.company.as_deref().unwrap_or_default().bright_blue().bold()
    );
    println!(
        "   Variety: {}",
        selections.variety.as_deref().unwrap_or_default().bright_blue().bold()
    );
    println!();

    if options.dry_run {
        let report = session.preview(&selections)?;
        print_report(&report, session.layout());
        println!("{}", "📋 Dry run complete - no changes written".yellow());
        return Ok(());
    }

    let updated = session.confirm(&selections, today())?;
    print_report(&updated.report, session.layout());

    let output = resolve_output(options.output, &updated.file_name);
    fs::write(&output, &updated.bytes)?;

    println!(
        "{}",
        format!("✅ File updated successfully: {}", output.display())
            .bold()
            .green()
    );
    Ok(())
}

fn print_report(report: &UpdateReport, layout: &LayoutConfig) {
    println!("{}", format!("🧮 Row {}:", report.row).bold().cyan());

    for change in &report.changes {
        let detail = match &change.outcome {
            WriteOutcome::Initialized => "was empty".to_string(),
            WriteOutcome::Accumulated { previous } => {
                format!("{} + {}", format_number(*previous), change.increment)
            }
            WriteOutcome::Overwrote { discarded } => {
                format!("replaced non-numeric '{}'", discarded)
                    .yellow()
                    .to_string()
            }
        };
        println!(
            "   {} [{}] = {} ({})",
            change.target.label().bright_blue(),
            change.address,
            format_number(change.value).bold().green(),
            detail
        );
    }

    for skipped in &report.skipped {
        match &skipped.reason {
            SkipReason::ZeroIncrement => println!(
                "   {} unchanged (nothing to add)",
                skipped.target.label().bright_blue()
            ),
            SkipReason::ColumnMissing { column } => println!(
                "   {} Column '{}' not found in sheet '{}'",
                "⚠️".yellow(),
                column,
                layout.data_sheet
            ),
        }
    }
    println!();
}

/// Where to write the output: an explicit file, a directory to place the
/// dated file in, or the dated file in the current directory.
pub fn resolve_output(output: Option<PathBuf>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    }
}
