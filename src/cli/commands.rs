use crate::config::Preferences;
use crate::error::{EmsError, EmsResult};
use crate::excel::common_sheet_names;
use crate::transform::Converter;
use crate::types::{ConversionResult, ConvertOptions, OutputFormat, ProcessMode};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of the convert command, after clap parsing
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub files: Vec<PathBuf>,
    pub sheets: Vec<String>,
    pub format: Option<OutputFormat>,
    pub mode: Option<ProcessMode>,
    /// `Some(false)` for --no-region, `Some(true)` for --region
    pub region: Option<bool>,
    pub output_dir: PathBuf,
    pub zip: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub save_prefs: bool,
}

/// What a conversion produced on disk
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub results: Vec<ConversionResult>,
    pub written: Vec<PathBuf>,
    pub bundle: Option<PathBuf>,
}

impl ConversionReport {
    pub fn total_rows(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.has_artifacts())
            .filter_map(|r| r.row_count)
            .sum()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }
}

/// Pick the sheets to convert
///
/// An explicit selection is used as given. Without one, the single sheet
/// common to all files is chosen.
pub fn resolve_sheets(requested: &[String], files: &[PathBuf]) -> EmsResult<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }

    let mut common = common_sheet_names(files)?;
    match common.len() {
        0 => Err(EmsError::NoCommonSheet),
        1 => Ok(vec![common.remove(0)]),
        _ => Err(EmsError::AmbiguousSheet(common)),
    }
}

/// Run the pipeline and write its artifacts into `output_dir`
pub fn run_conversion(
    files: &[PathBuf],
    options: ConvertOptions,
    output_dir: &Path,
    zip: bool,
    dry_run: bool,
) -> EmsResult<ConversionReport> {
    let converter = Converter::new(options);
    let results = converter.convert(files)?;

    let mut report = ConversionReport {
        results,
        ..Default::default()
    };
    if dry_run {
        return Ok(report);
    }

    fs::create_dir_all(output_dir)?;
    for artifact in report.results.iter().flat_map(|r| r.artifacts.iter()) {
        report.written.push(artifact.write_to(output_dir)?);
    }
    if zip {
        if let Some(bundle) = converter.bundle(&report.results)? {
            report.bundle = Some(bundle.write_to(output_dir)?);
        }
    }

    let options = converter.options();
    info!(
        files = files.len(),
        written = report.written.len(),
        sheets = %options.sheets.join(","),
        format = ?options.output_format,
        mode = ?options.process_mode,
        "conversion finished"
    );
    Ok(report)
}

/// Execute the sheets command
pub fn sheets(files: Vec<PathBuf>) -> EmsResult<()> {
    println!("{}", "⚡ EMS - Common sheets".bold().green());
    for file in &files {
        println!("   File: {}", file.display());
    }
    println!();

    let common = common_sheet_names(files.as_slice())?;
    if common.is_empty() {
        println!("{}", "⚠️  No sheet is present in every file".yellow());
        return Ok(());
    }

    for name in &common {
        println!("   📄 {}", name.bright_blue());
    }
    println!();
    Ok(())
}

/// Execute the convert command
pub fn convert(args: ConvertArgs) -> EmsResult<()> {
    println!("{}", "⚡ EMS - Converting billing workbooks".bold().green());
    println!("   Files:  {}", args.files.len());
    println!("   Output: {}\n", args.output_dir.display());

    if args.dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No files will be written\n".yellow()
        );
    }

    let prefs_path = args.config.clone().unwrap_or_else(Preferences::default_path);
    let stored = Preferences::load(&prefs_path)?;
    let prefs = Preferences {
        output_format: args.format.unwrap_or(stored.output_format),
        process_mode: args.mode.unwrap_or(stored.process_mode),
        include_region: args.region.unwrap_or(stored.include_region),
    };

    let sheets = resolve_sheets(&args.sheets, &args.files)?;

    if args.verbose {
        println!("{}", "📖 Options:".cyan());
        println!("   Sheets: {}", sheets.join(", "));
        println!("   Format: {:?}", prefs.output_format);
        println!("   Mode:   {:?}", prefs.process_mode);
        println!("   Region: {}\n", prefs.include_region);
    }

    let options = ConvertOptions {
        sheets,
        output_format: prefs.output_format,
        process_mode: prefs.process_mode,
        include_region: prefs.include_region,
    };
    let report = run_conversion(
        &args.files,
        options,
        &args.output_dir,
        args.zip,
        args.dry_run,
    )?;

    print_report(&report, args.verbose);

    if args.save_prefs {
        prefs.save(&prefs_path)?;
        println!("   💾 Preferences saved to {}", prefs_path.display());
    }

    let inputs = args.files.len();
    if inputs > 0 && report.failed_count() == inputs {
        return Err(EmsError::AllFilesFailed(inputs));
    }
    Ok(())
}

fn print_report(report: &ConversionReport, verbose: bool) {
    println!("{}", "✅ Conversion Results:".bold().green());

    for result in &report.results {
        match (&result.error, result.row_count) {
            (Some(error), _) => {
                println!("   ❌ {}", result.original_file_name.red().bold());
                println!("      {}", error.red());
            }
            (None, rows) => {
                println!(
                    "   📊 {} ({} records)",
                    result.original_file_name.bright_blue().bold(),
                    rows.unwrap_or(0)
                );
                for artifact in &result.artifacts {
                    println!("      {:?}: {}", artifact.kind, artifact.file_name.cyan());
                }
            }
        }
    }

    if verbose {
        for path in &report.written {
            println!("   💾 {}", path.display());
        }
    }
    if let Some(bundle) = &report.bundle {
        println!("   📦 {}", bundle.display().to_string().cyan());
    }
    println!();
}
