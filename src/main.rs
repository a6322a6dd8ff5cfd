use clap::{Parser, Subcommand};
use ems_convert::cli::{self, ConvertArgs};
use ems_convert::error::EmsResult;
use ems_convert::types::{OutputFormat, ProcessMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ems")]
#[command(about = "EMS electricity billing converter (EMS แปลงข้อมูลค่าไฟฟ้า)")]
#[command(long_about = "EMS - Electricity billing workbook converter

Reshapes monthly billing sheets (one row per meter, 'baht <month>' and
'unit <month>' columns for the 12 Thai months) into one record per meter
and month, ready for CSV or Excel.

COMMANDS:
  sheets   - List sheet names common to all workbooks
  convert  - Transform workbooks to CSV/XLSX (optionally zipped)

EXAMPLES:
  ems sheets north.xlsx south.xlsx
  ems convert north.xlsx south.xlsx -s data_2566 -m combined -f both
  ems convert *.xlsx --zip -o out/")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sheet names common to all workbooks
    Sheets {
        /// Excel workbooks (.xls, .xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    #[command(long_about = "Transform billing workbooks to CSV/XLSX.

Each selected sheet is scanned for the header row holding
'electricityNumber'. Every data row then yields 12 records
(Province, electricityNumber, deviceNumber, Year, Month, Baht, Unit).

YEAR:
  Sheets named data_<BE year> (e.g. data_2566) map to BE - 543 (2023).
  Other sheets use the current year.

MODES:
  individual - one output per input file (default)
  combined   - all files merged into Combined<n>_<date>

Options not given on the command line come from .ems.yaml
(see --config); --save-prefs stores the effective choices.")]
    /// Transform workbooks to CSV/XLSX
    Convert {
        /// Excel workbooks (.xls, .xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sheet(s) to read; defaults to the only sheet common to all files
        #[arg(short, long = "sheet", value_delimiter = ',')]
        sheets: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep outputs per file or merge them
        #[arg(short, long, value_enum)]
        mode: Option<ProcessMode>,

        /// Include the Province column (from the file name)
        #[arg(long, conflicts_with = "no_region")]
        region: bool,

        /// Omit the Province column
        #[arg(long)]
        no_region: bool,

        /// Directory for the produced files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Also bundle every produced file into one .zip
        #[arg(long)]
        zip: bool,

        /// Transform and report without writing files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Preferences file
        #[arg(long, env = "EMS_CONFIG")]
        config: Option<PathBuf>,

        /// Store the effective format, mode and region choice
        #[arg(long)]
        save_prefs: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> EmsResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { files } => {
            init_tracing(false);
            cli::sheets(files)
        }

        Commands::Convert {
            files,
            sheets,
            format,
            mode,
            region,
            no_region,
            output_dir,
            zip,
            dry_run,
            verbose,
            config,
            save_prefs,
        } => {
            init_tracing(verbose);
            let region = match (region, no_region) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            cli::convert(ConvertArgs {
                files,
                sheets,
                format,
                mode,
                region,
                output_dir,
                zip,
                dry_run,
                verbose,
                config,
                save_prefs,
            })
        }
    }
}
