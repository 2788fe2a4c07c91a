use clap::{Parser, Subcommand};
use excelify::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "excelify")]
#[command(about = "Fill xlsx templates with values from a JSON document.")]
#[command(long_about = "Excelify - fill xlsx templates from JSON

Template cells hold placeholders: a JSON path between ≮ and ≯.
  ≮name≯            replaced by the value at $.name
  ≮list[].name≯     row repeated once per element of $.list

COMMANDS:
  fill      - Fill a template and write a new workbook
  get       - Print the value of one or more paths
  inspect   - List the placeholders of a template

EXAMPLES:
  excelify fill report.xlsx data.json -o out.xlsx
  cat data.json | excelify fill report.xlsx - -o out.xlsx --strict
  excelify get data.json 'list[0].name' '≮name≯'
  excelify inspect report.xlsx")]
#[command(version)]
struct Cli {
    /// Show debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Fill a template and write a new workbook.

Array rows are expanded first (one row per element, nested arrays one level
per pass), then every scalar placeholder is replaced. Only the first sheet is
processed; other sheets are copied unchanged.

By default a path that cannot be resolved leaves its error message in the
cell, and an array that cannot be found produces no rows. --strict turns both
into errors and no output is written.")]
    /// Fill a template and write a new workbook
    Fill {
        /// Path to the xlsx template
        template: PathBuf,

        /// Path to the JSON data file ('-' reads stdin)
        data: PathBuf,

        /// Output workbook path (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// YAML options file
        #[arg(short, long, env = "EXCELIFY_CONFIG")]
        config: Option<PathBuf>,

        /// Fail on unresolved placeholders and missing arrays
        #[arg(long)]
        strict: bool,
    },

    /// Print the value of one or more paths
    Get {
        /// Path to the JSON data file ('-' reads stdin)
        data: PathBuf,

        /// Paths to look up, with or without delimiters
        #[arg(required = true)]
        paths: Vec<String>,

        /// YAML options file
        #[arg(short, long, env = "EXCELIFY_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List the placeholders of a template's first sheet
    Inspect {
        /// Path to the xlsx template
        template: PathBuf,

        /// YAML options file
        #[arg(short, long, env = "EXCELIFY_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "excelify=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fill {
            template,
            data,
            output,
            config,
            strict,
        } => cli::fill(template, data, output, config, strict, cli.verbose)?,

        Commands::Get {
            data,
            paths,
            config,
        } => cli::get(data, paths, config)?,

        Commands::Inspect { template, config } => cli::inspect(template, config)?,
    }

    Ok(())
}
