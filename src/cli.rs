/*!
figgen Command Line Interface

Validates chart descriptions and generates matplotlib code from them.
*/

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use figgen::writer::{PyplotWriter, Writer, WriterOptions};
use figgen::{validate, CodeShape, ErrorReport, FiggenError, IndentStyle, VERSION};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "figgen")]
#[command(about = "Validate chart descriptions and generate matplotlib code")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate matplotlib code from a chart description
    Generate {
        /// Path to the JSON request (`-` reads stdin)
        file: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the figure's code shape
        #[arg(long)]
        shape: Option<ShapeArg>,

        /// Override the figure's indentation style
        #[arg(long)]
        indent: Option<IndentArg>,

        /// Format for reported failures
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Validate a chart description without generating code
    Validate {
        /// Path to the JSON request (`-` reads stdin)
        file: PathBuf,

        /// Format for reported failures
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShapeArg {
    Procedure,
    Function,
}

impl From<ShapeArg> for CodeShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Procedure => CodeShape::Procedure,
            ShapeArg::Function => CodeShape::Function,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IndentArg {
    Space,
    Tab,
}

impl From<IndentArg> for IndentStyle {
    fn from(arg: IndentArg) -> Self {
        match arg {
            IndentArg::Space => IndentStyle::Space,
            IndentArg::Tab => IndentStyle::Tab,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Exit code for a rejected request
const EXIT_INVALID: u8 = 1;
/// Exit code for I/O and internal failures
const EXIT_FAILURE: u8 = 2;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read request from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read request from {}", file.display()))
    }
}

fn print_report(report: &ErrorReport, format: ReportFormat) -> anyhow::Result<()> {
    for cause in report {
        tracing::debug!(kind = ?cause.kind, location = %cause.location, "rejected");
    }
    match format {
        ReportFormat::Text => {
            eprintln!("{} validation error(s)", report.len());
            eprintln!("{}", report);
        }
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Generate {
            file,
            output,
            shape,
            indent,
            format,
        } => {
            let input = read_input(&file)?;
            let writer = PyplotWriter::with_options(WriterOptions {
                shape: shape.map(CodeShape::from),
                indent: indent.map(IndentStyle::from),
            });

            let code = match writer.render(&input) {
                Ok(code) => code,
                Err(FiggenError::ValidationError(report)) => {
                    print_report(&report, format)?;
                    return Ok(ExitCode::from(EXIT_INVALID));
                }
                Err(e) => return Err(e.into()),
            };

            match output {
                Some(path) => std::fs::write(&path, code.to_source())
                    .with_context(|| format!("Failed to write code to {}", path.display()))?,
                None => print!("{}", code),
            }
        }

        Commands::Validate { file, format } => {
            let input = read_input(&file)?;
            match validate(&input) {
                Ok(validated) => {
                    if format == ReportFormat::Json {
                        println!("[]");
                    } else {
                        println!("Request {} is valid", validated.request().request_id());
                    }
                }
                Err(report) => {
                    print_report(&report, format)?;
                    return Ok(ExitCode::from(EXIT_INVALID));
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
