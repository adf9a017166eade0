use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use oasdef_core::config::{self, CONFIG_FILE_NAME, OasdefConfig, OutputFormat};
use oasdef_core::parse::{self, Document, SourceFormat};
use oasdef_core::validate::{self, Severity, ValidationReport};

#[derive(Parser)]
#[command(
    name = "oasdef",
    about = "Validate, inspect and convert Swagger 2.0 / OpenAPI 3.x documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document against the structural rules of its version
    Validate {
        /// Path to the document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report format
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },

    /// Summarize a document
    Inspect {
        /// Path to the document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: DataFormat,
    },

    /// Decode a document and write it back out
    Convert {
        /// Path to the document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Target format (defaults to `output.format` from the config)
        #[arg(long)]
        to: Option<DataFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a new oasdef configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DataFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for DataFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => DataFormat::Yaml,
            OutputFormat::Json => DataFormat::Json,
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input, format } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let passed = cmd_validate(&resolve_input(input, &cfg), format, &cfg)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Inspect { input, format } => {
            let cfg = try_load_config()?.unwrap_or_default();
            cmd_inspect(&resolve_input(input, &cfg), format)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Convert { input, to, output } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let to = to.unwrap_or_else(|| cfg.output.format.into());
            cmd_convert(&resolve_input(input, &cfg), to, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init { force } => {
            cmd_init(force)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oasdef", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OasdefConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)?;
    if config.is_some() {
        debug!("loaded {}", config_path.display());
    }
    Ok(config)
}

fn resolve_input(input: Option<PathBuf>, cfg: &OasdefConfig) -> PathBuf {
    input.unwrap_or_else(|| PathBuf::from(&cfg.input))
}

fn load_document(path: &Path) -> Result<Document> {
    parse::from_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn cmd_validate(input: &Path, format: ReportFormat, cfg: &OasdefConfig) -> Result<bool> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let report = validate::validate_str(&content, SourceFormat::from_path(input), &cfg.validate)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    match format {
        ReportFormat::Text => print_report(input, &report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.passes(cfg.validate.fail_on_warnings))
}

fn print_report(input: &Path, report: &ValidationReport) {
    for issue in &report.issues {
        eprintln!("{issue}");
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if report.issues.is_empty() {
        eprintln!("{}: valid", input.display());
    } else {
        eprintln!(
            "{}: {} error(s), {} warning(s)",
            input.display(),
            errors,
            warnings
        );
    }
}

fn cmd_inspect(input: &Path, format: DataFormat) -> Result<()> {
    let document = load_document(input)?;
    let summary = build_inspect_summary(&document);

    match format {
        DataFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        DataFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(document: &Document) -> serde_json::Value {
    let components: serde_json::Map<String, serde_json::Value> = document
        .component_counts()
        .into_iter()
        .map(|(section, count)| (section.to_string(), count.into()))
        .collect();

    serde_json::json!({
        "version": document.version().to_string(),
        "info": {
            "title": document.title(),
            "version": document.api_version(),
        },
        "operations": document.operations(),
        "webhooks": document.webhook_count(),
        "components": components,
        "schema_kinds": document.schema_kinds(),
    })
}

fn cmd_convert(input: &Path, to: DataFormat, output: Option<&Path>) -> Result<()> {
    let document = load_document(input)?;

    let text = match to {
        DataFormat::Yaml => document.to_yaml()?,
        DataFormat::Json => document.to_json()? + "\n",
    };

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("  wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
