//! Example Validator CLI
//!
//! Validates every example document against the schema its filename
//! prefix selects. Exits 1 when an example fails or no schema is found.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use example_validator::{check_examples, ReportFormat, Reporter, SchemaDraft, ValidatorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "validate-examples")]
#[command(about = "Validate example documents against their JSON Schemas")]
#[command(version)]
struct Cli {
    /// Project root containing the schemas and examples directories
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Schema directory, relative to the root
    #[arg(long)]
    schemas: Option<PathBuf>,

    /// Examples directory, relative to the root
    #[arg(long)]
    examples: Option<PathBuf>,

    /// Config file to load on top of the defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Fail on examples whose prefix has no schema
    #[arg(long)]
    strict: bool,

    /// Errors shown per invalid example
    #[arg(long)]
    max_errors: Option<usize>,

    /// JSON Schema draft used to compile schemas
    #[arg(long, value_enum)]
    draft: Option<SchemaDraft>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,
}

impl Cli {
    fn apply(self, config: &mut ValidatorConfig) {
        if let Some(root) = self.root {
            config.paths.root = root;
        }
        if let Some(schemas) = self.schemas {
            config.paths.schemas = schemas;
        }
        if let Some(examples) = self.examples {
            config.paths.examples = examples;
        }
        if self.strict {
            config.validation.strict = true;
        }
        if let Some(max_errors) = self.max_errors {
            config.report.max_errors = max_errors;
        }
        if let Some(draft) = self.draft {
            config.validation.draft = draft;
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = ValidatorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    cli.apply(&mut config);

    let reporter = Reporter::new(
        config.paths.root.clone(),
        config.report.format,
        config.report.max_errors,
    );
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let code = match check_examples(&config) {
        Ok(summary) => {
            reporter.render(&summary, &mut out)?;
            summary.exit_code()
        }
        Err(err) => {
            reporter.render_fatal(&err, &mut out)?;
            1
        }
    };
    out.flush()?;
    Ok(code)
}
