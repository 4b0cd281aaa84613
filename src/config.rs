//! Configuration management for the example validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (validate-examples.toml)
//! - Environment variables (VALIDATE__*)
//!
//! ## Example config file (validate-examples.toml):
//! ```toml
//! [paths]
//! root = "."
//! schemas = "schemas"
//! examples = "examples"
//!
//! [prefixes]
//! accf = "accf.v0.1.schema.json"
//! mrp = "mrp.v0.1.schema.json"
//!
//! [validation]
//! draft = "2020-12"
//! strict = false
//!
//! [report]
//! format = "text"
//! max_errors = 25
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::SchemaTable;

/// Main configuration for an example validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Where schemas and examples live
    #[serde(default)]
    pub paths: PathsConfig,

    /// Prefix -> schema file name
    #[serde(default = "default_prefixes")]
    pub prefixes: BTreeMap<String, String>,

    /// Validation behaviour
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,
}

/// Directory layout, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Project root
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Schema directory (relative to root unless absolute)
    #[serde(default = "default_schemas_dir")]
    pub schemas: PathBuf,

    /// Examples directory (relative to root unless absolute)
    #[serde(default = "default_examples_dir")]
    pub examples: PathBuf,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// JSON Schema draft used to compile every schema
    #[serde(default)]
    pub draft: SchemaDraft,

    /// Treat examples with no schema mapping as failures
    #[serde(default)]
    pub strict: bool,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format
    #[serde(default)]
    pub format: ReportFormat,

    /// Errors shown per invalid example before the remainder is summarized
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
}

/// Output format for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Supported JSON Schema drafts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum SchemaDraft {
    #[serde(rename = "4")]
    #[value(name = "4")]
    Draft4,
    #[serde(rename = "6")]
    #[value(name = "6")]
    Draft6,
    #[serde(rename = "7")]
    #[value(name = "7")]
    Draft7,
    #[serde(rename = "2019-09")]
    #[value(name = "2019-09")]
    Draft201909,
    #[default]
    #[serde(rename = "2020-12")]
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<SchemaDraft> for jsonschema::Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_schemas_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_examples_dir() -> PathBuf {
    PathBuf::from("examples")
}

fn default_max_errors() -> usize {
    25
}

fn default_prefixes() -> BTreeMap<String, String> {
    [
        ("accf", "accf.v0.1.schema.json"),
        ("mrp", "mrp.v0.1.schema.json"),
        ("map", "map.v0.1.schema.json"),
        ("mip", "mip.v0.1.schema.json"),
    ]
    .into_iter()
    .map(|(prefix, file)| (prefix.to_string(), file.to_string()))
    .collect()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            schemas: default_schemas_dir(),
            examples: default_examples_dir(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            draft: SchemaDraft::default(),
            strict: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            max_errors: default_max_errors(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            prefixes: default_prefixes(),
            validation: ValidationConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Defaults rooted at `root`, ignoring config files and environment
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.paths.root = root.into();
        config
    }

    /// Load configuration from the default locations, adding a required
    /// file on top when `config_path` is given
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "validate-examples.toml",
            ".validate-examples.toml",
            "config/validate-examples.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        let project_dirs = directories::ProjectDirs::from("dev", "familiar", "validate-examples");
        if let Some(config_dir) = project_dirs {
            let xdg_config = config_dir.config_dir().join("validate-examples.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // VALIDATE__VALIDATION__STRICT=true
        builder = builder.add_source(
            Environment::with_prefix("VALIDATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Schema directory resolved against the project root
    pub fn schemas_dir(&self) -> PathBuf {
        self.paths.root.join(&self.paths.schemas)
    }

    /// Examples directory resolved against the project root
    pub fn examples_dir(&self) -> PathBuf {
        self.paths.root.join(&self.paths.examples)
    }

    /// The prefix table as a validated [`SchemaTable`]
    pub fn schema_table(&self) -> Result<SchemaTable> {
        SchemaTable::new(
            self.prefixes
                .iter()
                .map(|(prefix, file)| (prefix.as_str(), file.as_str())),
        )
    }
}
