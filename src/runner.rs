//! Validation Runner
//!
//! Walks the examples directory, routes each example to its schema by
//! filename prefix, and collects one [`ExampleReport`] per file. Examples
//! are processed one at a time in sorted path order; no example's outcome
//! affects another's.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, ValidatorError};
use crate::prefix::Prefix;
use crate::registry::{SchemaRegistry, ValidationIssue};

/// Knobs for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Count examples with no schema mapping as failures
    pub strict: bool,
}

/// What happened to one example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExampleOutcome {
    Valid,
    /// Every violation, sorted by location
    Invalid { errors: Vec<ValidationIssue> },
    /// No schema registered for the prefix
    Skipped,
    /// The file could not be read or is not JSON
    Unreadable { reason: String },
}

impl ExampleOutcome {
    pub fn is_failure(&self, strict: bool) -> bool {
        match self {
            ExampleOutcome::Valid => false,
            ExampleOutcome::Invalid { .. } | ExampleOutcome::Unreadable { .. } => true,
            ExampleOutcome::Skipped => strict,
        }
    }
}

/// Result for a single example file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    pub path: PathBuf,
    pub prefix: Prefix,
    #[serde(flatten)]
    pub outcome: ExampleOutcome,
}

/// How far a run got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// The examples directory does not exist
    MissingExamplesDir,
    /// The examples directory holds no JSON files
    NoExampleFiles,
    /// Every example was processed
    Completed,
}

/// Aggregate over all examples of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub kind: RunKind,
    pub examples_dir: PathBuf,
    pub strict: bool,
    pub examples: Vec<ExampleReport>,
}

impl RunResult {
    fn empty(kind: RunKind, examples_dir: &Path, options: RunOptions) -> Self {
        Self {
            kind,
            examples_dir: examples_dir.to_path_buf(),
            strict: options.strict,
            examples: Vec::new(),
        }
    }

    pub fn missing_examples_dir(examples_dir: &Path, options: RunOptions) -> Self {
        Self::empty(RunKind::MissingExamplesDir, examples_dir, options)
    }

    /// Whether any example failed
    pub fn failed(&self) -> bool {
        self.examples.iter().any(|e| e.outcome.is_failure(self.strict))
    }

    /// Process exit status: 1 on any failure, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failed() { 1 } else { 0 }
    }

    pub fn count(&self, pred: impl Fn(&ExampleOutcome) -> bool) -> usize {
        self.examples.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Drives the validate-and-collect loop over an examples directory
pub struct ValidationRunner<'a> {
    registry: &'a SchemaRegistry,
    options: RunOptions,
}

impl<'a> ValidationRunner<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: RunOptions) -> Self {
        Self { registry, options }
    }

    /// Validate every example under `examples_dir`.
    ///
    /// A missing directory is a successful no-op. An empty registry is a
    /// configuration error.
    pub fn run(&self, examples_dir: &Path) -> Result<RunResult> {
        if !examples_dir.is_dir() {
            info!(path = %examples_dir.display(), "examples directory not found");
            return Ok(RunResult::missing_examples_dir(examples_dir, self.options));
        }

        if self.registry.is_empty() {
            return Err(ValidatorError::NoSchemas {
                dir: self.registry.schema_dir().to_path_buf(),
            });
        }

        let files = discover_examples(examples_dir);
        if files.is_empty() {
            info!(path = %examples_dir.display(), "no example files found");
            return Ok(RunResult::empty(RunKind::NoExampleFiles, examples_dir, self.options));
        }

        let examples: Vec<ExampleReport> = files
            .into_iter()
            .map(|path| self.check_example(path))
            .collect();

        let result = RunResult {
            kind: RunKind::Completed,
            examples_dir: examples_dir.to_path_buf(),
            strict: self.options.strict,
            examples,
        };
        info!(
            total = result.examples.len(),
            valid = result.count(|o| matches!(o, ExampleOutcome::Valid)),
            skipped = result.count(|o| matches!(o, ExampleOutcome::Skipped)),
            failed = result.count(|o| o.is_failure(false)),
            "example validation finished"
        );
        Ok(result)
    }

    /// Route one example to its validator and check it
    pub fn check_example(&self, path: PathBuf) -> ExampleReport {
        let prefix = Prefix::from_path(&path).unwrap_or_else(|| Prefix::new(""));

        let outcome = match self.registry.get(&prefix) {
            None => {
                warn!(path = %path.display(), prefix = %prefix, "no schema mapping for prefix");
                ExampleOutcome::Skipped
            }
            Some(validator) => {
                debug!(path = %path.display(), prefix = %prefix, "validating example");
                match load_example(&path) {
                    Err(reason) => ExampleOutcome::Unreadable { reason },
                    Ok(instance) => {
                        let errors = validator.validate(&instance);
                        if errors.is_empty() {
                            ExampleOutcome::Valid
                        } else {
                            ExampleOutcome::Invalid { errors }
                        }
                    }
                }
            }
        };

        ExampleReport { path, prefix, outcome }
    }
}

/// All `*.json` files under `dir`, recursively, sorted by path.
///
/// Symlinks are followed. Entries the walk cannot read (permission errors,
/// link loops, dangling links) are logged and left out.
pub fn discover_examples(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry under examples directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn load_example(path: &Path) -> std::result::Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("failed to read file: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {}", e))
}
