//! Run report rendering
//!
//! Text output mirrors what a person reads in CI logs; JSON output carries
//! the same information for tooling. Both are deterministic for an
//! unchanged corpus: examples come in path order, errors in location order,
//! and no timestamps are emitted.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::checksum::Checksum;
use crate::config::ReportFormat;
use crate::error::{Result, ValidatorError};
use crate::prefix::Prefix;
use crate::registry::{CompiledValidator, SchemaRegistry};
use crate::runner::{ExampleOutcome, RunKind, RunResult};
use crate::version::SchemaVersion;

/// A loaded schema, as shown in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub prefix: Prefix,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<SchemaVersion>,
    pub checksum: Checksum,
}

impl From<&CompiledValidator> for SchemaSummary {
    fn from(validator: &CompiledValidator) -> Self {
        Self {
            prefix: validator.prefix().clone(),
            file: validator.path().to_path_buf(),
            version: validator.version().cloned(),
            checksum: validator.checksum().clone(),
        }
    }
}

/// Everything a finished run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub result: RunResult,
    pub schemas: Vec<SchemaSummary>,
}

impl RunSummary {
    pub fn new(result: RunResult, registry: Option<&SchemaRegistry>) -> Self {
        let schemas = registry
            .map(|r| r.validators().map(SchemaSummary::from).collect())
            .unwrap_or_default();
        Self { result, schemas }
    }

    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }
}

/// Renders run summaries and fatal errors
#[derive(Debug, Clone)]
pub struct Reporter {
    root: PathBuf,
    format: ReportFormat,
    max_errors: usize,
}

impl Reporter {
    pub fn new(root: impl Into<PathBuf>, format: ReportFormat, max_errors: usize) -> Self {
        Self {
            root: root.into(),
            format,
            max_errors,
        }
    }

    /// Path as shown to the user: relative to the project root when under it
    pub fn display_path(&self, path: &Path) -> String {
        let shown = path.strip_prefix(&self.root).unwrap_or(path);
        shown.display().to_string()
    }

    pub fn render(&self, summary: &RunSummary, out: &mut impl Write) -> Result<()> {
        match self.format {
            ReportFormat::Text => self.render_text(&summary.result, out),
            ReportFormat::Json => self.render_json(summary, out),
        }
    }

    /// Render an error that stopped the run
    pub fn render_fatal(&self, err: &ValidatorError, out: &mut impl Write) -> Result<()> {
        let message = match err {
            ValidatorError::NoSchemas { dir } => {
                format!("No schemas found in {}/.", self.display_path(dir))
            }
            other => other.to_string(),
        };
        match self.format {
            ReportFormat::Text => writeln!(out, "❌ {}", message)?,
            ReportFormat::Json => {
                let doc = serde_json::json!({
                    "status": "error",
                    "failed": true,
                    "error": message,
                });
                serde_json::to_writer_pretty(&mut *out, &doc)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn render_text(&self, result: &RunResult, out: &mut impl Write) -> Result<()> {
        let examples_dir = self.display_path(&result.examples_dir);
        match result.kind {
            RunKind::MissingExamplesDir => {
                writeln!(
                    out,
                    "ℹ️ No {}/ directory found. Skipping example validation.",
                    examples_dir
                )?;
                return Ok(());
            }
            RunKind::NoExampleFiles => {
                writeln!(out, "ℹ️ No example JSON files found in {}/.", examples_dir)?;
                return Ok(());
            }
            RunKind::Completed => {}
        }

        for example in &result.examples {
            let path = self.display_path(&example.path);
            match &example.outcome {
                ExampleOutcome::Valid => writeln!(out, "✅ Valid: {}", path)?,
                ExampleOutcome::Skipped => writeln!(
                    out,
                    "⚠️ Skipping {} (no schema mapping for prefix '{}')",
                    path, example.prefix
                )?,
                ExampleOutcome::Unreadable { reason } => {
                    writeln!(out)?;
                    writeln!(out, "❌ Example is not valid JSON: {}", path)?;
                    writeln!(out, "   - {}", reason)?;
                }
                ExampleOutcome::Invalid { errors } => {
                    writeln!(out)?;
                    writeln!(out, "❌ Example does not validate: {}", path)?;
                    for issue in errors.iter().take(self.max_errors) {
                        writeln!(out, "   - {}: {}", issue.location, issue.message)?;
                    }
                    if errors.len() > self.max_errors {
                        writeln!(out, "   … and {} more", errors.len() - self.max_errors)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn render_json(&self, summary: &RunSummary, out: &mut impl Write) -> Result<()> {
        let result = &summary.result;
        let doc = JsonReport {
            status: result.kind,
            failed: result.failed(),
            strict: result.strict,
            examples_dir: self.display_path(&result.examples_dir),
            schemas: summary
                .schemas
                .iter()
                .map(|s| JsonSchema {
                    prefix: &s.prefix,
                    file: self.display_path(&s.file),
                    version: s.version.as_ref(),
                    checksum: &s.checksum,
                })
                .collect(),
            examples: result
                .examples
                .iter()
                .map(|e| JsonExample {
                    path: self.display_path(&e.path),
                    prefix: &e.prefix,
                    outcome: &e.outcome,
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: RunKind,
    failed: bool,
    strict: bool,
    examples_dir: String,
    schemas: Vec<JsonSchema<'a>>,
    examples: Vec<JsonExample<'a>>,
}

#[derive(Serialize)]
struct JsonSchema<'a> {
    prefix: &'a Prefix,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a SchemaVersion>,
    checksum: &'a Checksum,
}

#[derive(Serialize)]
struct JsonExample<'a> {
    path: String,
    prefix: &'a Prefix,
    #[serde(flatten)]
    outcome: &'a ExampleOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationPath, PathSegment};
    use crate::registry::ValidationIssue;
    use crate::runner::ExampleReport;

    fn issue(key: &str, message: &str) -> ValidationIssue {
        ValidationIssue {
            location: LocationPath::root().push(PathSegment::Key(key.to_string())),
            message: message.to_string(),
        }
    }

    fn completed(examples: Vec<ExampleReport>) -> RunSummary {
        RunSummary {
            result: RunResult {
                kind: RunKind::Completed,
                examples_dir: PathBuf::from("/repo/examples"),
                strict: false,
                examples,
            },
            schemas: Vec::new(),
        }
    }

    fn example(name: &str, outcome: ExampleOutcome) -> ExampleReport {
        let path = PathBuf::from("/repo/examples").join(name);
        ExampleReport {
            prefix: Prefix::from_path(&path).unwrap(),
            path,
            outcome,
        }
    }

    fn render(reporter: &Reporter, summary: &RunSummary) -> String {
        let mut out = Vec::new();
        reporter.render(summary, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_lines() {
        let reporter = Reporter::new("/repo", ReportFormat::Text, 25);
        let summary = completed(vec![
            example(
                "mrp.bad.json",
                ExampleOutcome::Invalid {
                    errors: vec![issue("id", "\"id\" is a required property")],
                },
            ),
            example("mrp.good.json", ExampleOutcome::Valid),
            example("zzz.sample.json", ExampleOutcome::Skipped),
        ]);

        let text = render(&reporter, &summary);
        assert_eq!(
            text,
            "\n❌ Example does not validate: examples/mrp.bad.json\n\
             \u{20}  - $.id: \"id\" is a required property\n\
             ✅ Valid: examples/mrp.good.json\n\
             ⚠️ Skipping examples/zzz.sample.json (no schema mapping for prefix 'zzz')\n"
        );
    }

    #[test]
    fn test_error_cap_and_overflow_count() {
        let reporter = Reporter::new("/repo", ReportFormat::Text, 25);
        let errors: Vec<ValidationIssue> =
            (0..30).map(|i| issue(&format!("k{:02}", i), "bad")).collect();
        let summary = completed(vec![example("mrp.many.json", ExampleOutcome::Invalid { errors })]);

        let text = render(&reporter, &summary);
        let shown = text.lines().filter(|l| l.starts_with("   - ")).count();
        assert_eq!(shown, 25);
        assert!(text.contains("   - $.k24: bad"));
        assert!(!text.contains("$.k25"));
        assert!(text.ends_with("   … and 5 more\n"));
    }

    #[test]
    fn test_exactly_cap_has_no_overflow_line() {
        let reporter = Reporter::new("/repo", ReportFormat::Text, 3);
        let errors: Vec<ValidationIssue> = (0..3).map(|i| issue(&i.to_string(), "bad")).collect();
        let summary =
            completed(vec![example("mrp.three.json", ExampleOutcome::Invalid { errors })]);

        assert!(!render(&reporter, &summary).contains("more"));
    }

    #[test]
    fn test_missing_dir_message() {
        let reporter = Reporter::new("/repo", ReportFormat::Text, 25);
        let summary = RunSummary {
            result: RunResult::missing_examples_dir(
                Path::new("/repo/examples"),
                Default::default(),
            ),
            schemas: Vec::new(),
        };
        assert_eq!(
            render(&reporter, &summary),
            "ℹ️ No examples/ directory found. Skipping example validation.\n"
        );
    }

    #[test]
    fn test_fatal_no_schemas() {
        let reporter = Reporter::new("/repo", ReportFormat::Text, 25);
        let mut out = Vec::new();
        let err = ValidatorError::NoSchemas { dir: PathBuf::from("/repo/schemas") };
        reporter.render_fatal(&err, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "❌ No schemas found in schemas/.\n");
    }

    #[test]
    fn test_json_report() {
        let reporter = Reporter::new("/repo", ReportFormat::Json, 25);
        let summary = completed(vec![
            example(
                "mrp.bad.json",
                ExampleOutcome::Invalid { errors: vec![issue("id", "missing")] },
            ),
            example("zzz.sample.json", ExampleOutcome::Skipped),
        ]);

        let doc: serde_json::Value = serde_json::from_str(&render(&reporter, &summary)).unwrap();
        assert_eq!(doc["status"], "completed");
        assert_eq!(doc["failed"], true);
        assert_eq!(doc["examples"][0]["path"], "examples/mrp.bad.json");
        assert_eq!(doc["examples"][0]["status"], "invalid");
        assert_eq!(doc["examples"][0]["errors"][0]["location"], "$.id");
        assert_eq!(doc["examples"][1]["status"], "skipped");
        assert_eq!(doc["examples"][1]["prefix"], "zzz");
    }
}
