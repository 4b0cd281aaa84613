//! Example Validator
//!
//! Validates a corpus of example documents against a family of versioned
//! JSON Schemas. Each example is routed to its schema by the start of its
//! filename: `examples/mrp.sample.json` is checked against the schema
//! registered for `mrp`.
//!
//! ## Layout
//!
//! ```text
//! project/
//! ├── schemas/
//! │   ├── accf.v0.1.schema.json
//! │   └── mrp.v0.1.schema.json
//! └── examples/
//!     ├── mrp.sample.json
//!     └── nested/accf.minimal.json
//! ```
//!
//! ## Flow
//!
//! 1. [`SchemaRegistry`] compiles the schemas of the prefix table that
//!    exist on disk.
//! 2. [`ValidationRunner`] validates every example, in path order.
//! 3. [`Reporter`] prints the [`RunSummary`]; its exit code is 1 when any
//!    example failed.

pub mod checksum;
pub mod config;
pub mod error;
pub mod location;
pub mod prefix;
pub mod registry;
pub mod report;
pub mod runner;
pub mod version;

pub use checksum::Checksum;
pub use config::{ReportFormat, SchemaDraft, ValidatorConfig};
pub use error::{Result, ValidatorError};
pub use location::{LocationPath, PathSegment};
pub use prefix::Prefix;
pub use registry::{
    CompiledValidator, SchemaRegistration, SchemaRegistry, SchemaTable, ValidationIssue,
};
pub use report::{Reporter, RunSummary, SchemaSummary};
pub use runner::{ExampleOutcome, ExampleReport, RunKind, RunOptions, RunResult, ValidationRunner};
pub use version::SchemaVersion;

use tracing::info;

/// Run a full example check as configured.
///
/// A missing examples directory succeeds before any schema is loaded.
/// Otherwise the registry is built (fatal on a broken schema or when no
/// schema exists) and every example is validated.
pub fn check_examples(config: &ValidatorConfig) -> Result<RunSummary> {
    let examples_dir = config.examples_dir();
    let options = RunOptions {
        strict: config.validation.strict,
    };

    if !examples_dir.is_dir() {
        info!(path = %examples_dir.display(), "no examples directory, skipping validation");
        return Ok(RunSummary::new(
            RunResult::missing_examples_dir(&examples_dir, options),
            None,
        ));
    }

    let table = config.schema_table()?;
    let registry = SchemaRegistry::build(&table, &config.schemas_dir(), config.validation.draft)?;
    let result = ValidationRunner::new(&registry, options).run(&examples_dir)?;

    Ok(RunSummary::new(result, Some(&registry)))
}
