//! Schema Registry
//!
//! Maps schema family prefixes to compiled validators. The registry is
//! built once from a [`SchemaTable`] and is read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::config::SchemaDraft;
use crate::error::{Result, ValidatorError};
use crate::location::LocationPath;
use crate::prefix::Prefix;
use crate::version::SchemaVersion;

/// One prefix -> schema file entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistration {
    pub prefix: Prefix,
    pub schema_file: String,
}

/// The fixed table of known schema families.
///
/// Holds at most one schema file per prefix; prefixes are lowercased on
/// the way in.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    entries: BTreeMap<Prefix, String>,
}

impl SchemaTable {
    pub fn new<P, F>(entries: impl IntoIterator<Item = (P, F)>) -> Result<Self>
    where
        P: AsRef<str>,
        F: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (prefix, file) in entries {
            let raw = prefix.as_ref();
            if raw.is_empty() || raw.contains('.') {
                return Err(ValidatorError::InvalidPrefix(raw.to_string()));
            }
            let prefix = Prefix::new(raw);
            if table.insert(prefix.clone(), file.into()).is_some() {
                return Err(ValidatorError::DuplicatePrefix(prefix.to_string()));
            }
        }
        Ok(Self { entries: table })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registrations in prefix order
    pub fn registrations(&self) -> impl Iterator<Item = SchemaRegistration> + '_ {
        self.entries.iter().map(|(prefix, file)| SchemaRegistration {
            prefix: prefix.clone(),
            schema_file: file.clone(),
        })
    }
}

/// One schema-constraint violation in one example
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ValidationIssue {
    pub location: LocationPath,
    pub message: String,
}

/// A schema ready to validate examples, plus what we know about its file
pub struct CompiledValidator {
    prefix: Prefix,
    path: PathBuf,
    checksum: Checksum,
    version: Option<SchemaVersion>,
    schema: JSONSchema,
}

impl CompiledValidator {
    /// Read, parse and compile the schema at `path`
    pub fn load(prefix: Prefix, path: &Path, draft: SchemaDraft) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| ValidatorError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        let content: Value = serde_json::from_slice(&bytes).map_err(|source| {
            ValidatorError::SchemaParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let schema = JSONSchema::options()
            .with_draft(draft.into())
            .compile(&content)
            .map_err(|e| ValidatorError::SchemaCompile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let version = path
            .file_name()
            .and_then(|name| SchemaVersion::from_file_name(&name.to_string_lossy()));

        Ok(Self {
            prefix,
            path: path.to_path_buf(),
            checksum: Checksum::from_bytes(&bytes),
            version,
            schema,
        })
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn version(&self) -> Option<&SchemaVersion> {
        self.version.as_ref()
    }

    /// Validate an instance, returning every violation sorted by location
    /// (then message).
    pub fn validate(&self, instance: &Value) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> = match self.schema.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| ValidationIssue {
                    location: LocationPath::from(&error.instance_path),
                    message: error.to_string(),
                })
                .collect(),
        };
        issues.sort();
        issues
    }
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("prefix", &self.prefix)
            .field("path", &self.path)
            .field("checksum", &self.checksum)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Prefix -> compiled validator, for the schema files that exist
#[derive(Debug)]
pub struct SchemaRegistry {
    schema_dir: PathBuf,
    validators: BTreeMap<Prefix, CompiledValidator>,
}

impl SchemaRegistry {
    /// Compile every schema in `table` found under `schema_dir`.
    ///
    /// Missing files are skipped. A file that exists but cannot be read,
    /// parsed or compiled fails the whole build.
    pub fn build(table: &SchemaTable, schema_dir: &Path, draft: SchemaDraft) -> Result<Self> {
        let mut validators = BTreeMap::new();

        for registration in table.registrations() {
            let schema_path = schema_dir.join(&registration.schema_file);
            if !schema_path.is_file() {
                debug!(
                    prefix = %registration.prefix,
                    path = %schema_path.display(),
                    "schema not present, skipping prefix"
                );
                continue;
            }

            let validator =
                CompiledValidator::load(registration.prefix.clone(), &schema_path, draft)?;
            let version = validator
                .version()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unversioned".to_string());
            info!(
                prefix = %registration.prefix,
                version = %version,
                checksum = validator.checksum().short(),
                "loaded schema"
            );
            validators.insert(registration.prefix, validator);
        }

        Ok(Self {
            schema_dir: schema_dir.to_path_buf(),
            validators,
        })
    }

    /// Directory the schemas were looked up in
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Get the validator registered for a prefix
    pub fn get(&self, prefix: &Prefix) -> Option<&CompiledValidator> {
        self.validators.get(prefix)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Registered prefixes, sorted
    pub fn prefixes(&self) -> impl Iterator<Item = &Prefix> {
        self.validators.keys()
    }

    /// Loaded validators in prefix order
    pub fn validators(&self) -> impl Iterator<Item = &CompiledValidator> {
        self.validators.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_schema(dir: &Path, name: &str, schema: &Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(schema).unwrap()).unwrap();
    }

    fn table() -> SchemaTable {
        SchemaTable::new([
            ("mrp", "mrp.v0.1.schema.json"),
            ("map", "map.v0.1.schema.json"),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_rejects_duplicate_prefix() {
        let result = SchemaTable::new([("mrp", "a.json"), ("MRP", "b.json")]);
        assert!(matches!(result, Err(ValidatorError::DuplicatePrefix(p)) if p == "mrp"));
    }

    #[test]
    fn test_table_rejects_dotted_prefix() {
        let result = SchemaTable::new([("mrp.v1", "a.json")]);
        assert!(matches!(result, Err(ValidatorError::InvalidPrefix(_))));
    }

    #[test]
    fn test_build_skips_missing_schemas() {
        let dir = tempdir().unwrap();
        write_schema(dir.path(), "mrp.v0.1.schema.json", &json!({"type": "object"}));

        let registry = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&Prefix::new("mrp")).is_some());
        assert!(registry.get(&Prefix::new("map")).is_none());
    }

    #[test]
    fn test_build_empty_when_no_schemas() {
        let dir = tempdir().unwrap();
        let registry = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_schema_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mrp.v0.1.schema.json"), "{ not json").unwrap();

        let result = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default());
        assert!(matches!(result, Err(ValidatorError::SchemaParse { .. })));
    }

    #[test]
    fn test_uncompilable_schema_is_fatal() {
        let dir = tempdir().unwrap();
        write_schema(dir.path(), "mrp.v0.1.schema.json", &json!({"type": 12}));

        let result = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default());
        assert!(matches!(result, Err(ValidatorError::SchemaCompile { .. })));
    }

    #[test]
    fn test_validator_metadata() {
        let dir = tempdir().unwrap();
        write_schema(dir.path(), "mrp.v0.1.schema.json", &json!({"type": "object"}));

        let registry = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default()).unwrap();
        let validator = registry.get(&Prefix::new("mrp")).unwrap();
        assert_eq!(validator.version().unwrap().tag_string(), "v0.1.0");
        assert_eq!(validator.checksum().as_str().len(), 64);
    }

    #[test]
    fn test_validate_sorts_issues() {
        let dir = tempdir().unwrap();
        write_schema(
            dir.path(),
            "mrp.v0.1.schema.json",
            &json!({
                "type": "object",
                "required": ["id"],
                "properties": {
                    "b": {"type": "string"},
                    "a": {"type": "string"}
                }
            }),
        );

        let registry = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default()).unwrap();
        let validator = registry.get(&Prefix::new("mrp")).unwrap();
        let issues = validator.validate(&json!({"b": 1, "a": 2}));

        let locations: Vec<String> = issues.iter().map(|i| i.location.to_string()).collect();
        assert_eq!(locations, vec!["$", "$.a", "$.b"]);
        assert!(issues[0].message.contains("\"id\""));
    }

    #[test]
    fn test_validate_valid_instance() {
        let dir = tempdir().unwrap();
        write_schema(dir.path(), "mrp.v0.1.schema.json", &json!({"type": "object"}));

        let registry = SchemaRegistry::build(&table(), dir.path(), SchemaDraft::default()).unwrap();
        let validator = registry.get(&Prefix::new("mrp")).unwrap();
        assert!(validator.validate(&json!({})).is_empty());
    }
}
