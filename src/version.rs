//! Schema versions carried in schema file names
//!
//! Schema files are named `<prefix>.v<major>.<minor>[.<patch>].schema.json`.
//! The version is informational: it appears in logs and JSON reports but
//! never affects routing.

use semver::Version;
use serde::{Serialize, Serializer};
use std::fmt;

/// Version of a schema family, parsed from its file name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchemaVersion {
    pub version: Version,
}

impl SchemaVersion {
    /// Parse a version string, accepting a leading `v` and a missing patch
    /// component (`v0.1` -> `0.1.0`).
    pub fn parse(version_str: &str) -> Result<Self, semver::Error> {
        let version_str = version_str.strip_prefix('v').unwrap_or(version_str);
        let padded = match version_str.matches('.').count() {
            0 => format!("{}.0.0", version_str),
            1 => format!("{}.0", version_str),
            _ => version_str.to_string(),
        };
        Ok(Self { version: Version::parse(&padded)? })
    }

    /// Extract the version from a schema file name such as
    /// `mrp.v0.1.schema.json`. Returns `None` when the name carries no
    /// `v<digits>` component.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let parts: Vec<&str> = file_name.split('.').collect();
        let start = parts.iter().position(|p| {
            p.len() > 1 && p.starts_with('v') && p[1..].chars().all(|c| c.is_ascii_digit())
        })?;

        let numeric: Vec<&str> = parts[start + 1..]
            .iter()
            .take(2)
            .take_while(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            .copied()
            .collect();

        let mut version_str = parts[start].to_string();
        for n in numeric {
            version_str.push('.');
            version_str.push_str(n);
        }
        Self::parse(&version_str).ok()
    }

    /// Get the tag string (e.g., "v1.2.3")
    pub fn tag_string(&self) -> String {
        format!("v{}", self.version)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_string())
    }
}

/// Serialized in tag form, matching what logs and text output show
impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_version() {
        let v = SchemaVersion::parse("v0.1").unwrap();
        assert_eq!(v.version, Version::new(0, 1, 0));
    }

    #[test]
    fn test_parse_full_version() {
        let v = SchemaVersion::parse("1.2.3").unwrap();
        assert_eq!(v.tag_string(), "v1.2.3");
    }

    #[test]
    fn test_from_file_name() {
        let v = SchemaVersion::from_file_name("mrp.v0.1.schema.json").unwrap();
        assert_eq!(v.version, Version::new(0, 1, 0));

        let v = SchemaVersion::from_file_name("accf.v2.schema.json").unwrap();
        assert_eq!(v.version, Version::new(2, 0, 0));

        let v = SchemaVersion::from_file_name("map.v1.4.2.schema.json").unwrap();
        assert_eq!(v.version, Version::new(1, 4, 2));
    }

    #[test]
    fn test_serializes_as_tag() {
        let v = SchemaVersion::from_file_name("mrp.v0.1.schema.json").unwrap();
        assert_eq!(serde_json::to_value(&v).unwrap(), "v0.1.0");
        assert_eq!(v.to_string(), "v0.1.0");
    }

    #[test]
    fn test_from_file_name_without_version() {
        assert!(SchemaVersion::from_file_name("mrp.schema.json").is_none());
        assert!(SchemaVersion::from_file_name("video.schema.json").is_none());
    }
}
