//! Schema family prefixes
//!
//! An example is routed by the start of its filename: `mrp.sample.json`
//! belongs to the `mrp` family. Routing never looks at file content.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Lowercase token naming a schema family
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    /// Build a prefix from a token, lowercasing it
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().to_lowercase())
    }

    /// Derive the prefix of an example file from its filename.
    ///
    /// The filename is lowercased and cut at the first `.`; a name with no
    /// `.` is its own prefix. Returns `None` for paths with no filename.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        let token = name.split('.').next().unwrap_or_default();
        Some(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mrp.sample.json", "mrp")]
    #[case("ACCF.Example.JSON", "accf")]
    #[case("examples/nested/map.v2.bad.json", "map")]
    #[case("noext", "noext")]
    #[case(".hidden.json", "")]
    fn test_prefix_from_path(#[case] path: &str, #[case] expected: &str) {
        let prefix = Prefix::from_path(Path::new(path)).unwrap();
        assert_eq!(prefix.as_str(), expected);
    }

    #[test]
    fn test_prefix_new_lowercases() {
        assert_eq!(Prefix::new("MIP"), Prefix::from("mip"));
    }
}
