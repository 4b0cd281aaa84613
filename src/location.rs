//! Locations of validation errors inside an example document

use std::fmt;

use jsonschema::paths::{JSONPointer, PathChunk};
use serde::{Serialize, Serializer};

/// One accessor step from a document's root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Array index
    Index(usize),
    /// Object property
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

/// Ordered accessors from the document root to the offending value.
///
/// Orders lexicographically by segment, so a parent sorts before its
/// children and the root sorts first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationPath(Vec<PathSegment>);

impl LocationPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Append a segment, builder style
    pub fn push(mut self, segment: PathSegment) -> Self {
        self.0.push(segment);
        self
    }
}

impl From<&JSONPointer> for LocationPath {
    fn from(pointer: &JSONPointer) -> Self {
        let segments = pointer
            .into_iter()
            .map(|chunk| match chunk {
                PathChunk::Index(i) => PathSegment::Index(*i),
                PathChunk::Property(name) => PathSegment::Key(name.to_string()),
                PathChunk::Keyword(keyword) => PathSegment::Key((*keyword).to_string()),
            })
            .collect();
        Self(segments)
    }
}

/// Renders as `$`, `$.id`, `$.items.0.name`
impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for LocationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    #[test]
    fn test_root_display() {
        assert_eq!(LocationPath::root().to_string(), "$");
    }

    #[test]
    fn test_nested_display() {
        let path = LocationPath::root()
            .push(key("items"))
            .push(PathSegment::Index(0))
            .push(key("name"));
        assert_eq!(path.to_string(), "$.items.0.name");
    }

    #[test]
    fn test_ordering() {
        let root = LocationPath::root();
        let a = LocationPath::new(vec![key("a")]);
        let a_b = LocationPath::new(vec![key("a"), key("b")]);
        let b = LocationPath::new(vec![key("b")]);
        let idx = LocationPath::new(vec![PathSegment::Index(3)]);

        let mut paths = vec![b.clone(), a_b.clone(), root.clone(), a.clone(), idx.clone()];
        paths.sort();
        assert_eq!(paths, vec![root, idx, a, a_b, b]);
    }

    #[test]
    fn test_index_ordering_is_numeric() {
        let two = LocationPath::new(vec![PathSegment::Index(2)]);
        let ten = LocationPath::new(vec![PathSegment::Index(10)]);
        assert!(two < ten);
    }
}
