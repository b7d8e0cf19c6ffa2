//! Path type used to address entries of an AttrTree.
//!
//! Example dotted path: "Example.Path1"  =>  Path(vec!["Example", "Path1"])
//!
//! Segments are validated on construction and the type derives ordering so it
//! can be used in BTreeSet/Map as well as IndexMap.

use crate::Result;
use crate::error::Error;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const SEGMENT_RE: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEGMENT_RE).expect("segment regex is valid"));

/// Check that `segment` can name a node in a tree.
pub fn validate_segment(segment: &str) -> Result<()> {
    if SEGMENT.is_match(segment) {
        Ok(())
    } else {
        Err(Error::InvalidSegment {
            segment: segment.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Path(Vec<String>);

impl Path {
    /// Build a path from already-split segments. Fails on an empty list or a
    /// segment that is not a valid name.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::EmptyPath);
        }
        for s in &segments {
            validate_segment(s)?;
        }
        Ok(Self(segments))
    }

    /// Single-segment path.
    pub fn single(name: &str) -> Result<Self> {
        validate_segment(name)?;
        Ok(Self(vec![name.to_string()]))
    }

    /// Caller guarantees `segments` is non-empty and every segment is valid.
    pub(crate) fn from_validated(segments: &[String]) -> Self {
        debug_assert!(!segments.is_empty());
        Self(segments.to_vec())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First segment.
    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Last segment.
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Extend this path by one validated segment.
    pub fn child(&self, name: &str) -> Result<Self> {
        validate_segment(name)?;
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(Self(segments))
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for Path {
    type Err = Error;

    /// Parse "A.B.C" into Path(vec!["A", "B", "C"]).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::EmptyPath);
        }
        Self::from_segments(s.split('.'))
    }
}

impl TryFrom<Vec<String>> for Path {
    type Error = Error;

    fn try_from(segments: Vec<String>) -> Result<Self> {
        Self::from_segments(segments)
    }
}

impl From<Path> for Vec<String> {
    fn from(path: Path) -> Self {
        path.0
    }
}
