//! Structured, human-readable validation reports.
//!
//! Low-level [`Failure`]s carry a typed [`Location`] and a [`FailureKind`].
//! The reporter renders them into an ordered list of `{location, message}`
//! pairs, which is the only user-visible artifact of a rejected request.
//!
//! Locations are rendered from the request root: string keys append
//! `.key`, indices append `[index]`, e.g. `request.figure.axes[0][1]`.

use serde::Serialize;
use std::fmt;

/// Name of the root segment in every rendered location
pub const ROOT: &str = "request";

// ============================================================================
// Locations
// ============================================================================

/// One step into the request payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Structural position of a value inside the request payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    segments: Vec<PathSegment>,
}

impl Location {
    /// The request itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Child location under an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Child location under a list index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ROOT)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Failures
// ============================================================================

/// Error taxonomy for rejected requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Wrong type, missing or unknown field, bound or closed-set violation
    Shape,
    /// Name does not sanitize into a legal, non-reserved identifier
    Identifier,
    /// Grid cell, axes or plot names an entity that does not exist
    Reference,
    /// Duplicate names within one entity list
    Uniqueness,
    /// Figure grid does not match its declared size
    Dimension,
    /// Same axes placed in more than one grid cell
    Placement,
}

/// A single low-level validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub location: Location,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// One user-facing entry of an [`ErrorReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    #[serde(skip)]
    pub kind: FailureKind,
    pub location: String,
    pub message: String,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Ordered list of causes for a rejected request.
///
/// Preserves discovery order and never merges entries, even when two
/// locations share the same message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    causes: Vec<Cause>,
}

impl ErrorReport {
    /// Render a batch of failures in discovery order
    pub fn from_failures(failures: Vec<Failure>) -> Self {
        let causes = failures
            .into_iter()
            .map(|failure| Cause {
                kind: failure.kind,
                location: failure.location.to_string(),
                message: failure.message,
            })
            .collect();
        Self { causes }
    }

    /// Report with a single entry
    pub fn single(kind: FailureKind, location: &Location, message: impl Into<String>) -> Self {
        Self {
            causes: vec![Cause {
                kind,
                location: location.to_string(),
                message: message.into(),
            }],
        }
    }

    pub fn causes(&self) -> &[Cause] {
        &self.causes
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cause> {
        self.causes.iter()
    }

    /// Serialize as a JSON array of `{"location", "message"}` objects
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.causes)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cause) in self.causes.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

impl IntoIterator for ErrorReport {
    type Item = Cause;
    type IntoIter = std::vec::IntoIter<Cause>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a Cause;
    type IntoIter = std::slice::Iter<'a, Cause>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.iter()
    }
}
