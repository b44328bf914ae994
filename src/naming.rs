//! Centralized naming conventions for figgen-generated identifiers.
//!
//! Every user-supplied name ends up as a Python identifier in the generated
//! script, so names are sanitized when the request is constructed, never at
//! emission time.
//!
//! # Namespaces
//!
//! - **Axes**: bound to a subplot variable (`axes_<name>`)
//! - **Plot**: never bound to a variable, used as-is (`<name>`)
//! - **Data**: bound to a list literal (`data_<name>`)
//!
//! Sanitizing replaces every `-` with `_`, prepends the namespace prefix, and
//! then requires the *prefixed* text to be a legal, non-reserved identifier.

use const_format::concatcp;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::{FiggenError, Result};

// ============================================================================
// Base Building Blocks
// ============================================================================

/// Separator between a namespace and the user's name
const SEPARATOR: &str = "_";

/// Prefix for axes variables: `axes_`
pub const AXES_PREFIX: &str = concatcp!("axes", SEPARATOR);

/// Prefix for data variables: `data_`
pub const DATA_PREFIX: &str = concatcp!("data", SEPARATOR);

/// Identifier grammar of the generated language (ASCII subset of Python's).
static IDENTIFIER_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$"));

/// Hard keywords of Python 3. Soft keywords (`match`, `case`, `type`, `_`)
/// are legal identifiers and are deliberately absent.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

// ============================================================================
// Identifier Types
// ============================================================================

/// Entity category a name belongs to, deciding its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Axes,
    Plot,
    Data,
}

impl Namespace {
    /// Prefix prepended before the identifier check
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::Axes => AXES_PREFIX,
            Namespace::Plot => "",
            Namespace::Data => DATA_PREFIX,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Namespace::Axes => "axes",
            Namespace::Plot => "plot",
            Namespace::Data => "data",
        };
        write!(f, "{}", s)
    }
}

/// A user-supplied name together with its sanitized source identifier.
///
/// Equality and hashing consider both forms; cross-references should be
/// resolved through [`Identifier::code`], since two different raw names
/// (`"a-b"`, `"a_b"`) can produce the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    raw: String,
    code: String,
}

impl Identifier {
    /// The name exactly as the request spelled it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The identifier emitted into generated code
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

// ============================================================================
// Constructor Functions
// ============================================================================

/// Sanitize a raw name into an identifier of the given namespace.
///
/// # Example
/// ```
/// use figgen::naming::{sanitize, Namespace};
/// let id = sanitize("my-axes", Namespace::Axes).unwrap();
/// assert_eq!(id.code(), "axes_my_axes");
/// assert_eq!(id.raw(), "my-axes");
/// assert!(sanitize("class", Namespace::Plot).is_err());
/// ```
pub fn sanitize(raw: &str, namespace: Namespace) -> Result<Identifier> {
    if raw.is_empty() {
        return Err(FiggenError::UnsafeIdentifier(raw.to_string()));
    }

    let code = format!("{}{}", namespace.prefix(), raw.replace('-', SEPARATOR));
    if !is_identifier(&code)? || is_reserved(&code) {
        return Err(FiggenError::UnsafeIdentifier(raw.to_string()));
    }

    Ok(Identifier {
        raw: raw.to_string(),
        code,
    })
}

/// Sanitize an axes name: `axes_<name>`
pub fn axes_identifier(raw: &str) -> Result<Identifier> {
    sanitize(raw, Namespace::Axes)
}

/// Sanitize a plot name (no prefix)
pub fn plot_identifier(raw: &str) -> Result<Identifier> {
    sanitize(raw, Namespace::Plot)
}

/// Sanitize a data name: `data_<name>`
pub fn data_identifier(raw: &str) -> Result<Identifier> {
    sanitize(raw, Namespace::Data)
}

// ============================================================================
// Detection Functions
// ============================================================================

/// Check whether text matches the identifier grammar
pub fn is_identifier(text: &str) -> Result<bool> {
    let pattern = IDENTIFIER_PATTERN
        .as_ref()
        .map_err(|e| FiggenError::InternalError(format!("Regex error: {}", e)))?;
    Ok(pattern.is_match(text))
}

/// Check whether text is a reserved keyword of the generated language
pub fn is_reserved(text: &str) -> bool {
    RESERVED_KEYWORDS.contains(&text)
}
