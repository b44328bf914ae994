//! Output writer abstraction layer for figgen
//!
//! The writer module provides a pluggable interface for generating plotting
//! source code from a validated chart description.
//!
//! # Architecture
//!
//! All writers implement the `Writer` trait, which provides:
//! - Validated request → Output conversion
//! - JSON text → Output convenience entry point
//!
//! # Example
//!
//! Without a `figure.style`, code is wrapped in `def draw_figure():` and the
//! body is indented by four spaces. `code_is_function: false` (or
//! [`PyplotWriter::with_shape`]) produces a flat script instead.
//!
//! ```rust
//! use figgen::writer::{PyplotWriter, Writer};
//! use figgen::CodeShape;
//!
//! let input = r#"{
//!     "request_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
//!     "figure": {"size": {"row": 1, "column": 1}, "axes": [["a"]]},
//!     "axes": [{"name": "a", "plot": []}],
//!     "plot": [],
//!     "data": []
//! }"#;
//!
//! let code = PyplotWriter::new().render(input).unwrap();
//! assert!(code.lines().iter().any(|line| line == "def draw_figure():"));
//! assert!(code.lines().iter().any(|line| line == "    axes_a = axes[0][0]"));
//!
//! let flat = PyplotWriter::new()
//!     .with_shape(CodeShape::Procedure)
//!     .render(input)
//!     .unwrap();
//! assert!(flat.lines().iter().any(|line| line == "axes_a = axes[0][0]"));
//! ```

use serde::Serialize;
use std::fmt;

use crate::validate::{self, Validated};
use crate::Result;

pub mod pyplot;

pub use pyplot::{indent_lines, PyplotWriter, WriterOptions, CODE_FOOTER, CODE_HEADER};

/// Trait for code writers
///
/// Writers take a validated request and produce formatted output.
///
/// # Associated Types
///
/// * `Output` - The type returned by `write()` and `render()`.
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Generate output from a validated request
    ///
    /// # Errors
    ///
    /// Returns `FiggenError::InternalError` if the request's derived indices
    /// are inconsistent. Validated input never triggers this.
    fn write(&self, validated: &Validated) -> Result<Self::Output>;

    /// Construct, validate and write a JSON request in one step
    ///
    /// # Errors
    ///
    /// Returns `FiggenError::ValidationError` carrying the full report when
    /// the request is rejected; no partial output is produced.
    fn render(&self, input: &str) -> Result<Self::Output> {
        let validated = validate::validate_json(input)?;
        self.write(&validated)
    }
}

/// Ordered lines of generated source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    lines: Vec<String>,
}

impl GeneratedCode {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Newline-joined source, terminated by a final newline
    pub fn to_source(&self) -> String {
        let mut source = self.lines.join("\n");
        source.push('\n');
        source
    }
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source())
    }
}
