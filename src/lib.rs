/*!
# figgen - Chart Descriptions to Matplotlib Code

Validates a JSON chart description and turns it into a Python/matplotlib
script.

## Example

```json
{
  "request_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
  "figure": {"size": {"row": 1, "column": 2}, "axes": [["a", null]]},
  "axes": [{"name": "a", "plot": ["p"]}],
  "plot": [{"name": "p", "data": {"relation": "plot", "x": "x", "y": "y"}}],
  "data": [{"name": "x", "value": [1, 2]}, {"name": "y", "value": [3, 4]}]
}
```

## Architecture

A request moves through three stages:
- **Construction** → every entity checks its own shape and sanitizes its names
- **Validation** → whole-request checks (uniqueness, grid shape, references)
- **Emission** → a writer lowers the validated request into code lines

Construction and validation collect every failure into an [`ErrorReport`]
instead of stopping at the first one.

## Core Components

- [`naming`] - Identifier sanitizing and namespace prefixes
- [`report`] - Failure locations and the error report
- [`request`] - Entity types and their construction
- [`index`] - Plot/axes lookup tables
- [`validate`] - Whole-request checks
- [`writer`] - Code writers (matplotlib)
*/

pub mod index;
pub mod naming;
pub mod report;
pub mod request;
pub mod validate;
pub mod writer;

// Re-export key types for convenience
pub use naming::{Identifier, Namespace};
pub use report::{Cause, ErrorReport, Location};
pub use request::{
    Axes, CodeShape, Data, Figure, FigureSize, IndentStyle, LineStyle, Plot, PlotData, Request,
};
pub use validate::{Validated, ValidationWarning};
pub use writer::{GeneratedCode, PyplotWriter, Writer, WriterOptions};

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum FiggenError {
    #[error("Validation error:\n{0}")]
    ValidationError(#[from] ErrorReport),

    #[error("Unsafe identifier: {0:?}")]
    UnsafeIdentifier(String),

    #[error("Invalid indentation style: {0}")]
    IndentationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FiggenError {
    /// The error report behind a validation failure, if any
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            FiggenError::ValidationError(report) => Some(report),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FiggenError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Construct a request from JSON text without cross-reference checks
pub fn parse(input: &str) -> std::result::Result<Request, ErrorReport> {
    Request::from_json(input)
}

/// Construct and validate a request from JSON text
pub fn validate(input: &str) -> std::result::Result<Validated, ErrorReport> {
    validate::validate_json(input)
}

/// Validate a request and emit matplotlib code using its own style settings
pub fn generate(input: &str) -> Result<GeneratedCode> {
    PyplotWriter::new().render(input)
}
