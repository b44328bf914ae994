//! Figure: the grid of axes slots and the code-style settings

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::decode::{optional_choice, Decoder};
use crate::naming::{Identifier, Namespace};
use crate::report::Location;
use crate::{FiggenError, Result};

/// Declared grid dimensions (both strictly positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FigureSize {
    pub row: usize,
    pub column: usize,
}

impl FigureSize {
    fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["row", "column"], |d, f| {
            let row = f.required(d, "row", |d, v, at| d.positive(v, at));
            let column = f.required(d, "column", |d, v, at| d.positive(v, at));
            Some(FigureSize {
                row: row?,
                column: column?,
            })
        })
    }
}

/// Indentation unit used for nested generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Four spaces per level
    #[default]
    Space,
    /// One tab per level
    Tab,
}

impl IndentStyle {
    /// Text of a single indentation level
    pub fn unit(&self) -> &'static str {
        match self {
            IndentStyle::Space => "    ",
            IndentStyle::Tab => "\t",
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndentStyle::Space => "space",
            IndentStyle::Tab => "tab",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for IndentStyle {
    type Err = FiggenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "space" => Ok(IndentStyle::Space),
            "tab" => Ok(IndentStyle::Tab),
            other => Err(FiggenError::IndentationError(other.to_string())),
        }
    }
}

/// Overall layout of the generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeShape {
    /// Flat script
    Procedure,
    /// Blocks wrapped in a callable that returns the figure
    #[default]
    Function,
}

impl CodeShape {
    fn from_flag(is_function: bool) -> Self {
        if is_function {
            CodeShape::Function
        } else {
            CodeShape::Procedure
        }
    }
}

impl fmt::Display for CodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodeShape::Procedure => "procedure",
            CodeShape::Function => "function",
        };
        write!(f, "{}", s)
    }
}

/// Figure-level style settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FigureStyle {
    /// Free-form label, kept for debugging and never rendered
    pub style_name: Option<String>,
    pub indent: IndentStyle,
    pub shape: CodeShape,
}

impl FigureStyle {
    fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(
            value,
            at,
            &["style_name", "code_indent_style", "code_is_function"],
            |d, f| {
                let style_name = f.optional(d, "style_name", |d, v, at| d.string(v, at));
                let indent = optional_choice::<IndentStyle>(f, d, "code_indent_style");
                let shape = f
                    .optional(d, "code_is_function", |d, v, at| d.leaf::<bool>(v, at))
                    .map(|flag| flag.map(CodeShape::from_flag).unwrap_or_default());
                Some(FigureStyle {
                    style_name: style_name?,
                    indent: indent?,
                    shape: shape?,
                })
            },
        )
    }
}

/// The chart container: a `row x column` grid of optional axes references.
///
/// The grid is kept exactly as submitted; whether its shape matches `size`
/// and whether its names resolve is checked by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    size: FigureSize,
    grid: Vec<Vec<Option<Identifier>>>,
    style: FigureStyle,
}

impl Figure {
    pub(crate) fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["size", "axes", "style"], |d, f| {
            let size = f.required(d, "size", FigureSize::decode);
            let grid = f.required(d, "axes", |d, v, at| {
                d.list(v, at, |d, row, at| {
                    d.list(row, at, |d, cell, at| match cell {
                        Value::Null => Some(None),
                        name => d.identifier(name, at, Namespace::Axes).map(Some),
                    })
                })
            });
            let style = f
                .optional(d, "style", FigureStyle::decode)
                .map(Option::unwrap_or_default);
            Some(Figure {
                size: size?,
                grid: grid?,
                style: style?,
            })
        })
    }

    pub fn size(&self) -> FigureSize {
        self.size
    }

    /// Grid rows as submitted (`None` = empty cell)
    pub fn grid(&self) -> &[Vec<Option<Identifier>>] {
        &self.grid
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    /// Non-empty cells in row-major order as `(row, column, axes)`
    pub fn placements(&self) -> impl Iterator<Item = (usize, usize, &Identifier)> {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(column, cell)| cell.as_ref().map(|axes| (row, column, axes)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> (Option<Figure>, Vec<(String, String)>) {
        let mut d = Decoder::new();
        let figure = Figure::decode(&mut d, &value, &Location::root().key("figure"));
        let failures = d
            .into_failures()
            .into_iter()
            .map(|f| (f.location.to_string(), f.message))
            .collect();
        (figure, failures)
    }

    #[test]
    fn test_figure_defaults() {
        let (figure, failures) = decode(json!({
            "size": {"row": 1, "column": 2},
            "axes": [["a", null]]
        }));
        assert!(failures.is_empty(), "{:?}", failures);
        let figure = figure.unwrap();
        assert_eq!(figure.size(), FigureSize { row: 1, column: 2 });
        assert_eq!(figure.style().indent, IndentStyle::Space);
        assert_eq!(figure.style().shape, CodeShape::Function);
        assert_eq!(figure.grid()[0][0].as_ref().unwrap().code(), "axes_a");
        assert!(figure.grid()[0][1].is_none());
    }

    #[test]
    fn test_figure_style_explicit() {
        let (figure, failures) = decode(json!({
            "size": {"row": 1, "column": 1},
            "axes": [[null]],
            "style": {"style_name": "debug", "code_indent_style": "tab", "code_is_function": false}
        }));
        assert!(failures.is_empty(), "{:?}", failures);
        let style = figure.unwrap().style().clone();
        assert_eq!(style.style_name.as_deref(), Some("debug"));
        assert_eq!(style.indent, IndentStyle::Tab);
        assert_eq!(style.shape, CodeShape::Procedure);
    }

    #[test]
    fn test_figure_collects_every_field_failure() {
        let (figure, failures) = decode(json!({
            "size": {"row": 0, "column": "2"},
            "axes": [["ok", 3, "bad name"]],
            "style": {"code_indent_style": "tabs"},
            "title": "extra"
        }));
        assert!(figure.is_none());
        let locations: Vec<&str> = failures.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "request.figure.size.row",
                "request.figure.size.column",
                "request.figure.axes[0][1]",
                "request.figure.axes[0][2]",
                "request.figure.style.code_indent_style",
                "request.figure.title",
            ]
        );
        assert_eq!(failures[0].1, "Input should be greater than 0");
        assert!(failures[2].1.contains("invalid type"));
        assert!(failures[3].1.starts_with("Unsafe identifier"));
        assert!(failures[4].1.contains("unknown variant `tabs`"));
        assert_eq!(failures[5].1, "Extra inputs are not permitted");
    }

    #[test]
    fn test_figure_size_integral_floats() {
        let (figure, failures) = decode(json!({
            "size": {"row": 1.0, "column": 0.0},
            "axes": [[]]
        }));
        assert!(figure.is_none());
        assert_eq!(
            failures,
            vec![(
                "request.figure.size.column".to_string(),
                "Input should be greater than 0".to_string()
            )]
        );

        let (figure, failures) = decode(json!({
            "size": {"row": 1.0, "column": 2.0},
            "axes": [["a", null]]
        }));
        assert!(failures.is_empty(), "{:?}", failures);
        assert_eq!(figure.unwrap().size(), FigureSize { row: 1, column: 2 });
    }

    #[test]
    fn test_placements_row_major() {
        let (figure, _) = decode(json!({
            "size": {"row": 2, "column": 2},
            "axes": [[null, "b"], ["c", "d"]]
        }));
        let figure = figure.unwrap();
        let cells: Vec<(usize, usize, &str)> = figure
            .placements()
            .map(|(r, c, id)| (r, c, id.raw()))
            .collect();
        assert_eq!(cells, vec![(0, 1, "b"), (1, 0, "c"), (1, 1, "d")]);
    }

    #[test]
    fn test_indent_style_from_str() {
        assert_eq!("space".parse::<IndentStyle>().unwrap(), IndentStyle::Space);
        assert_eq!("tab".parse::<IndentStyle>().unwrap(), IndentStyle::Tab);
        let err = "spaces".parse::<IndentStyle>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid indentation style: spaces");
    }
}
