//! Matplotlib (pyplot) code writer
//!
//! Lowers a validated request into a Python script in four labeled blocks:
//!
//! 1. **Figure**: `fig, axes = plt.subplots(row, column, squeeze=False)`
//! 2. **Axes**: `axes_a = axes[0][1]` for every declared axes
//! 3. **Data**: `data_x = [1, 2.5]` for every declared series
//! 4. **Plot**: `axes_a.plot(data_x, data_y, linestyle='solid')` for every
//!    (plot, invoking axes) pair
//!
//! Axes without a grid cell, and plot calls targeting them, are emitted as
//! disabled comment lines instead of being dropped. Plots no axes invokes
//! produce no lines.
//!
//! The blocks sit between a fixed import header and a fixed render footer,
//! either flat (`procedure`) or wrapped in a function returning the figure
//! (`function`).

use crate::index::RequestIndex;
use crate::naming::Identifier;
use crate::request::{CodeShape, FigureStyle, IndentStyle, Request};
use crate::validate::Validated;
use crate::writer::{GeneratedCode, Writer};
use crate::Result;

/// Import lines opening every script
pub const CODE_HEADER: [&str; 2] = ["import numpy as np", "import matplotlib.pyplot as plt"];

/// Render lines closing every script
pub const CODE_FOOTER: [&str; 1] = ["fig.savefig(\"figure.png\")"];

/// Name of the wrapper for the `function` code shape
pub const ENTRY_FUNCTION: &str = "draw_figure";

/// Overrides for the figure's own style settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    pub shape: Option<CodeShape>,
    pub indent: Option<IndentStyle>,
}

impl WriterOptions {
    fn resolve(&self, style: &FigureStyle) -> (CodeShape, IndentStyle) {
        (
            self.shape.unwrap_or(style.shape),
            self.indent.unwrap_or(style.indent),
        )
    }
}

/// Python/matplotlib code writer
#[derive(Debug, Clone, Default)]
pub struct PyplotWriter {
    options: WriterOptions,
}

impl PyplotWriter {
    /// Create a writer that follows each request's figure style
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Force a code shape regardless of the request
    pub fn with_shape(mut self, shape: CodeShape) -> Self {
        self.options.shape = Some(shape);
        self
    }

    /// Force an indentation style regardless of the request
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.options.indent = Some(indent);
        self
    }

    fn figure_lines(&self, request: &Request) -> Vec<String> {
        let size = request.figure().size();
        vec![format!(
            "fig, axes = plt.subplots({}, {}, squeeze=False)",
            size.row, size.column
        )]
    }

    fn axes_lines(&self, request: &Request, index: &RequestIndex<'_>) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(request.axes().len());
        for axes in request.axes() {
            let name = axes.name();
            match index.position(name)? {
                Some(position) => lines.push(format!(
                    "{} = axes[{}][{}]",
                    name, position.row, position.column
                )),
                None => lines.push(disabled(&format!("{} = axes[?][?]", name), name)),
            }
        }
        Ok(lines)
    }

    fn data_lines(&self, request: &Request) -> Vec<String> {
        request
            .data()
            .iter()
            .map(|data| format!("{} = {}", data.name(), format_values(data.value())))
            .collect()
    }

    fn plot_lines(&self, request: &Request, index: &RequestIndex<'_>) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for plot in request.plots() {
            let call = plot.call();
            for axes in index.axes_for_plot(plot.name())? {
                let line = format!("{}.{}", axes, call);
                if index.position(axes)?.is_some() {
                    lines.push(line);
                } else {
                    lines.push(disabled(&line, axes));
                }
            }
        }
        Ok(lines)
    }

    /// The four labeled blocks, each followed by a blank line
    fn body_lines(&self, request: &Request, index: &RequestIndex<'_>) -> Result<Vec<String>> {
        let blocks = [
            ("Figure", self.figure_lines(request)),
            ("Axes", self.axes_lines(request, index)?),
            ("Data", self.data_lines(request)),
            ("Plot", self.plot_lines(request, index)?),
        ];

        let mut lines = Vec::new();
        for (title, block) in blocks {
            lines.push(format!("# {} Definition", title));
            lines.extend(block);
            lines.push(String::new());
        }
        Ok(lines)
    }

    fn merge_as_procedure(&self, body: Vec<String>) -> Vec<String> {
        let mut lines: Vec<String> = CODE_HEADER.iter().map(|s| s.to_string()).collect();
        lines.push(String::new());
        lines.extend(body);
        lines.push("# Render".to_string());
        lines.extend(CODE_FOOTER.iter().map(|s| s.to_string()));
        lines
    }

    fn merge_as_function(&self, body: Vec<String>, indent: IndentStyle) -> Vec<String> {
        let mut lines: Vec<String> = CODE_HEADER.iter().map(|s| s.to_string()).collect();
        lines.push(String::new());
        lines.push(String::new());
        lines.push(format!("def {}():", ENTRY_FUNCTION));
        lines.extend(apply_indent(&body, 1, indent));
        lines.extend(apply_indent(&["return fig".to_string()], 1, indent));
        lines.push(String::new());
        lines.push(String::new());
        lines.push("# Render".to_string());
        lines.push(format!("fig = {}()", ENTRY_FUNCTION));
        lines.extend(CODE_FOOTER.iter().map(|s| s.to_string()));
        lines
    }
}

impl Writer for PyplotWriter {
    type Output = GeneratedCode;

    fn write(&self, validated: &Validated) -> Result<GeneratedCode> {
        let request = validated.request();
        let (shape, indent) = self.options.resolve(request.figure().style());
        let index = RequestIndex::build(request);

        let body = self.body_lines(request, &index)?;
        let lines = match shape {
            CodeShape::Procedure => self.merge_as_procedure(body),
            CodeShape::Function => self.merge_as_function(body, indent),
        };

        tracing::debug!(
            request_id = %request.request_id(),
            %shape,
            %indent,
            lines = lines.len(),
            "generated pyplot code"
        );

        Ok(GeneratedCode::new(lines))
    }
}

/// Comment out a line whose target axes has no grid cell
fn disabled(line: &str, axes: &Identifier) -> String {
    format!("# {} # {} is not assigned into any subplot", line, axes)
}

/// Python list literal of a numeric series, e.g. `[1, 2.5]`
fn format_values(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().copied().map(format_number).collect();
    format!("[{}]", items.join(", "))
}

/// Shortest round-trip form, switching to exponent notation for decimal
/// exponents outside `-4..16` the way Python's float repr does
fn format_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..16).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

fn apply_indent(lines: &[String], level: usize, style: IndentStyle) -> Vec<String> {
    let prefix = style.unit().repeat(level);
    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect()
}

/// Indent code lines by `level` units of the given style.
///
/// `style` is `"space"` (four spaces per level) or `"tab"`; empty lines stay
/// empty.
///
/// # Errors
///
/// Returns `FiggenError::IndentationError` for any other style token.
///
/// # Example
/// ```
/// use figgen::writer::indent_lines;
/// let lines = vec!["a = 3 + 4".to_string(), "b = a + 7".to_string()];
/// assert_eq!(
///     indent_lines(&lines, 1, "space").unwrap(),
///     vec!["    a = 3 + 4", "    b = a + 7"]
/// );
/// assert!(indent_lines(&lines, 1, "tabs").is_err());
/// ```
pub fn indent_lines(lines: &[String], level: usize, style: &str) -> Result<Vec<String>> {
    let style: IndentStyle = style.parse()?;
    Ok(apply_indent(lines, level, style))
}
