//! Plot: one rendering instruction (relation + data references + style)
//!
//! Relations form a closed set. Each [`PlotData`] variant owns its field set
//! and its argument rendering; new relations are added as new variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::decode::{optional_choice, Decoder};
use crate::naming::{Identifier, Namespace};
use crate::report::Location;

/// Discriminator field of the plot data payload
pub const RELATION_TAG: &str = "relation";

// =============================================================================
// Plot Data
// =============================================================================

/// Data payload of a plot, keyed by its relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "relation", rename_all = "lowercase")]
pub enum PlotData {
    /// Two-series line plot: `axes.plot(x, y)`
    Plot { x: Identifier, y: Identifier },
}

impl PlotData {
    /// Every supported relation tag
    pub const RELATIONS: &'static [&'static str] = &["plot"];

    /// Method name invoked on the axes
    pub fn relation(&self) -> &'static str {
        match self {
            PlotData::Plot { .. } => "plot",
        }
    }

    /// Data references in field declaration order, as `(field, data)`
    pub fn references(&self) -> Vec<(&'static str, &Identifier)> {
        match self {
            PlotData::Plot { x, y } => vec![("x", x), ("y", y)],
        }
    }

    /// Leading call arguments: bare data identifiers in field order
    pub fn arguments(&self) -> Vec<String> {
        match self {
            PlotData::Plot { x, y } => vec![x.code().to_string(), y.code().to_string()],
        }
    }

    fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        let Some(map) = value.as_object() else {
            d.shape(at, "Input should be a valid dictionary");
            return None;
        };

        let Some(tag) = map.get(RELATION_TAG).and_then(Value::as_str) else {
            d.shape(
                at,
                format!("Unable to extract tag using discriminator '{}'", RELATION_TAG),
            );
            return None;
        };

        match tag {
            "plot" => d.object(value, at, &[RELATION_TAG, "x", "y"], |d, f| {
                let x = f.required(d, "x", |d, v, at| d.identifier(v, at, Namespace::Data));
                let y = f.required(d, "y", |d, v, at| d.identifier(v, at, Namespace::Data));
                Some(PlotData::Plot { x: x?, y: y? })
            }),
            other => {
                let expected: Vec<String> =
                    Self::RELATIONS.iter().map(|r| format!("'{}'", r)).collect();
                d.shape(
                    at,
                    format!(
                        "Input tag '{}' found using '{}' does not match any of the expected tags: {}",
                        other,
                        RELATION_TAG,
                        expected.join(", ")
                    ),
                );
                None
            }
        }
    }
}

// =============================================================================
// Plot Style
// =============================================================================

/// Matplotlib line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dashdot,
    Dotted,
    None,
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dashdot => "dashdot",
            LineStyle::Dotted => "dotted",
            LineStyle::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// Single-quoted Python string literal
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlotStyle {
    /// Debug label, never rendered
    pub style_name: Option<String>,
    pub linestyle: LineStyle,
}

impl PlotStyle {
    /// Keyword arguments as `(name, python literal)` in field declaration
    /// order, excluding debug fields
    pub fn render_options(&self) -> Vec<(&'static str, String)> {
        vec![("linestyle", quote(&self.linestyle.to_string()))]
    }

    fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["style_name", "linestyle"], |d, f| {
            let style_name = f.optional(d, "style_name", |d, v, at| d.string(v, at));
            let linestyle = optional_choice::<LineStyle>(f, d, "linestyle");
            Some(PlotStyle {
                style_name: style_name?,
                linestyle: linestyle?,
            })
        })
    }
}

// =============================================================================
// Plot
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot {
    name: Identifier,
    data: PlotData,
    style: PlotStyle,
}

impl Plot {
    pub(crate) fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["name", "data", "style"], |d, f| {
            let name = f.required(d, "name", |d, v, at| d.identifier(v, at, Namespace::Plot));
            let data = f.required(d, "data", PlotData::decode);
            let style = f
                .optional(d, "style", PlotStyle::decode)
                .map(Option::unwrap_or_default);
            Some(Plot {
                name: name?,
                data: data?,
                style: style?,
            })
        })
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn data(&self) -> &PlotData {
        &self.data
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Call expression without its receiver, e.g.
    /// `plot(data_x, data_y, linestyle='solid')`
    pub fn call(&self) -> String {
        let mut arguments = self.data.arguments();
        arguments.extend(
            self.style
                .render_options()
                .into_iter()
                .map(|(name, value)| format!("{}={}", name, value)),
        );
        format!("{}({})", self.data.relation(), arguments.join(", "))
    }
}
