//! Axes: one subplot slot hosting zero or more plots

use serde::Serialize;
use serde_json::Value;

use super::decode::Decoder;
use crate::naming::{Identifier, Namespace};
use crate::report::Location;

/// Axes-level style. Only carries a debug label today.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AxesStyle {
    pub style_name: Option<String>,
}

impl AxesStyle {
    fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["style_name"], |d, f| {
            let style_name = f.optional(d, "style_name", |d, v, at| d.string(v, at));
            Some(AxesStyle {
                style_name: style_name?,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    name: Identifier,
    plot_refs: Vec<Identifier>,
    style: AxesStyle,
}

impl Axes {
    pub(crate) fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["name", "plot", "style"], |d, f| {
            let name = f.required(d, "name", |d, v, at| d.identifier(v, at, Namespace::Axes));
            let plot_refs = f.required(d, "plot", |d, v, at| {
                d.list(v, at, |d, item, at| d.identifier(item, at, Namespace::Plot))
            });
            let style = f
                .optional(d, "style", AxesStyle::decode)
                .map(Option::unwrap_or_default);
            Some(Axes {
                name: name?,
                plot_refs: plot_refs?,
                style: style?,
            })
        })
    }

    /// Sanitized `axes_<name>` identifier
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    /// Plots this axes invokes, in declaration order
    pub fn plot_refs(&self) -> &[Identifier] {
        &self.plot_refs
    }

    pub fn style(&self) -> &AxesStyle {
        &self.style
    }

    /// Whether this axes invokes the plot with the given identifier
    pub fn invokes(&self, plot: &Identifier) -> bool {
        self.plot_refs.iter().any(|p| p.code() == plot.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_axes_decode() {
        let mut d = Decoder::new();
        let axes = Axes::decode(
            &mut d,
            &json!({"name": "left-axes", "plot": ["p1", "p-2"], "style": {"style_name": null}}),
            &Location::root().key("axes").index(0),
        )
        .unwrap();
        assert!(d.failures().is_empty());
        assert_eq!(axes.name().code(), "axes_left_axes");
        let refs: Vec<&str> = axes.plot_refs().iter().map(|p| p.code()).collect();
        assert_eq!(refs, vec!["p1", "p_2"]);
        assert_eq!(axes.style(), &AxesStyle::default());
    }

    #[test]
    fn test_axes_requires_name_and_plot() {
        let mut d = Decoder::new();
        let axes = Axes::decode(&mut d, &json!({}), &Location::root().key("axes").index(3));
        assert!(axes.is_none());
        let locations: Vec<String> = d.failures().iter().map(|f| f.location.to_string()).collect();
        assert_eq!(locations, vec!["request.axes[3].name", "request.axes[3].plot"]);
    }

    #[test]
    fn test_axes_rejects_unsafe_plot_ref() {
        let mut d = Decoder::new();
        let axes = Axes::decode(
            &mut d,
            &json!({"name": "a", "plot": ["fine", "for"]}),
            &Location::root().key("axes").index(0),
        );
        assert!(axes.is_none());
        assert_eq!(d.failures()[0].location.to_string(), "request.axes[0].plot[1]");
    }

    #[test]
    fn test_invokes_compares_identifiers() {
        let mut d = Decoder::new();
        let axes = Axes::decode(
            &mut d,
            &json!({"name": "a", "plot": ["my-plot"]}),
            &Location::root(),
        )
        .unwrap();
        let plot = crate::naming::plot_identifier("my_plot").unwrap();
        assert!(axes.invokes(&plot));
    }
}
