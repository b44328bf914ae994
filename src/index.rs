//! Cross-reference lookup tables derived from a request.
//!
//! - `plot_to_axes`: plot identifier → axes identifiers invoking it, ordered
//!   by iterating plots first, then axes
//! - `axes_to_position`: axes identifier → first row-major grid cell naming
//!   it, or `None` when the axes is unplaced
//!
//! Both tables are built once and never mutated.

use std::collections::HashMap;

use crate::naming::Identifier;
use crate::request::Request;
use crate::{FiggenError, Result};

/// Cell of the figure grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct RequestIndex<'a> {
    plot_to_axes: HashMap<&'a str, Vec<&'a Identifier>>,
    axes_to_position: HashMap<&'a str, Option<GridPosition>>,
}

impl<'a> RequestIndex<'a> {
    pub fn build(request: &'a Request) -> Self {
        let mut plot_to_axes: HashMap<&'a str, Vec<&'a Identifier>> = HashMap::new();
        for plot in request.plots() {
            let invoking = request
                .axes()
                .iter()
                .filter(|axes| axes.invokes(plot.name()))
                .map(|axes| axes.name())
                .collect();
            plot_to_axes.insert(plot.name().code(), invoking);
        }

        let mut axes_to_position = HashMap::new();
        for axes in request.axes() {
            let position = request
                .figure()
                .placements()
                .find(|(_, _, placed)| placed.code() == axes.name().code())
                .map(|(row, column, _)| GridPosition { row, column });
            axes_to_position.insert(axes.name().code(), position);
        }

        Self {
            plot_to_axes,
            axes_to_position,
        }
    }

    /// Axes invoking the given plot, in axes declaration order
    pub fn axes_for_plot(&self, plot: &Identifier) -> Result<&[&'a Identifier]> {
        self.plot_to_axes
            .get(plot.code())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                FiggenError::InternalError(format!("plot '{}' missing from index", plot.code()))
            })
    }

    /// Grid position of the given axes (`None` = unplaced)
    pub fn position(&self, axes: &Identifier) -> Result<Option<GridPosition>> {
        self.axes_to_position
            .get(axes.code())
            .copied()
            .ok_or_else(|| {
                FiggenError::InternalError(format!("axes '{}' missing from index", axes.code()))
            })
    }

    /// Whether the given axes has a grid cell
    pub fn is_placed(&self, axes: &Identifier) -> bool {
        matches!(self.axes_to_position.get(axes.code()), Some(Some(_)))
    }

    /// Whether any axes invokes the given plot
    pub fn is_used(&self, plot: &Identifier) -> bool {
        self.plot_to_axes
            .get(plot.code())
            .is_some_and(|axes| !axes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> Request {
        Request::from_value(&json!({
            "request_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "figure": {"size": {"row": 2, "column": 2}, "axes": [[null, "b"], ["a", null]]},
            "axes": [
                {"name": "a", "plot": ["p", "q"]},
                {"name": "b", "plot": ["q"]},
                {"name": "c", "plot": ["p"]}
            ],
            "plot": [
                {"name": "p", "data": {"relation": "plot", "x": "x", "y": "x"}},
                {"name": "q", "data": {"relation": "plot", "x": "x", "y": "x"}},
                {"name": "r", "data": {"relation": "plot", "x": "x", "y": "x"}}
            ],
            "data": [{"name": "x", "value": []}]
        }))
        .unwrap()
    }

    fn codes(ids: &[&Identifier]) -> Vec<String> {
        ids.iter().map(|id| id.code().to_string()).collect()
    }

    #[test]
    fn test_plot_to_axes_order() {
        let request = request();
        let index = RequestIndex::build(&request);
        let plots = request.plots();

        assert_eq!(codes(index.axes_for_plot(plots[0].name()).unwrap()), vec!["axes_a", "axes_c"]);
        assert_eq!(codes(index.axes_for_plot(plots[1].name()).unwrap()), vec!["axes_a", "axes_b"]);
        assert!(index.axes_for_plot(plots[2].name()).unwrap().is_empty());
        assert!(!index.is_used(plots[2].name()));
        assert!(index.is_used(plots[0].name()));
    }

    #[test]
    fn test_axes_to_position() {
        let request = request();
        let index = RequestIndex::build(&request);
        let axes = request.axes();

        assert_eq!(
            index.position(axes[0].name()).unwrap(),
            Some(GridPosition { row: 1, column: 0 })
        );
        assert_eq!(
            index.position(axes[1].name()).unwrap(),
            Some(GridPosition { row: 0, column: 1 })
        );
        assert_eq!(index.position(axes[2].name()).unwrap(), None);
        assert!(!index.is_placed(axes[2].name()));
    }

    #[test]
    fn test_repeated_plot_reference_contributes_once() {
        let request = Request::from_value(&json!({
            "request_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "figure": {"size": {"row": 1, "column": 1}, "axes": [["a"]]},
            "axes": [{"name": "a", "plot": ["p", "p"]}],
            "plot": [{"name": "p", "data": {"relation": "plot", "x": "x", "y": "x"}}],
            "data": [{"name": "x", "value": [1]}]
        }))
        .unwrap();
        let index = RequestIndex::build(&request);
        let plot = request.plots()[0].name();
        assert_eq!(codes(index.axes_for_plot(plot).unwrap()), vec!["axes_a"]);
    }

    #[test]
    fn test_unknown_name_is_internal_error() {
        let request = request();
        let index = RequestIndex::build(&request);
        let stranger = crate::naming::axes_identifier("zzz").unwrap();
        assert!(matches!(
            index.position(&stranger),
            Err(FiggenError::InternalError(_))
        ));
    }
}
