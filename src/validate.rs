//! Whole-request validation.
//!
//! Runs after every entity constructed cleanly. All checks run and every
//! failure is collected before reporting:
//!
//! 1. Name uniqueness within `axes`, `plot` and `data`
//! 2. Grid shape against `figure.size`
//! 3. Grid cell → axes references
//! 4. Axes → plot references
//! 5. Plot → data references
//! 6. Each axes placed in at most one grid cell
//!
//! Unplaced axes and unused plots are legal; they are surfaced as
//! [`ValidationWarning`]s.

use std::collections::{HashMap, HashSet};

use crate::index::RequestIndex;
use crate::naming::Identifier;
use crate::report::{ErrorReport, Failure, FailureKind, Location};
use crate::request::Request;

// ============================================================================
// Core Types
// ============================================================================

/// A request that passed both construction and cross-reference checks.
///
/// This is the only input the code writers accept.
#[derive(Debug, Clone)]
pub struct Validated {
    request: Request,
    warnings: Vec<ValidationWarning>,
}

impl Validated {
    /// The validated request
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Validation warnings.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }
}

/// A validation warning (non-fatal).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub message: String,
    pub location: Location,
}

// ============================================================================
// Validation Function
// ============================================================================

/// Construct and validate a request from JSON text
pub fn validate_json(input: &str) -> std::result::Result<Validated, ErrorReport> {
    let request = Request::from_json(input)?;
    validate(request)
}

/// Run every cross-reference check against a constructed request
pub fn validate(request: Request) -> std::result::Result<Validated, ErrorReport> {
    let root = Location::root();
    let mut failures = Vec::new();

    check_unique(
        "axes",
        request.axes().iter().map(|a| a.name()),
        &root,
        &mut failures,
    );
    check_unique(
        "plot",
        request.plots().iter().map(|p| p.name()),
        &root,
        &mut failures,
    );
    check_unique(
        "data",
        request.data().iter().map(|d| d.name()),
        &root,
        &mut failures,
    );
    check_grid_shape(&request, &root, &mut failures);
    check_grid_references(&request, &root, &mut failures);
    check_plot_references(&request, &root, &mut failures);
    check_data_references(&request, &root, &mut failures);
    check_single_placement(&request, &root, &mut failures);

    if !failures.is_empty() {
        tracing::debug!(
            request_id = %request.request_id(),
            failures = failures.len(),
            "cross-reference validation failed"
        );
        return Err(ErrorReport::from_failures(failures));
    }

    let warnings = collect_warnings(&request, &root);
    for warning in &warnings {
        tracing::warn!(location = %warning.location, "{}", warning.message);
    }

    Ok(Validated { request, warnings })
}

// ============================================================================
// Checks
// ============================================================================

fn check_unique<'a>(
    field: &str,
    names: impl Iterator<Item = &'a Identifier>,
    root: &Location,
    failures: &mut Vec<Failure>,
) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&'a Identifier> = Vec::new();
    for name in names {
        let count = counts.entry(name.code()).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let duplicates: Vec<String> = order
        .iter()
        .filter(|name| counts.get(name.code()).copied().unwrap_or(0) > 1)
        .map(|name| format!("'{}'", name.raw()))
        .collect();

    if !duplicates.is_empty() {
        failures.push(Failure::new(
            FailureKind::Uniqueness,
            root.key(field),
            format!("Duplicate {} name found: [{}]", field, duplicates.join(", ")),
        ));
    }
}

fn check_grid_shape(request: &Request, root: &Location, failures: &mut Vec<Failure>) {
    let size = request.figure().size();
    let grid = request.figure().grid();
    let rows_match = grid.len() == size.row;
    let columns_match = grid.iter().all(|cells| cells.len() == size.column);

    if !rows_match || !columns_match {
        let found: Vec<String> = grid.iter().map(|cells| cells.len().to_string()).collect();
        failures.push(Failure::new(
            FailureKind::Dimension,
            root.key("figure").key("axes"),
            format!(
                "Shape of figure.axes is not equivalent to the provided (row, column) = ({}, {}): found {} row(s) with column counts [{}]",
                size.row,
                size.column,
                grid.len(),
                found.join(", ")
            ),
        ));
    }
}

fn check_grid_references(request: &Request, root: &Location, failures: &mut Vec<Failure>) {
    let axes_names: HashSet<&str> = request.axes().iter().map(|a| a.name().code()).collect();
    for (row, column, axes) in request.figure().placements() {
        if !axes_names.contains(axes.code()) {
            failures.push(Failure::new(
                FailureKind::Reference,
                root.key("figure").key("axes").index(row).index(column),
                format!(
                    "Cannot find figure.axes[{}][{}] = '{}' in axes names",
                    row,
                    column,
                    axes.raw()
                ),
            ));
        }
    }
}

fn check_plot_references(request: &Request, root: &Location, failures: &mut Vec<Failure>) {
    let plot_names: HashSet<&str> = request.plots().iter().map(|p| p.name().code()).collect();
    for (axes_idx, axes) in request.axes().iter().enumerate() {
        for (ref_idx, plot) in axes.plot_refs().iter().enumerate() {
            if !plot_names.contains(plot.code()) {
                failures.push(Failure::new(
                    FailureKind::Reference,
                    root.key("axes").index(axes_idx).key("plot").index(ref_idx),
                    format!(
                        "Cannot find plot '{}' from axes '{}' in plot names",
                        plot.raw(),
                        axes.name().raw()
                    ),
                ));
            }
        }
    }
}

fn check_data_references(request: &Request, root: &Location, failures: &mut Vec<Failure>) {
    let data_names: HashSet<&str> = request.data().iter().map(|d| d.name().code()).collect();
    for (plot_idx, plot) in request.plots().iter().enumerate() {
        for (field, data) in plot.data().references() {
            if !data_names.contains(data.code()) {
                failures.push(Failure::new(
                    FailureKind::Reference,
                    root.key("plot").index(plot_idx).key("data").key(field),
                    format!(
                        "Cannot find data '{}' from plot '{}' in data names",
                        data.raw(),
                        plot.name().raw()
                    ),
                ));
            }
        }
    }
}

fn check_single_placement(request: &Request, root: &Location, failures: &mut Vec<Failure>) {
    let mut first_seen: HashMap<&str, (usize, usize)> = HashMap::new();
    for (row, column, axes) in request.figure().placements() {
        match first_seen.get(axes.code()) {
            Some(&(first_row, first_column)) => failures.push(Failure::new(
                FailureKind::Placement,
                root.key("figure").key("axes").index(row).index(column),
                format!(
                    "Axes '{}' is already placed at figure.axes[{}][{}]",
                    axes.raw(),
                    first_row,
                    first_column
                ),
            )),
            None => {
                first_seen.insert(axes.code(), (row, column));
            }
        }
    }
}

fn collect_warnings(request: &Request, root: &Location) -> Vec<ValidationWarning> {
    let index = RequestIndex::build(request);
    let mut warnings = Vec::new();

    for (idx, axes) in request.axes().iter().enumerate() {
        if !index.is_placed(axes.name()) {
            warnings.push(ValidationWarning {
                message: format!("{} is not assigned into any subplot", axes.name()),
                location: root.key("axes").index(idx),
            });
        }
    }

    for (idx, plot) in request.plots().iter().enumerate() {
        if !index.is_used(plot.name()) {
            warnings.push(ValidationWarning {
                message: format!("plot '{}' is not used by any axes", plot.name().raw()),
                location: root.key("plot").index(idx),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn base() -> Value {
        json!({
            "request_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "figure": {"size": {"row": 1, "column": 2}, "axes": [["a", null]]},
            "axes": [{"name": "a", "plot": ["p"]}],
            "plot": [{
                "name": "p",
                "data": {"relation": "plot", "x": "x", "y": "y"},
                "style": {"linestyle": "solid"}
            }],
            "data": [{"name": "x", "value": [1, 2]}, {"name": "y", "value": [3, 4]}]
        })
    }

    fn run(value: Value) -> std::result::Result<Validated, ErrorReport> {
        validate(Request::from_value(&value).unwrap())
    }

    #[test]
    fn test_validate_valid_request() {
        let validated = run(base()).unwrap();
        assert!(validated.warnings().is_empty());
        assert_eq!(validated.request().axes().len(), 1);
    }

    #[test]
    fn test_validate_grid_dimension() {
        let mut value = base();
        value["figure"]["size"] = json!({"row": 2, "column": 2});
        let report = run(value).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.causes()[0].location, "request.figure.axes");
        assert!(report.causes()[0].message.starts_with("Shape of figure.axes"));
    }

    #[test]
    fn test_validate_ragged_grid() {
        let mut value = base();
        value["figure"] = json!({"size": {"row": 2, "column": 2}, "axes": [["a", null], [null]]});
        let report = run(value).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.causes()[0].location, "request.figure.axes");
    }

    #[test]
    fn test_validate_duplicate_data() {
        let mut value = base();
        value["data"] = json!([
            {"name": "x", "value": [1]},
            {"name": "x", "value": [2]},
            {"name": "y", "value": [3]}
        ]);
        let report = run(value).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.causes()[0].location, "request.data");
        assert_eq!(report.causes()[0].message, "Duplicate data name found: ['x']");
    }

    #[test]
    fn test_validate_duplicate_after_sanitizing() {
        let mut value = base();
        value["axes"] = json!([{"name": "a-b", "plot": []}, {"name": "a_b", "plot": []}, {"name": "a", "plot": []}]);
        let report = run(value).unwrap_err();
        assert_eq!(report.causes()[0].location, "request.axes");
        assert_eq!(report.causes()[0].message, "Duplicate axes name found: ['a-b']");
    }

    #[test]
    fn test_validate_missing_plot() {
        let mut value = base();
        value["axes"][0]["plot"] = json!(["p", "missing"]);
        let report = run(value).unwrap_err();
        assert_eq!(report.len(), 1);
        let cause = &report.causes()[0];
        assert_eq!(cause.location, "request.axes[0].plot[1]");
        assert!(cause.message.contains("'missing'"));
        assert!(cause.message.contains("axes 'a'"));
    }

    #[test]
    fn test_validate_missing_grid_axes_and_data() {
        let mut value = base();
        value["figure"]["axes"] = json!([["a", "ghost"]]);
        value["plot"][0]["data"]["y"] = json!("nowhere");
        let report = run(value).unwrap_err();
        let locations: Vec<&str> = report.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(
            locations,
            vec!["request.figure.axes[0][1]", "request.plot[0].data.y"]
        );
        assert!(report.causes()[1].message.contains("'nowhere'"));
    }

    #[test]
    fn test_validate_collects_across_checks() {
        let mut value = base();
        value["figure"] = json!({"size": {"row": 1, "column": 3}, "axes": [["z", "a"]]});
        value["plot"] = json!([
            {"name": "p", "data": {"relation": "plot", "x": "x", "y": "q"}},
            {"name": "p", "data": {"relation": "plot", "x": "x", "y": "y"}}
        ]);
        let report = run(value).unwrap_err();
        let locations: Vec<&str> = report.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "request.plot",
                "request.figure.axes",
                "request.figure.axes[0][0]",
                "request.plot[0].data.y",
            ]
        );
        let kinds: Vec<FailureKind> = report.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FailureKind::Uniqueness,
                FailureKind::Dimension,
                FailureKind::Reference,
                FailureKind::Reference,
            ]
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_placement() {
        let mut value = base();
        value["figure"]["axes"] = json!([["a", "a"]]);
        let report = run(value).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.causes()[0].location, "request.figure.axes[0][1]");
        assert_eq!(
            report.causes()[0].message,
            "Axes 'a' is already placed at figure.axes[0][0]"
        );
        assert_eq!(report.causes()[0].kind, FailureKind::Placement);
    }

    #[test]
    fn test_validate_warnings_for_orphans() {
        let mut value = base();
        value["figure"]["axes"] = json!([[null, null]]);
        value["plot"] = json!([
            {"name": "p", "data": {"relation": "plot", "x": "x", "y": "y"}},
            {"name": "unused", "data": {"relation": "plot", "x": "x", "y": "y"}}
        ]);
        let validated = run(value).unwrap();
        let locations: Vec<String> = validated
            .warnings()
            .iter()
            .map(|w| w.location.to_string())
            .collect();
        assert_eq!(locations, vec!["request.axes[0]", "request.plot[1]"]);
        assert_eq!(
            validated.warnings()[0].message,
            "axes_a is not assigned into any subplot"
        );
    }

    #[test]
    fn test_validate_json_malformed() {
        let report = validate_json("not json").unwrap_err();
        assert_eq!(report.causes()[0].location, "request");
    }
}
