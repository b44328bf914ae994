//! Request types for figgen chart descriptions
//!
//! This module contains the entity graph of a submitted chart description:
//! the root [`Request`], its [`Figure`], and the [`Axes`], [`Plot`] and
//! [`Data`] lists. Entities are constructed once from a JSON payload and are
//! read-only afterwards.
//!
//! # Architecture
//!
//! - `decode` - failure-collecting construction helpers
//! - `figure` - Figure, grid and code-style settings
//! - `axes` - Axes and AxesStyle
//! - `plot` - Plot, the PlotData relation variants and PlotStyle
//! - `data` - Data series
//!
//! Construction enforces each entity's local shape only: JSON types,
//! required and unknown fields, bounds, closed sets and identifier safety.
//! Whole-request rules live in [`crate::validate`].

pub mod axes;
pub mod data;
pub mod decode;
pub mod figure;
pub mod plot;

pub use axes::{Axes, AxesStyle};
pub use data::Data;
pub use figure::{CodeShape, Figure, FigureSize, FigureStyle, IndentStyle};
pub use plot::{LineStyle, Plot, PlotData, PlotStyle};

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::report::{ErrorReport, FailureKind, Location};
use decode::Decoder;

/// Top-level keys of a request payload
pub const REQUEST_FIELDS: &[&str] = &["request_id", "figure", "axes", "plot", "data"];

/// Root of a chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    request_id: Uuid,
    figure: Figure,
    axes: Vec<Axes>,
    plot: Vec<Plot>,
    data: Vec<Data>,
}

impl Request {
    /// Construct a request from JSON text.
    ///
    /// Malformed JSON yields a single entry at `request`; otherwise every
    /// shape and identifier failure in the payload is reported together.
    pub fn from_json(input: &str) -> std::result::Result<Self, ErrorReport> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| {
            ErrorReport::single(FailureKind::Shape, &Location::root(), e.to_string())
        })?;
        Self::from_value(&value)
    }

    /// Construct a request from an already parsed JSON value
    pub fn from_value(value: &Value) -> std::result::Result<Self, ErrorReport> {
        let mut decoder = Decoder::new();
        let request = decoder.object(value, &Location::root(), REQUEST_FIELDS, |d, f| {
            let request_id = f.required(d, "request_id", |d, v, at| d.leaf::<Uuid>(v, at));
            let figure = f.required(d, "figure", Figure::decode);
            let axes = f.required(d, "axes", |d, v, at| d.list(v, at, Axes::decode));
            let plot = f.required(d, "plot", |d, v, at| d.list(v, at, Plot::decode));
            let data = f.required(d, "data", |d, v, at| d.list(v, at, Data::decode));
            Some(Request {
                request_id: request_id?,
                figure: figure?,
                axes: axes?,
                plot: plot?,
                data: data?,
            })
        });

        let failures = decoder.into_failures();
        match request {
            Some(request) if failures.is_empty() => {
                tracing::debug!(
                    request_id = %request.request_id,
                    axes = request.axes.len(),
                    plots = request.plot.len(),
                    data = request.data.len(),
                    "constructed request"
                );
                Ok(request)
            }
            _ => {
                tracing::debug!(failures = failures.len(), "request construction failed");
                Err(ErrorReport::from_failures(failures))
            }
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plot
    }

    pub fn data(&self) -> &[Data] {
        &self.data
    }
}
