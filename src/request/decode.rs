//! Failure-collecting construction of entities from a JSON payload.
//!
//! `serde_json` stops at the first error, but a rejected request has to list
//! every offending field at once. The [`Decoder`] walks the structural parts
//! of the payload (objects, lists, required and unknown keys) by hand,
//! recording one [`Failure`] per offending field, and defers leaf values
//! (strings, numbers, closed enums, UUIDs) to their `Deserialize` impls.
//!
//! Decode functions return `None` when anything below them failed. They must
//! evaluate every field before combining results, so that a failure in one
//! field never hides a failure in a sibling.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::naming::{self, Identifier, Namespace};
use crate::report::{Failure, FailureKind, Location};
use crate::FiggenError;

/// Message for a declared field missing from an object
pub const FIELD_REQUIRED: &str = "Field required";

/// Message for a key outside an object's declared field set
pub const EXTRA_FORBIDDEN: &str = "Extra inputs are not permitted";

/// Collects construction failures across the whole payload
#[derive(Debug, Default)]
pub struct Decoder {
    failures: Vec<Failure>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    /// Record a shape failure
    pub fn shape(&mut self, at: &Location, message: impl Into<String>) {
        self.failures
            .push(Failure::new(FailureKind::Shape, at.clone(), message));
    }

    /// Open a JSON object whose keys must all be in `fields`.
    ///
    /// `build` decodes the declared fields; every undeclared key is reported
    /// afterwards, so field failures come first in discovery order.
    pub fn object<'v, T>(
        &mut self,
        value: &'v Value,
        at: &Location,
        fields: &[&str],
        build: impl FnOnce(&mut Self, &Fields<'v>) -> Option<T>,
    ) -> Option<T> {
        let Some(map) = value.as_object() else {
            self.shape(at, "Input should be a valid dictionary");
            return None;
        };

        let view = Fields {
            map,
            at: at.clone(),
        };
        let built = build(self, &view);

        let mut closed = true;
        for key in map.keys() {
            if !fields.contains(&key.as_str()) {
                self.shape(&at.key(key.as_str()), EXTRA_FORBIDDEN);
                closed = false;
            }
        }

        if closed {
            built
        } else {
            None
        }
    }

    /// Decode every element of a JSON array, continuing past failures
    pub fn list<'v, T>(
        &mut self,
        value: &'v Value,
        at: &Location,
        mut decode: impl FnMut(&mut Self, &'v Value, &Location) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Some(items) = value.as_array() else {
            self.shape(at, "Input should be a valid list");
            return None;
        };

        let mut decoded = Vec::with_capacity(items.len());
        let mut complete = true;
        for (idx, item) in items.iter().enumerate() {
            match decode(self, item, &at.index(idx)) {
                Some(element) => decoded.push(element),
                None => complete = false,
            }
        }

        complete.then_some(decoded)
    }

    /// Decode a leaf value through its `Deserialize` impl
    pub fn leaf<T: DeserializeOwned>(&mut self, value: &Value, at: &Location) -> Option<T> {
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.shape(at, e.to_string());
                None
            }
        }
    }

    /// Decode a string leaf
    pub fn string(&mut self, value: &Value, at: &Location) -> Option<String> {
        self.leaf::<String>(value, at)
    }

    /// Decode an integer that must be strictly positive.
    ///
    /// Floats with a zero fractional part count as integers (`2.0` is `2`).
    pub fn positive(&mut self, value: &Value, at: &Location) -> Option<usize> {
        let integral = match value {
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                // 2^53: beyond it floats no longer hold every integer
                .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
                .map(|f| f as i64),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };

        match integral {
            Some(n) if n <= 0 => {
                self.shape(at, "Input should be greater than 0");
                None
            }
            Some(n) if value.is_f64() => Some(n as usize),
            _ => self.leaf::<usize>(value, at),
        }
    }

    /// Decode a name and sanitize it into the given namespace
    pub fn identifier(
        &mut self,
        value: &Value,
        at: &Location,
        namespace: Namespace,
    ) -> Option<Identifier> {
        let raw = self.string(value, at)?;
        match naming::sanitize(&raw, namespace) {
            Ok(identifier) => Some(identifier),
            Err(FiggenError::UnsafeIdentifier(name)) => {
                self.failures.push(Failure::new(
                    FailureKind::Identifier,
                    at.clone(),
                    format!(
                        "Unsafe identifier: '{}' is not a valid {} name (becomes '{}{}')",
                        name,
                        namespace,
                        namespace.prefix(),
                        name.replace('-', "_")
                    ),
                ));
                None
            }
            Err(e) => {
                self.shape(at, e.to_string());
                None
            }
        }
    }
}

/// Declared-field view of a JSON object being decoded
pub struct Fields<'v> {
    map: &'v Map<String, Value>,
    at: Location,
}

impl<'v> Fields<'v> {
    /// Decode a field that must be present
    pub fn required<T>(
        &self,
        decoder: &mut Decoder,
        key: &str,
        decode: impl FnOnce(&mut Decoder, &'v Value, &Location) -> Option<T>,
    ) -> Option<T> {
        let at = self.at.key(key);
        match self.map.get(key) {
            Some(value) => decode(decoder, value, &at),
            None => {
                decoder.shape(&at, FIELD_REQUIRED);
                None
            }
        }
    }

    /// Decode a field that may be absent or `null`.
    ///
    /// Returns `Some(None)` when absent, `None` when present but invalid.
    pub fn optional<T>(
        &self,
        decoder: &mut Decoder,
        key: &str,
        decode: impl FnOnce(&mut Decoder, &'v Value, &Location) -> Option<T>,
    ) -> Option<Option<T>> {
        let at = self.at.key(key);
        match self.map.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(value) => decode(decoder, value, &at).map(Some),
        }
    }
}

/// Closed-set leaf that may be omitted, falling back to its default
pub fn optional_choice<T>(fields: &Fields<'_>, decoder: &mut Decoder, key: &str) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    fields
        .optional(decoder, key, |d, v, at| d.leaf::<T>(v, at))
        .map(Option::unwrap_or_default)
}
