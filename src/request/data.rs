//! Data: one named numeric series

use serde::Serialize;
use serde_json::Value;

use super::decode::Decoder;
use crate::naming::{Identifier, Namespace};
use crate::report::Location;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    name: Identifier,
    value: Vec<f64>,
}

impl Data {
    pub(crate) fn decode(d: &mut Decoder, value: &Value, at: &Location) -> Option<Self> {
        d.object(value, at, &["name", "value"], |d, f| {
            let name = f.required(d, "name", |d, v, at| d.identifier(v, at, Namespace::Data));
            let series = f.required(d, "value", |d, v, at| {
                d.list(v, at, |d, item, at| d.leaf::<f64>(item, at))
            });
            Some(Data {
                name: name?,
                value: series?,
            })
        })
    }

    /// Sanitized `data_<name>` identifier
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn value(&self) -> &[f64] {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_decode() {
        let mut d = Decoder::new();
        let data = Data::decode(
            &mut d,
            &json!({"name": "x-values", "value": [1, 2.5, -3]}),
            &Location::root().key("data").index(0),
        )
        .unwrap();
        assert_eq!(data.name().code(), "data_x_values");
        assert_eq!(data.value(), &[1.0, 2.5, -3.0]);
    }

    #[test]
    fn test_data_empty_series() {
        let mut d = Decoder::new();
        let data = Data::decode(&mut d, &json!({"name": "e", "value": []}), &Location::root());
        assert!(data.unwrap().value().is_empty());
    }

    #[test]
    fn test_data_rejects_non_numbers() {
        let mut d = Decoder::new();
        let data = Data::decode(
            &mut d,
            &json!({"name": "x", "value": [1, "two", true]}),
            &Location::root().key("data").index(1),
        );
        assert!(data.is_none());
        let locations: Vec<String> = d.failures().iter().map(|f| f.location.to_string()).collect();
        assert_eq!(
            locations,
            vec!["request.data[1].value[1]", "request.data[1].value[2]"]
        );
    }
}
