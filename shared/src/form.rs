//! Form state for the resource editors.
//!
//! Inputs hold display strings keyed by DTO field name. Conversion to request
//! bodies walks the same [`FieldMapping`](crate::FieldMapping) table the server
//! uses, parsing numbers by [`FieldKind`].

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::{FieldError, FieldKind, Resource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    /// Prefill from an existing row; columns are looked up through the mapping table.
    pub fn from_row<R: Resource>(row: &R) -> Self {
        let value = serde_json::to_value(row).unwrap_or(Value::Null);
        let values = R::FIELDS
            .iter()
            .map(|mapping| {
                let text = match value.get(mapping.column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => String::new(),
                };
                (mapping.field.to_string(), text)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Every mapped field as a typed JSON value, or one error per field that failed to parse.
    fn to_json<R: Resource>(&self) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut object = Map::new();
        let mut errors = Vec::new();

        for mapping in R::FIELDS {
            let raw = self.get(mapping.field).trim();
            let parsed = match mapping.kind {
                FieldKind::Text => Ok(Value::String(raw.to_string())),
                FieldKind::Integer => raw
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| format!("{} must be a whole number", mapping.label)),
                FieldKind::Real => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{} must be a number", mapping.label)),
            };
            match parsed {
                Ok(value) => {
                    object.insert(mapping.field.to_string(), value);
                }
                Err(message) => errors.push(FieldError::new(mapping.field, message)),
            }
        }

        if errors.is_empty() {
            Ok(object)
        } else {
            Err(errors)
        }
    }

    pub fn to_create<R: Resource>(&self) -> Result<R::Create, Vec<FieldError>> {
        let object = self.to_json::<R>()?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| vec![FieldError::new("body", e.to_string())])
    }

    /// Full-form edit: every field is sent.
    pub fn to_update<R: Resource>(&self) -> Result<R::Update, Vec<FieldError>> {
        let object = self.to_json::<R>()?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| vec![FieldError::new("body", e.to_string())])
    }
}
