//! Data types sent to the dashboard.
//! Keep this module minimal and stable; it defines the wire format.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ErrorKind, ErrorRecord};
use crate::vendor::VendorKind;

/// Sentinel for a metric the vendor tool did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// One normalized snapshot of a device: a fixed set of metric keys plus any errors hit on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    fields: Map<String, Value>,
    errors: Vec<ErrorRecord>,
}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: &[(&str, Value)]) -> Self {
        let mut reading = Self::new();
        reading.extend_defaults(defaults);
        reading
    }

    /// Adds defaults for keys not already present; existing values are never overwritten.
    pub fn extend_defaults(&mut self, defaults: &[(&str, Value)]) {
        for (key, value) in defaults {
            self.fields
                .entry(key.to_string())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String view of a field, for assertions and name lookups.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn push_error(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    pub fn error(&mut self, kind: ErrorKind, extra: impl Into<String>) {
        self.push_error(ErrorRecord::new(kind, extra));
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.code == kind.code())
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_errors = !self.errors.is_empty();
        let mut map = serializer.serialize_map(Some(self.fields.len() + usize::from(with_errors)))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        if with_errors {
            map.serialize_entry("error", &self.errors)?;
        }
        map.end()
    }
}

/// One installed device as seen by a vendor's enumeration command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: String,
    pub model: String,
    pub guid: String,
    pub vendor: VendorKind,
}

/// Default-map helper: `na("temp")` -> `("temp", "N/A")`.
pub fn na(key: &str) -> (&str, Value) {
    (key, Value::from(NOT_AVAILABLE))
}
