//! Response assembly: picks collectors from settings, runs them, and shapes the three documents
//! the dashboard asks for (single reading, batch, inventory).

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::ErrorKind;
use crate::reading::{InventoryEntry, Reading};
use crate::settings::Settings;
use crate::vendor::{vendor, Host, VendorKind};

/// Collects one reading for the device named by `settings`.
/// An unknown vendor yields an empty reading carrying error 200.
pub fn collect_reading(settings: &Settings, host: &Host) -> Reading {
    match VendorKind::parse(&settings.vendor) {
        Some(kind) => {
            debug!(vendor = kind.as_str(), gpu = %settings.gpu_id, "collecting");
            vendor(kind).collect(settings, host)
        }
        None => {
            warn!("unsupported vendor {:?} in settings", settings.vendor);
            let mut r = Reading::new();
            r.error(
                ErrorKind::ConfigSettingsNotValid,
                format!("VENDOR={}", settings.vendor),
            );
            r
        }
    }
}

/// One entry of a batch request: `{"vendor": "nvidia", "guid": "GPU-...", "id": "08:00.0", "panel": 3}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub vendor: String,
    #[serde(deserialize_with = "text_or_number")]
    pub guid: String,
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default)]
    pub panel: Value,
}

// the dashboard sends ids as strings or bare numbers depending on vendor
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

pub fn parse_batch(json: &str) -> Result<Vec<BatchRequest>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Readings keyed by request id, each echoing its `panel`. Devices are collected in order.
/// A malformed request list yields a single `"error"` entry with code 500.
pub fn collect_batch(json: &str, base: &Settings, host: &Host) -> BTreeMap<String, Reading> {
    let mut out = BTreeMap::new();
    let requests = match parse_batch(json) {
        Ok(requests) => requests,
        Err(e) => {
            warn!("bad batch request: {e}");
            let mut r = Reading::new();
            r.error(ErrorKind::BadArrayData, e.to_string());
            out.insert("error".to_string(), r);
            return out;
        }
    };
    for request in requests {
        let settings = base.for_device(&request.vendor, &request.guid);
        let mut reading = collect_reading(&settings, host);
        reading.set("panel", request.panel);
        out.insert(request.id, reading);
    }
    out
}

/// Every vendor's devices, NVIDIA first, then Intel, then AMD.
pub fn collect_inventory(host: &Host) -> Vec<InventoryEntry> {
    let mut entries = Vec::new();
    for kind in VendorKind::ALL {
        let v = vendor(kind);
        let found = v.inventory(host);
        debug!(vendor = v.kind().as_str(), count = found.len(), "inventory");
        entries.extend(found);
    }
    entries
}
