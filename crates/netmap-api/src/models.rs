// Wire models for the backend REST surface
//
// These mirror the JSON the discovery backend emits. They are deliberately
// lenient: only `ip` is required on a device, everything else defaults, and
// unknown keys (per-class extras such as `num_ports` or `cpu_load`) are
// captured in `extra` rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Envelopes ───────────────────────────────────────────────────────

/// `{ "devices": [...] }` returned by the listing and scan endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// `{ "cidr": "192.168.1.0/24" }`
#[derive(Debug, Clone, Deserialize)]
pub struct CidrResponse {
    pub cidr: Option<String>,
}

/// `{ "snmp_version": "v2c" | "v3" | null }`
#[derive(Debug, Clone, Deserialize)]
pub struct SnmpVersionResponse {
    #[serde(default)]
    pub snmp_version: Option<String>,
}

/// Import result. The backend reports failures in-band with HTTP 200:
/// `{ "status": "error", "message": "Invalid JSON format" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub imported: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// FastAPI error body: `{ "detail": "Device not found" }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: Value,
}

// ── Device ──────────────────────────────────────────────────────────

/// Device identifier as emitted by the backend: usually a string, but
/// older snapshots carry integers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Raw device as returned by `GET /api/devices`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub ip: String,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub device_status: bool,
    /// Seconds; the backend serializes a float.
    #[serde(default)]
    pub device_uptime: Option<f64>,
    #[serde(default)]
    pub snmp_version: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortRecord>,
    /// Class-specific fields (`model`, `num_ports`, `cpu_load`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One open/filtered port discovered by nmap.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortRecord {
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub version: String,
}

// ── Telemetry ───────────────────────────────────────────────────────

/// One bandwidth reading. Either side may be `null` when the backend
/// could not measure it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct BandwidthReading {
    #[serde(default)]
    pub in_kbps: Option<f64>,
    #[serde(default)]
    pub out_kbps: Option<f64>,
}

// ── Commands ────────────────────────────────────────────────────────

/// Enrichment strategy, mapped onto `/api/devices/enrich/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichKind {
    Nmap,
    Snmp,
    Both,
}

impl EnrichKind {
    /// Path segment used by the backend.
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Nmap => "nmap",
            Self::Snmp => "snmp",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for EnrichKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_record_tolerates_missing_fields() {
        let record: DeviceRecord = serde_json::from_value(json!({ "ip": "10.0.0.5" }))
            .expect("minimal device should parse");
        assert_eq!(record.ip, "10.0.0.5");
        assert!(record.tags.is_empty());
        assert!(!record.device_status);
        assert!(record.id.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn device_record_keeps_class_extras() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "id": 7,
            "ip": "10.0.0.2",
            "type": "Switch",
            "num_ports": 24,
            "model": "GS108"
        }))
        .expect("switch should parse");
        assert_eq!(record.id, Some(RecordId::Number(7)));
        assert_eq!(record.device_type.as_deref(), Some("Switch"));
        assert_eq!(record.extra.get("num_ports"), Some(&json!(24)));
    }

    #[test]
    fn bandwidth_reading_accepts_nulls() {
        let reading: BandwidthReading =
            serde_json::from_value(json!({ "in_kbps": null, "out_kbps": 3.5 }))
                .expect("reading should parse");
        assert_eq!(reading.in_kbps, None);
        assert_eq!(reading.out_kbps, Some(3.5));
    }
}
