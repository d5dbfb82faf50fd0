// ── API-to-domain type conversions ──
//
// Bridges raw `netmap_api` wire types into `netmap_core::model` domain
// types. Parsing the address is the only fallible step: a record without
// a usable `ip` cannot take part in a directory keyed by address, so a
// listing skips it and keeps the rest.

use std::net::IpAddr;

use netmap_api::{BandwidthReading, DeviceRecord, PortRecord};
use serde_json::Value;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceType, MacAddress, Port, Throughput};

// ── Helpers ────────────────────────────────────────────────────────

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Seconds as reported (float) to whole non-negative seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn uptime_secs(raw: Option<f64>) -> u64 {
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
        _ => 0,
    }
}

fn extra_str(extra: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    extra
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|s| !s.is_empty())
}

// ── Device ─────────────────────────────────────────────────────────

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(record: DeviceRecord) -> Result<Self, Self::Error> {
        let ip: IpAddr = record
            .ip
            .trim()
            .parse()
            .map_err(|_| CoreError::DataShape {
                message: format!("device has an invalid ip address: {:?}", record.ip),
            })?;

        Ok(Device {
            id: record.id.map(|id| DeviceId::new(id.to_string())),
            ip,
            mac: record.mac.map(MacAddress::new).unwrap_or_default(),
            hostname: non_empty(record.hostname),
            vendor: non_empty(record.vendor),
            os: non_empty(record.os),
            device_type: record
                .device_type
                .as_deref()
                .map_or(DeviceType::Other, DeviceType::from_wire),
            tags: record.tags,
            online: record.device_status,
            uptime_secs: uptime_secs(record.device_uptime),
            snmp_version: non_empty(record.snmp_version),
            ports: record.ports.into_iter().map(Port::from).collect(),
            model: extra_str(&record.extra, "model"),
        })
    }
}

/// Convert a whole listing, dropping malformed records in place.
pub(crate) fn devices_from_records(records: Vec<DeviceRecord>) -> Vec<Device> {
    records
        .into_iter()
        .filter_map(|record| match Device::try_from(record) {
            Ok(device) => Some(device),
            Err(e) => {
                warn!(error = %e, "skipping device record");
                None
            }
        })
        .collect()
}

// ── Port / telemetry ───────────────────────────────────────────────

impl From<PortRecord> for Port {
    fn from(p: PortRecord) -> Self {
        Port {
            port: p.port,
            protocol: p.protocol,
            status: p.status,
            service: p.service,
            product: p.product,
            version: p.version,
        }
    }
}

impl From<BandwidthReading> for Throughput {
    fn from(r: BandwidthReading) -> Self {
        let clean = |v: Option<f64>| v.filter(|x| x.is_finite() && *x >= 0.0);
        Throughput {
            in_kbps: clean(r.in_kbps),
            out_kbps: clean(r.out_kbps),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DeviceRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn converts_full_record() {
        let device = Device::try_from(record(json!({
            "id": 3,
            "ip": "10.0.0.5",
            "mac": "AA-BB-CC-DD-EE-FF",
            "hostname": "nas",
            "vendor": "Synology",
            "os": "",
            "type": "Computer",
            "tags": ["computer"],
            "device_status": true,
            "device_uptime": 3725.9,
            "snmp_version": "v2c",
            "ports": [{ "port": 443, "protocol": "tcp", "status": "open" }],
            "model": "DS920+"
        })))
        .unwrap();

        assert_eq!(device.id.as_ref().map(DeviceId::as_str), Some("3"));
        assert_eq!(device.ip, "10.0.0.5".parse::<IpAddr>().unwrap());
        assert_eq!(device.mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(device.os, None);
        assert_eq!(device.device_type, DeviceType::Computer);
        assert!(device.online);
        assert_eq!(device.uptime_secs, 3725);
        assert_eq!(device.ports[0].port, 443);
        assert_eq!(device.model.as_deref(), Some("DS920+"));
    }

    #[test]
    fn unknown_type_falls_back_to_other() {
        let device = Device::try_from(record(json!({ "ip": "10.0.0.9", "type": "Fridge" }))).unwrap();
        assert_eq!(device.device_type, DeviceType::Other);
    }

    #[test]
    fn invalid_ip_is_data_shape_error() {
        let err = Device::try_from(record(json!({ "ip": "not-an-ip" }))).unwrap_err();
        assert!(err.is_data_shape());
    }

    #[test]
    fn listing_skips_records_without_a_usable_ip() {
        let devices = devices_from_records(vec![
            record(json!({ "ip": "10.0.0.1" })),
            record(json!({ "ip": "10.0.0.999" })),
            record(json!({ "ip": "10.0.0.3", "type": "router" })),
        ]);

        let ips: Vec<String> = devices.iter().map(|d| d.ip.to_string()).collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.3"]);
        assert_eq!(devices[1].device_type, DeviceType::Router);
    }

    #[test]
    fn negative_readings_are_dropped() {
        let t = Throughput::from(BandwidthReading {
            in_kbps: Some(-1.0),
            out_kbps: Some(12.5),
        });
        assert_eq!(t.in_kbps, None);
        assert_eq!(t.out_kbps, Some(12.5));
    }
}
