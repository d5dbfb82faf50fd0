// ── Device domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use strum::{Display, EnumIter};

use super::entity_id::{DeviceId, MacAddress};

/// Canonical device class, normalized from the backend's class names
/// (`Router`, `Switch`, `Computer`, `LANDevice`).
///
/// Anything unrecognized, including an empty string, resolves to
/// [`DeviceType::Other`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter)]
pub enum DeviceType {
    Router,
    Switch,
    Computer,
    #[strum(to_string = "LAN Device")]
    Lan,
    #[default]
    Other,
}

impl DeviceType {
    /// Case-insensitive parse of a backend type string.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "router" => Self::Router,
            "switch" => Self::Switch,
            "computer" => Self::Computer,
            "lan" | "landevice" | "lan_device" => Self::Lan,
            _ => Self::Other,
        }
    }

    /// Icon used by the topology view for this class.
    pub fn icon(self) -> DeviceIcon {
        match self {
            Self::Router => DeviceIcon::Router,
            Self::Switch => DeviceIcon::Switch,
            Self::Computer => DeviceIcon::Computer,
            Self::Lan | Self::Other => DeviceIcon::Generic,
        }
    }
}

/// Icon reference attached to topology nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceIcon {
    Router,
    Switch,
    Computer,
    Generic,
}

impl DeviceIcon {
    /// Single-glyph rendering for terminal front ends.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Router => "◈",
            Self::Switch => "▦",
            Self::Computer => "▣",
            Self::Generic => "●",
        }
    }
}

/// Device classes an operator may promote a device to.
///
/// A tag is promotable only when it names one of these classes; matching
/// is case-insensitive, so `"ROUTER"` and `"router"` both qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum PromotableClass {
    Computer,
    Switch,
    Router,
}

impl PromotableClass {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "computer" => Some(Self::Computer),
            "switch" => Some(Self::Switch),
            "router" => Some(Self::Router),
            _ => None,
        }
    }

    /// Class name as the backend expects it in `change_type`: the tag
    /// with its first letter capitalized.
    pub fn backend_name(self) -> &'static str {
        match self {
            Self::Computer => "Computer",
            Self::Switch => "Switch",
            Self::Router => "Router",
        }
    }

    pub fn device_type(self) -> DeviceType {
        match self {
            Self::Computer => DeviceType::Computer,
            Self::Switch => DeviceType::Switch,
            Self::Router => DeviceType::Router,
        }
    }
}

impl fmt::Display for PromotableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_name())
    }
}

/// A discovered device. Identity within one snapshot is the `ip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<DeviceId>,
    pub ip: IpAddr,
    pub mac: MacAddress,
    pub hostname: Option<String>,
    pub vendor: Option<String>,
    pub os: Option<String>,
    pub device_type: DeviceType,
    pub tags: Vec<String>,
    pub online: bool,
    pub uptime_secs: u64,
    pub snmp_version: Option<String>,
    pub ports: Vec<Port>,
    pub model: Option<String>,
}

impl Device {
    /// Minimal device with everything but the address defaulted.
    pub fn new(ip: IpAddr) -> Self {
        Self {
            id: None,
            ip,
            mac: MacAddress::default(),
            hostname: None,
            vendor: None,
            os: None,
            device_type: DeviceType::Other,
            tags: Vec::new(),
            online: false,
            uptime_secs: 0,
            snmp_version: None,
            ports: Vec::new(),
            model: None,
        }
    }

    /// Tags paired with the class they would promote to, in tag order.
    pub fn tags_with_promotion(&self) -> impl Iterator<Item = (&str, Option<PromotableClass>)> {
        self.tags
            .iter()
            .map(|tag| (tag.as_str(), PromotableClass::from_tag(tag)))
    }

    /// Hostname, or `"Unknown"` when the backend has none.
    pub fn display_hostname(&self) -> &str {
        self.hostname
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or("Unknown")
    }

    /// SNMP version, or `"Not Supported"` when the device has none.
    pub fn snmp_label(&self) -> &str {
        self.snmp_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("Not Supported")
    }

    /// Uptime as `{d}d {h}h {m}m {s}s`.
    pub fn uptime_label(&self) -> String {
        format_uptime(self.uptime_secs)
    }
}

/// One port discovered by an nmap pass. Display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub port: u16,
    pub protocol: String,
    pub status: String,
    pub service: String,
    pub product: String,
    pub version: String,
}

/// Format a duration in seconds as `{d}d {h}h {m}m {s}s`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn device_type_parses_backend_class_names() {
        assert_eq!(DeviceType::from_wire("Router"), DeviceType::Router);
        assert_eq!(DeviceType::from_wire("SWITCH"), DeviceType::Switch);
        assert_eq!(DeviceType::from_wire("computer"), DeviceType::Computer);
        assert_eq!(DeviceType::from_wire("LANDevice"), DeviceType::Lan);
        assert_eq!(DeviceType::from_wire(""), DeviceType::Other);
        assert_eq!(DeviceType::from_wire("toaster"), DeviceType::Other);
    }

    #[test]
    fn every_device_type_has_an_icon() {
        for kind in DeviceType::iter() {
            let icon = kind.icon();
            assert!(!icon.glyph().is_empty());
        }
        assert_eq!(DeviceType::Lan.icon(), DeviceIcon::Generic);
        assert_eq!(DeviceType::Other.icon(), DeviceIcon::Generic);
    }

    #[test]
    fn promotable_class_is_case_insensitive() {
        assert_eq!(PromotableClass::from_tag("router"), Some(PromotableClass::Router));
        assert_eq!(PromotableClass::from_tag("ROUTER"), Some(PromotableClass::Router));
        assert_eq!(PromotableClass::from_tag("Switch"), Some(PromotableClass::Switch));
        assert_eq!(PromotableClass::from_tag("printer"), None);
        assert_eq!(PromotableClass::from_tag("lan"), None);
    }

    #[test]
    fn promotable_class_round_trips_to_device_type() {
        for class in PromotableClass::iter() {
            assert_eq!(class.device_type().to_string(), class.backend_name());
        }
    }

    #[test]
    fn tags_with_promotion_marks_only_allow_listed_tags() {
        let mut device = Device::new(IpAddr::from([10, 0, 0, 1]));
        device.tags = vec!["router".into(), "printer".into()];
        let marked: Vec<_> = device.tags_with_promotion().collect();
        assert_eq!(
            marked,
            vec![("router", Some(PromotableClass::Router)), ("printer", None)]
        );
    }

    #[test]
    fn uptime_formats_all_units() {
        assert_eq!(format_uptime(0), "0d 0h 0m 0s");
        assert_eq!(format_uptime(93_784), "1d 2h 3m 4s");
    }

    #[test]
    fn missing_snmp_version_is_not_supported() {
        let device = Device::new(IpAddr::from([10, 0, 0, 1]));
        assert_eq!(device.snmp_label(), "Not Supported");
        assert_eq!(device.display_hostname(), "Unknown");
    }
}
