// ── Core identity types ──
//
// DeviceId and MacAddress identify devices across snapshots. The backend
// emits ids as strings or integers; MACs arrive in whatever case and
// separator the scanner produced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DeviceId ────────────────────────────────────────────────────────

/// Stable device identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address. Recognized MACs are normalized to lowercase
/// colon-separated form (aa:bb:cc:dd:ee:ff); anything else is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        match hex_octets(raw.trim()) {
            Some(octets) => Self(octets.join(":").to_ascii_lowercase()),
            None => Self(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The six octets of `s` if it is a MAC in one of the accepted forms.
fn hex_octets(s: &str) -> Option<Vec<&str>> {
    let octets: Vec<&str> = if s.len() == 12 {
        (0..6).filter_map(|i| s.get(i * 2..i * 2 + 2)).collect()
    } else {
        s.split([':', '-']).collect()
    };
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    valid.then_some(octets)
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_id_display() {
        let id = DeviceId::from("dev-42");
        assert_eq!(id.to_string(), "dev-42");
    }

    #[test]
    fn mac_address_normalizes_dashes() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_normalizes_bare_hex() {
        let mac = MacAddress::new("AABBCCDDEEFF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_keeps_unrecognized_input() {
        assert_eq!(MacAddress::new("Unknown").as_str(), "Unknown");
        assert_eq!(MacAddress::new(" N/A ").as_str(), " N/A ");
        assert_eq!(MacAddress::new("AA:BB:CC:DD:EE").as_str(), "AA:BB:CC:DD:EE");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }
}
