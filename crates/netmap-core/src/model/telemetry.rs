// ── Bandwidth telemetry types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::net::IpAddr;

use super::entity_id::MacAddress;

/// Number of samples a device view keeps.
pub const DEFAULT_WINDOW: usize = 60;

/// One reading as reported by the backend. Either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub in_kbps: Option<f64>,
    pub out_kbps: Option<f64>,
}

/// A reading stamped with its capture instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandwidthSample {
    pub timestamp: DateTime<Utc>,
    pub in_kbps: Option<f64>,
    pub out_kbps: Option<f64>,
}

impl BandwidthSample {
    pub fn at(timestamp: DateTime<Utc>, throughput: Throughput) -> Self {
        Self {
            timestamp,
            in_kbps: throughput.in_kbps,
            out_kbps: throughput.out_kbps,
        }
    }

    /// `true` when neither direction carries a value.
    pub fn is_gap(&self) -> bool {
        self.in_kbps.is_none() && self.out_kbps.is_none()
    }
}

/// Telemetry is keyed by address plus MAC, matching the backend's
/// per-interface lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub ip: IpAddr,
    pub mac: MacAddress,
}

impl SampleKey {
    pub fn new(ip: IpAddr, mac: MacAddress) -> Self {
        Self { ip, mac }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.mac)
    }
}

/// Fixed-size FIFO of the most recent samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    samples: VecDeque<BandwidthSample>,
    capacity: usize,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_WINDOW)
    }
}

impl SampleWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: BandwidthSample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &BandwidthSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&BandwidthSample> {
        self.samples.back()
    }

    /// Inbound series as `(position, kbps)` points. Positions are the
    /// sample's slot in the window so gaps stay visible; missing values
    /// are skipped, never zero-filled.
    pub fn inbound_points(&self) -> Vec<(f64, f64)> {
        self.points(|s| s.in_kbps)
    }

    /// Outbound series, same layout as [`inbound_points`](Self::inbound_points).
    pub fn outbound_points(&self) -> Vec<(f64, f64)> {
        self.points(|s| s.out_kbps)
    }

    /// Largest value across both directions.
    pub fn peak_kbps(&self) -> f64 {
        self.samples
            .iter()
            .flat_map(|s| [s.in_kbps, s.out_kbps])
            .flatten()
            .fold(0.0, f64::max)
    }

    fn points(&self, pick: impl Fn(&BandwidthSample) -> Option<f64>) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .zip(0u32..)
            .filter_map(|(s, slot)| pick(s).map(|v| (f64::from(slot), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f64) -> BandwidthSample {
        BandwidthSample::at(
            Utc::now(),
            Throughput {
                in_kbps: Some(v),
                out_kbps: Some(v / 2.0),
            },
        )
    }

    #[test]
    fn window_keeps_most_recent_entries() {
        let mut window = SampleWindow::with_capacity(3);
        for v in 1..=5 {
            window.push(sample(f64::from(v)));
        }
        let kept: Vec<_> = window.iter().filter_map(|s| s.in_kbps).collect();
        assert_eq!(kept, vec![3.0, 4.0, 5.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn gaps_are_skipped_not_zeroed() {
        let mut window = SampleWindow::with_capacity(5);
        window.push(sample(10.0));
        window.push(BandwidthSample::at(Utc::now(), Throughput::default()));
        window.push(sample(30.0));

        assert_eq!(window.inbound_points(), vec![(0.0, 10.0), (2.0, 30.0)]);
        assert!(window.iter().nth(1).is_some_and(BandwidthSample::is_gap));
    }

    #[test]
    fn peak_spans_both_directions() {
        let mut window = SampleWindow::default();
        window.push(BandwidthSample::at(
            Utc::now(),
            Throughput {
                in_kbps: Some(5.0),
                out_kbps: Some(80.0),
            },
        ));
        assert!((window.peak_kbps() - 80.0).abs() < f64::EPSILON);
        assert_eq!(window.capacity(), DEFAULT_WINDOW);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = SampleWindow::with_capacity(0);
        window.push(sample(1.0));
        window.push(sample(2.0));
        assert_eq!(window.len(), 1);
    }
}
