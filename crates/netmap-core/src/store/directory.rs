// ── Device directory ──
//
// Process-wide cache of the current device set. A refresh replaces the
// whole snapshot; it never merges into the previous one. Overlapping
// refreshes are not serialized: whichever fetch completes last wins.

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::Device;
use crate::stream::{EntityStream, Snapshot};

/// Reactive store for the device directory.
///
/// Snapshots are published through a `watch` channel, so replacement is a
/// single atomic swap and every subscriber observes it.
pub struct DeviceDirectory {
    snapshot: watch::Sender<Snapshot<Device>>,
    /// Bumped on every replacement.
    version: watch::Sender<u64>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for DeviceDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDirectory {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        let (last_refresh, _) = watch::channel(None);
        Self {
            snapshot,
            version,
            last_refresh,
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Atomically replace the snapshot with `devices`, preserving order.
    pub fn replace(&self, devices: Vec<Device>) {
        let mut seen = std::collections::HashSet::with_capacity(devices.len());
        for device in &devices {
            if !seen.insert(device.ip) {
                warn!(ip = %device.ip, "duplicate address in directory snapshot");
            }
        }

        let snap: Snapshot<Device> = Arc::new(devices.into_iter().map(Arc::new).collect());
        debug!(count = snap.len(), "replacing directory snapshot");
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|current| *current = snap);
        self.version.send_modify(|v| *v += 1);
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    /// Await `fetch` and apply its result.
    ///
    /// On success the snapshot is replaced and the device count returned.
    /// On failure the previous snapshot is left untouched and the error
    /// is handed back to the caller.
    pub async fn refresh_with<F>(&self, fetch: F) -> Result<usize, CoreError>
    where
        F: Future<Output = Result<Vec<Device>, CoreError>>,
    {
        match fetch.await {
            Ok(devices) => {
                let count = devices.len();
                self.replace(devices);
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "directory refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot, in backend order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Snapshot<Device> {
        self.snapshot.borrow().clone()
    }

    /// First device with this address in the current snapshot.
    pub fn device_by_ip(&self, ip: IpAddr) -> Option<Arc<Device>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|d| d.ip == ip)
            .map(Arc::clone)
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> EntityStream<Device> {
        EntityStream::new(self.snapshot.subscribe())
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    /// Number of replacements applied so far.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// When the snapshot was last replaced.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn device(last_octet: u8) -> Device {
        Device::new(IpAddr::from([10, 0, 0, last_octet]))
    }

    fn ips(dir: &DeviceDirectory) -> Vec<IpAddr> {
        dir.snapshot().iter().map(|d| d.ip).collect()
    }

    #[test]
    fn replace_preserves_response_order() {
        let dir = DeviceDirectory::new();
        dir.replace(vec![device(9), device(1), device(5)]);

        assert_eq!(
            ips(&dir),
            vec![
                IpAddr::from([10, 0, 0, 9]),
                IpAddr::from([10, 0, 0, 1]),
                IpAddr::from([10, 0, 0, 5]),
            ]
        );
        assert_eq!(dir.version(), 1);
        assert!(dir.last_refresh().is_some());
    }

    #[test]
    fn replace_never_merges() {
        let dir = DeviceDirectory::new();
        dir.replace(vec![device(1), device(2)]);
        dir.replace(vec![device(3)]);

        assert_eq!(ips(&dir), vec![IpAddr::from([10, 0, 0, 3])]);
        assert!(dir.device_by_ip(IpAddr::from([10, 0, 0, 1])).is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let dir = DeviceDirectory::new();
        dir.replace(vec![device(1)]);

        let result = dir
            .refresh_with(async {
                Err(CoreError::Transport {
                    url: "http://localhost:8000".into(),
                    reason: "connection refused".into(),
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(ips(&dir), vec![IpAddr::from([10, 0, 0, 1])]);
        assert_eq!(dir.version(), 1);
    }

    #[tokio::test]
    async fn last_completed_refresh_wins() {
        let dir = DeviceDirectory::new();
        let (tx_a, rx_a) = oneshot::channel::<Vec<Device>>();
        let (tx_b, rx_b) = oneshot::channel::<Vec<Device>>();
        let mut watcher = dir.subscribe();

        // A is issued first, B second; B resolves first, A last.
        let refresh_a = dir.refresh_with(async { Ok(rx_a.await.unwrap()) });
        let refresh_b = dir.refresh_with(async { Ok(rx_b.await.unwrap()) });
        let driver = async {
            tx_b.send(vec![device(2)]).unwrap();
            watcher.changed().await.unwrap();
            tx_a.send(vec![device(1)]).unwrap();
        };

        let (a, b, ()) = tokio::join!(refresh_a, refresh_b, driver);
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);
        assert_eq!(ips(&dir), vec![IpAddr::from([10, 0, 0, 1])]);
        assert_eq!(dir.version(), 2);
    }

    #[tokio::test]
    async fn subscribers_observe_replacements() {
        let dir = DeviceDirectory::new();
        let mut stream = dir.subscribe();
        assert!(stream.current().is_empty());

        dir.replace(vec![device(7)]);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.latest().len(), 1);
    }
}
