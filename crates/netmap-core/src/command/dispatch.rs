// Routes a `Command` to the backend and applies its effect on the directory.

use tracing::{info, warn};

use super::{Command, CommandResult};
use crate::backend::DirectoryBackend;
use crate::error::CoreError;
use crate::store::DeviceDirectory;

/// Run one command to completion.
///
/// A failed call leaves the directory exactly as it was.
pub(crate) async fn dispatch<B: DirectoryBackend>(
    backend: &B,
    directory: &DeviceDirectory,
    command: Command,
) -> Result<CommandResult, CoreError> {
    match command {
        Command::Refresh => {
            let count = directory.refresh_with(backend.list_devices()).await?;
            Ok(CommandResult::Refreshed { count })
        }
        Command::Scan => {
            // The scan response is the new directory; no follow-up read.
            let count = directory.refresh_with(backend.scan()).await?;
            info!(count, "scan complete");
            Ok(CommandResult::Scanned { count })
        }
        Command::Export => {
            let bytes = backend.export_snapshot().await?;
            info!(bytes = bytes.len(), "snapshot exported");
            Ok(CommandResult::Exported(bytes))
        }
        Command::Import { file_name, content } => {
            let count = backend.import_snapshot(&file_name, content).await?;
            info!(count, file = %file_name, "snapshot imported");
            if let Err(e) = directory.refresh_with(backend.list_devices()).await {
                warn!(error = %e, "refresh after import failed");
            }
            Ok(CommandResult::Imported { count })
        }
        Command::Enrich { kind, ip } => {
            backend.enrich(kind, ip).await?;
            info!(%ip, %kind, "enrichment finished");
            let device = backend.device(ip).await?;
            Ok(CommandResult::Enriched(Box::new(device)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::IpAddr;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::model::EnrichKind;
    use crate::testing::{MemoryBackend, tagged_device};

    fn seeded() -> (MemoryBackend, DeviceDirectory) {
        let backend = MemoryBackend::with_devices(vec![tagged_device(1, &[]), tagged_device(2, &[])]);
        let directory = DeviceDirectory::new();
        directory.replace(vec![tagged_device(1, &[])]);
        (backend, directory)
    }

    #[tokio::test]
    async fn scan_replaces_directory_without_extra_read() {
        let (backend, directory) = seeded();
        *backend.scan_result.lock().unwrap() =
            vec![tagged_device(7, &[]), tagged_device(8, &[]), tagged_device(9, &[])];

        let result = dispatch(&backend, &directory, Command::Scan).await.unwrap();

        assert_eq!(result, CommandResult::Scanned { count: 3 });
        let ips: Vec<IpAddr> = directory.snapshot().iter().map(|d| d.ip).collect();
        assert_eq!(
            ips,
            vec![
                IpAddr::from([10, 0, 0, 7]),
                IpAddr::from([10, 0, 0, 8]),
                IpAddr::from([10, 0, 0, 9]),
            ]
        );
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_scan_keeps_previous_snapshot() {
        let (backend, directory) = seeded();
        *backend.fail_mutations.lock().unwrap() = true;

        let err = dispatch(&backend, &directory, Command::Scan).await.unwrap_err();

        assert!(matches!(err, CoreError::Backend { .. }));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.version(), 1);
    }

    #[tokio::test]
    async fn export_returns_bytes_and_leaves_directory() {
        let (backend, directory) = seeded();

        let result = dispatch(&backend, &directory, Command::Export).await.unwrap();

        let CommandResult::Exported(bytes) = result else {
            panic!("expected Exported, got {result:?}");
        };
        assert_eq!(&bytes[..], br#"{"count": 2}"#);
        assert_eq!(directory.version(), 1);
    }

    #[tokio::test]
    async fn import_refreshes_directory_on_success() {
        let (backend, directory) = seeded();

        let result = dispatch(
            &backend,
            &directory,
            Command::Import {
                file_name: "network_data.json".into(),
                content: b"[]".to_vec(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result, CommandResult::Imported { count: 2 });
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(directory.len(), 2);
        assert_eq!(
            backend.imported.lock().unwrap().as_slice(),
            &[("network_data.json".to_owned(), 2)]
        );
    }

    #[tokio::test]
    async fn failed_import_skips_refresh() {
        let (backend, directory) = seeded();
        *backend.fail_mutations.lock().unwrap() = true;

        let result = dispatch(
            &backend,
            &directory,
            Command::Import {
                file_name: "broken.json".into(),
                content: Vec::new(),
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn enrich_refetches_the_device() {
        let (backend, directory) = seeded();
        let ip = IpAddr::from([10, 0, 0, 2]);

        let result = dispatch(
            &backend,
            &directory,
            Command::Enrich {
                kind: EnrichKind::Both,
                ip,
            },
        )
        .await
        .unwrap();

        let CommandResult::Enriched(device) = result else {
            panic!("expected Enriched, got {result:?}");
        };
        assert_eq!(device.ip, ip);
        assert_eq!(device.snmp_version.as_deref(), Some("v2c"));
        assert_eq!(
            backend.enrich_calls.lock().unwrap().as_slice(),
            &[(EnrichKind::Both, ip)]
        );
    }

    #[tokio::test]
    async fn enrich_of_unknown_device_is_not_found() {
        let (backend, directory) = seeded();
        let ip = IpAddr::from([10, 0, 0, 99]);

        let err = dispatch(&backend, &directory, Command::Enrich { kind: EnrichKind::Nmap, ip })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DeviceNotFound { ip: missing } if missing == ip));
    }
}
