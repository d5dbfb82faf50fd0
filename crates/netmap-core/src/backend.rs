// ── Backend seam ──
//
// Traits the workflows are written against. `DirectoryClient` is the
// production implementation; tests substitute in-memory doubles.

use std::future::Future;
use std::net::IpAddr;

use bytes::Bytes;
use netmap_api::DirectoryClient;

use crate::convert::devices_from_records;
use crate::error::CoreError;
use crate::model::{Device, EnrichKind, MacAddress, PromotableClass, Throughput};

/// Everything the dispatcher and promotion workflow need from the backend.
pub trait DirectoryBackend: Send + Sync {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn scan(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn export_snapshot(&self) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    fn import_snapshot(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn change_type(
        &self,
        ip: IpAddr,
        class: PromotableClass,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn enrich(
        &self,
        kind: EnrichKind,
        ip: IpAddr,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn cidr(&self) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn snmp_version(
        &self,
        ip: IpAddr,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    /// Fetch the directory and pick one device out of it.
    fn device(&self, ip: IpAddr) -> impl Future<Output = Result<Device, CoreError>> + Send {
        async move {
            self.list_devices()
                .await?
                .into_iter()
                .find(|d| d.ip == ip)
                .ok_or(CoreError::DeviceNotFound { ip })
        }
    }
}

/// One bandwidth reading per call, keyed by `(ip, mac)`.
pub trait BandwidthSource: Send + Sync + 'static {
    fn sample(
        &self,
        ip: IpAddr,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<Throughput, CoreError>> + Send;
}

// ── Production implementation ───────────────────────────────────────

impl DirectoryBackend for DirectoryClient {
    async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(devices_from_records(DirectoryClient::list_devices(self).await?))
    }

    async fn scan(&self) -> Result<Vec<Device>, CoreError> {
        Ok(devices_from_records(DirectoryClient::scan(self).await?))
    }

    async fn export_snapshot(&self) -> Result<Bytes, CoreError> {
        Ok(DirectoryClient::export_snapshot(self).await?)
    }

    async fn import_snapshot(&self, file_name: &str, content: Vec<u8>) -> Result<u64, CoreError> {
        Ok(DirectoryClient::import_snapshot(self, file_name, content).await?)
    }

    async fn change_type(&self, ip: IpAddr, class: PromotableClass) -> Result<(), CoreError> {
        Ok(DirectoryClient::change_type(self, &ip.to_string(), class.backend_name()).await?)
    }

    async fn enrich(&self, kind: EnrichKind, ip: IpAddr) -> Result<(), CoreError> {
        Ok(DirectoryClient::enrich(self, kind, &ip.to_string()).await?)
    }

    async fn cidr(&self) -> Result<String, CoreError> {
        Ok(DirectoryClient::cidr(self).await?)
    }

    async fn snmp_version(&self, ip: IpAddr) -> Result<Option<String>, CoreError> {
        Ok(DirectoryClient::snmp_version(self, &ip.to_string()).await?)
    }
}

impl BandwidthSource for DirectoryClient {
    async fn sample(&self, ip: IpAddr, mac: &MacAddress) -> Result<Throughput, CoreError> {
        let reading = self.bandwidth(&ip.to_string(), mac.as_str()).await?;
        Ok(Throughput::from(reading))
    }
}
