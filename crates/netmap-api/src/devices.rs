// Device endpoints
//
// Listing, discovery scan, snapshot import/export, per-device telemetry,
// reclassification and enrichment under `/api/devices`.

use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use crate::client::DirectoryClient;
use crate::error::Error;
use crate::models::{
    BandwidthReading, CidrResponse, DeviceList, DeviceRecord, EnrichKind, ImportResponse,
    SnmpVersionResponse,
};

impl DirectoryClient {
    /// List every device the backend currently knows about.
    ///
    /// `GET /api/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("devices")?;
        let list: DeviceList = self.get(url).await?;
        debug!(count = list.devices.len(), "listed devices");
        Ok(list.devices)
    }

    /// Run a discovery scan and return the freshly discovered set.
    ///
    /// `POST /api/devices/scan`
    pub async fn scan(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("devices/scan")?;
        let list: DeviceList = self.post(url).await?;
        debug!(count = list.devices.len(), "scan finished");
        Ok(list.devices)
    }

    /// Download the backend's snapshot file.
    ///
    /// `GET /api/devices/export` (returns the file content verbatim)
    pub async fn export_snapshot(&self) -> Result<Bytes, Error> {
        let url = self.api_url("devices/export")?;
        let bytes = self.get_bytes(url).await?;
        debug!(size = bytes.len(), "downloaded snapshot");
        Ok(bytes)
    }

    /// Upload a snapshot file. Returns the number of imported records.
    ///
    /// `POST /api/devices/import` as `multipart/form-data` with a single
    /// part named `file`.
    pub async fn import_snapshot(&self, file_name: &str, content: Vec<u8>) -> Result<u64, Error> {
        let url = self.api_url("devices/import")?;
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_owned())
            .mime_str("application/json")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp: ImportResponse = self.post_multipart(url, form).await?;
        if resp.status.as_deref() == Some("error") {
            return Err(Error::Rejected {
                message: resp
                    .message
                    .unwrap_or_else(|| "import failed".to_owned()),
            });
        }
        // A success answer without a count still succeeded.
        let imported = resp.imported.unwrap_or(0);
        debug!(imported, "imported snapshot");
        Ok(imported)
    }

    /// Informational subnet label for the scanning host.
    ///
    /// `GET /api/devices/cidr`
    pub async fn cidr(&self) -> Result<String, Error> {
        let url = self.api_url("devices/cidr")?;
        let resp: CidrResponse = self.get(url).await?;
        resp.cidr.ok_or_else(|| Error::Deserialization {
            message: "cidr response is missing `cidr`".into(),
            body: String::new(),
        })
    }

    /// Take one bandwidth reading for a device.
    ///
    /// `GET /api/devices/{ip}/bandwidth?mac={mac}`
    pub async fn bandwidth(&self, ip: &str, mac: &str) -> Result<BandwidthReading, Error> {
        let mut url = self.api_url(&format!("devices/{ip}/bandwidth"))?;
        url.query_pairs_mut().append_pair("mac", mac);
        self.get(url).await
    }

    /// Reclassify a device. `new_type` is the backend class name
    /// (`Router`, `Switch` or `Computer`).
    ///
    /// `POST /api/devices/{ip}/change_type` with `{"new_type": "..."}`
    pub async fn change_type(&self, ip: &str, new_type: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("devices/{ip}/change_type"))?;
        debug!(ip, new_type, "changing device type");
        self.post_discard(url, Some(&json!({ "new_type": new_type })))
            .await
    }

    /// Run an enrichment pass against one device.
    ///
    /// `POST /api/devices/enrich/{nmap|snmp|both}?ip={ip}`
    pub async fn enrich(&self, kind: EnrichKind, ip: &str) -> Result<(), Error> {
        let mut url = self.api_url(&format!("devices/enrich/{}", kind.as_path()))?;
        url.query_pairs_mut().append_pair("ip", ip);
        debug!(ip, %kind, "enriching device");
        self.post_discard(url, None::<&serde_json::Value>).await
    }

    /// Probe which SNMP version a device answers to.
    ///
    /// `GET /api/devices/{ip}/snmp_version`
    pub async fn snmp_version(&self, ip: &str) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!("devices/{ip}/snmp_version"))?;
        let resp: SnmpVersionResponse = self.get(url).await?;
        Ok(resp.snmp_version)
    }
}
