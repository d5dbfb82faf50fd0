// In-memory doubles for workflow tests.

#![allow(clippy::unwrap_used)]

use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;

use crate::backend::DirectoryBackend;
use crate::error::CoreError;
use crate::model::{Device, DeviceType, EnrichKind, PromotableClass};

/// In-memory backend shared by workflow tests.
#[derive(Default)]
pub(crate) struct MemoryBackend {
    pub devices: Mutex<Vec<Device>>,
    pub scan_result: Mutex<Vec<Device>>,
    pub fail_mutations: Mutex<bool>,
    pub fail_reads: Mutex<bool>,
    pub list_calls: AtomicU32,
    pub change_calls: AtomicU32,
    pub enrich_calls: Mutex<Vec<(EnrichKind, IpAddr)>>,
    pub imported: Mutex<Vec<(String, usize)>>,
}

impl MemoryBackend {
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    fn mutation_guard(&self) -> Result<(), CoreError> {
        if *self.fail_mutations.lock().unwrap() {
            return Err(CoreError::Backend {
                status: Some(500),
                message: "mutation failed".into(),
            });
        }
        Ok(())
    }
}

impl DirectoryBackend for MemoryBackend {
    async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.lock().unwrap() {
            return Err(CoreError::Transport {
                url: "memory".into(),
                reason: "unreachable".into(),
            });
        }
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn scan(&self) -> Result<Vec<Device>, CoreError> {
        self.mutation_guard()?;
        let found = self.scan_result.lock().unwrap().clone();
        self.devices.lock().unwrap().clone_from(&found);
        Ok(found)
    }

    async fn export_snapshot(&self) -> Result<Bytes, CoreError> {
        self.mutation_guard()?;
        let count = self.devices.lock().unwrap().len();
        Ok(Bytes::from(format!("{{\"count\": {count}}}")))
    }

    async fn import_snapshot(&self, file_name: &str, content: Vec<u8>) -> Result<u64, CoreError> {
        self.mutation_guard()?;
        self.imported
            .lock()
            .unwrap()
            .push((file_name.to_owned(), content.len()));
        Ok(2)
    }

    async fn change_type(&self, ip: IpAddr, class: PromotableClass) -> Result<(), CoreError> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_guard()?;
        let mut devices = self.devices.lock().unwrap();
        let device = devices
            .iter_mut()
            .find(|d| d.ip == ip)
            .ok_or(CoreError::DeviceNotFound { ip })?;
        device.device_type = class.device_type();
        Ok(())
    }

    async fn enrich(&self, kind: EnrichKind, ip: IpAddr) -> Result<(), CoreError> {
        self.mutation_guard()?;
        self.enrich_calls.lock().unwrap().push((kind, ip));
        if let Some(d) = self.devices.lock().unwrap().iter_mut().find(|d| d.ip == ip) {
            d.snmp_version = Some("v2c".into());
        }
        Ok(())
    }

    async fn cidr(&self) -> Result<String, CoreError> {
        Ok("10.0.0.0/24".into())
    }

    async fn snmp_version(&self, _ip: IpAddr) -> Result<Option<String>, CoreError> {
        Ok(None)
    }
}

pub(crate) fn tagged_device(last_octet: u8, tags: &[&str]) -> Device {
    let mut d = Device::new(IpAddr::from([10, 0, 0, last_octet]));
    d.device_type = DeviceType::Lan;
    d.tags = tags.iter().map(|t| (*t).to_owned()).collect();
    d
}
