// netmap-api: Async Rust client for the netmap discovery backend

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DirectoryClient;
pub use error::Error;
pub use models::{BandwidthReading, DeviceRecord, EnrichKind, PortRecord, RecordId};
pub use transport::TransportConfig;
