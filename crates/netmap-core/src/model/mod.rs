// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. API wire types are
// converted into these in `convert.rs`.

pub mod device;
pub mod entity_id;
pub mod telemetry;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{Device, DeviceIcon, DeviceType, Port, PromotableClass, format_uptime};
pub use entity_id::{DeviceId, MacAddress};
pub use telemetry::{BandwidthSample, SampleKey, SampleWindow, Throughput, DEFAULT_WINDOW};

pub use netmap_api::EnrichKind;
