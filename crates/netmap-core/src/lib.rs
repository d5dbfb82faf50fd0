//! Reactive data layer between `netmap-api` and the netmap front ends.
//!
//! - **[`Controller`]**: facade over one backend. [`connect()`](Controller::connect)
//!   loads the directory and starts the command processor;
//!   [`Controller::oneshot()`](Controller::oneshot) is the single-request mode
//!   used by the CLI.
//!
//! - **[`DeviceDirectory`]**: the shared device snapshot. Refreshes replace it
//!   wholesale and the last one to complete wins.
//!
//! - **[`TopologyView`]**: graph nodes synthesized from a snapshot, with
//!   operator-drawn edges that are discarded on every rebuild.
//!
//! - **[`BandwidthSampler`]**: per-view polling loop feeding a bounded
//!   [`SampleWindow`].
//!
//! - **[`Command`]** and [`promote()`](promotion::promote): operator actions
//!   and the tag-driven reclassification workflow.

pub mod backend;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod promotion;
pub mod sampler;
pub mod store;
pub mod stream;
pub mod topology;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{BandwidthSource, DirectoryBackend};
pub use command::{Command, CommandResult};
pub use config::{ClientConfig, DEFAULT_BACKEND_URL};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use promotion::{Confirmation, PromotionOutcome, PromotionRequest};
pub use sampler::{BandwidthSampler, SampleFeed, SamplerSettings, SamplerState};
pub use store::DeviceDirectory;
pub use stream::{EntityStream, Snapshot};
pub use netmap_api::DirectoryClient;
pub use topology::{CidrLabel, Handle, NodeId, NodeStatus, TopologyEdge, TopologyGraph, TopologyView};

pub use model::{
    BandwidthSample, Device, DeviceIcon, DeviceId, DeviceType, EnrichKind, MacAddress, Port,
    PromotableClass, SampleKey, SampleWindow, Throughput,
};
