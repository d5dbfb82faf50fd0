// ── Command API ──
//
// Operator actions flow through a single `Command` enum. The controller
// forwards each one over its command channel to the dispatcher, which
// talks to the backend and keeps the directory in step.

mod dispatch;

use std::net::IpAddr;

use bytes::Bytes;

use crate::error::CoreError;
use crate::model::{Device, EnrichKind};

pub(crate) use dispatch::dispatch;

/// A command plus the channel its result goes back on.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// Operator actions against the backend.
#[derive(Debug, Clone)]
pub enum Command {
    /// Re-read the full directory.
    Refresh,
    /// Run a discovery scan; the result becomes the directory.
    Scan,
    /// Ask the backend for its snapshot file.
    Export,
    /// Upload a snapshot file, then refresh the directory.
    Import { file_name: String, content: Vec<u8> },
    /// Enrich one device, then re-read its record.
    Enrich { kind: EnrichKind, ip: IpAddr },
}

impl Command {
    /// Short label for logs and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Scan => "scan",
            Self::Export => "export",
            Self::Import { .. } => "import",
            Self::Enrich { .. } => "enrich",
        }
    }
}

/// What a successfully dispatched command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Directory now holds `count` devices.
    Refreshed { count: usize },
    Scanned { count: usize },
    /// Raw snapshot file contents.
    Exported(Bytes),
    Imported { count: u64 },
    /// Fresh record of the enriched device.
    Enriched(Box<Device>),
}
