//! Data bridge: forwards controller state into the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use netmap_core::{CidrLabel, ConnectionState, Controller};

use crate::action::Action;

/// Connect, push the initial snapshot and CIDR label, then forward every
/// directory change and connection-state transition until cancelled.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to backend");
        let _ = action_tx.send(Action::Disconnected(e.to_string()));
        return;
    }
    let _ = action_tx.send(Action::Connected);

    let mut devices = controller.devices_stream();
    let mut conn_state = controller.connection_state();
    let _ = action_tx.send(Action::DevicesUpdated(devices.current().clone()));

    // Fetched once; the label never blocks the graph.
    let cidr = CidrLabel::from_result(controller.cidr().await);
    let _ = action_tx.send(Action::CidrLoaded(cidr));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = devices.changed() => {
                debug!(devices = snapshot.len(), "dispatching DevicesUpdated");
                let _ = action_tx.send(Action::DevicesUpdated(snapshot));
            }
            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                match state {
                    ConnectionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    ConnectionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("disconnected".into()));
                    }
                    ConnectionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("connection failed".into()));
                    }
                    ConnectionState::Connecting => {}
                }
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge shut down");
}
