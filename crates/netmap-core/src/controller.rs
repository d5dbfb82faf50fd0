// ── Controller facade ──
//
// Lifecycle for one backend connection: initial directory load, optional
// periodic refresh, command routing, and access to the reactive directory.
// Front ends (CLI, TUI) talk to the backend only through this type.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netmap_api::{DirectoryClient, TransportConfig};

use crate::backend::DirectoryBackend;
use crate::command::{Command, CommandEnvelope, CommandResult, dispatch};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{Device, MacAddress, SampleKey};
use crate::promotion::{self, Confirmation, PromotionOutcome, PromotionRequest};
use crate::sampler::{BandwidthSampler, SamplerSettings};
use crate::store::DeviceDirectory;
use crate::stream::{EntityStream, Snapshot};

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the HTTP client, the
/// device directory and the background tasks started by
/// [`connect()`](Self::connect).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    client: Arc<DirectoryClient>,
    directory: Arc<DeviceDirectory>,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Build a controller for `config`. Does not touch the network; call
    /// [`connect()`](Self::connect) to load the directory and start tasks.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = DirectoryClient::new(config.backend_url.clone(), &transport)?;
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client: Arc::new(client),
                directory: Arc::new(DeviceDirectory::new()),
                connection_state,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The shared device directory.
    pub fn directory(&self) -> &Arc<DeviceDirectory> {
        &self.inner.directory
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Load the directory and spawn the background tasks.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.set_state(ConnectionState::Connecting);

        if let Err(e) = self.refresh().await {
            self.set_state(ConnectionState::Failed);
            return Err(e);
        }

        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval = self.inner.config.refresh_interval;
        if !interval.is_zero() {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(ctrl, interval, cancel)));
        }

        self.set_state(ConnectionState::Connected);
        info!(backend = %self.inner.config.backend_url, "connected to backend");
        Ok(())
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.set_state(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Record `state` even when nobody is subscribed yet.
    fn set_state(&self, state: ConnectionState) {
        self.inner.connection_state.send_replace(state);
    }

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Directory ────────────────────────────────────────────────

    /// Re-read the directory. Returns the new device count.
    pub async fn refresh(&self) -> Result<usize, CoreError> {
        let count = self
            .inner
            .directory
            .refresh_with(DirectoryBackend::list_devices(self.inner.client.as_ref()))
            .await?;
        debug!(devices = count, "directory refresh complete");
        Ok(count)
    }

    /// Current directory snapshot.
    pub fn devices(&self) -> Snapshot<Device> {
        self.inner.directory.snapshot()
    }

    /// Stream of directory snapshots.
    pub fn devices_stream(&self) -> EntityStream<Device> {
        self.inner.directory.subscribe()
    }

    /// Fresh read of one device, bypassing the cached snapshot.
    pub async fn device(&self, ip: IpAddr) -> Result<Device, CoreError> {
        self.inner.client.device(ip).await
    }

    /// Informational subnet label.
    pub async fn cidr(&self) -> Result<String, CoreError> {
        DirectoryBackend::cidr(self.inner.client.as_ref()).await
    }

    pub async fn snmp_version(&self, ip: IpAddr) -> Result<Option<String>, CoreError> {
        DirectoryBackend::snmp_version(self.inner.client.as_ref(), ip).await
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Execute a command via the command processor task.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::ControllerDisconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ControllerDisconnected)?;

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    /// Run the promotion workflow against this backend.
    pub async fn promote(
        &self,
        request: &PromotionRequest,
        confirmation: Confirmation,
    ) -> Result<PromotionOutcome, CoreError> {
        promotion::promote(
            self.inner.client.as_ref(),
            &self.inner.directory,
            request,
            confirmation,
        )
        .await
    }

    /// An idle sampler using this controller's client and pacing.
    pub fn bandwidth_sampler(&self) -> BandwidthSampler<DirectoryClient> {
        let settings = SamplerSettings {
            period: self.inner.config.poll_interval,
            capacity: self.inner.config.sample_window,
        };
        BandwidthSampler::new(Arc::clone(&self.inner.client), settings)
    }

    /// A sampler already polling `(ip, mac)`. Dropping it stops the loop.
    pub fn sampler(&self, ip: IpAddr, mac: MacAddress) -> BandwidthSampler<DirectoryClient> {
        let mut sampler = self.bandwidth_sampler();
        sampler.start(SampleKey::new(ip, mac));
        sampler
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Connect, run `f`, disconnect. Periodic refresh is disabled.
    pub async fn oneshot<F, Fut, T>(config: ClientConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval = Duration::ZERO;

        let controller = Controller::new(cfg)?;
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(controller: Controller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Each command runs on its own task so a slow scan or enrich never holds
/// up a refresh. In-flight commands are aborted on disconnect.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel.clone();
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let client = Arc::clone(&controller.inner.client);
                let directory = Arc::clone(&controller.inner.directory);
                in_flight.spawn(async move {
                    let label = envelope.command.label();
                    let result = dispatch(client.as_ref(), &directory, envelope.command).await;
                    if let Err(ref e) = result {
                        warn!(command = label, error = %e, "command failed");
                    }
                    let _ = envelope.response_tx.send(result);
                });
            }
        }
    }

    in_flight.shutdown().await;
}
