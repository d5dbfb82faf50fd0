// ── Bandwidth telemetry sampler ──
//
// Per-view polling loop: one request per tick against a single
// `(ip, mac)` identity, appended to a bounded FIFO window. The sampler owns
// its background task; retargeting or dropping it cancels the task before
// anything else happens. Requests are fired on the tick and never wait on
// each other. Every poll loop is tagged with an epoch and may only append
// while that epoch is current, so a response that was already in flight
// when the identity changed is discarded. Within one epoch a response older
// than the newest appended tick is dropped too.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::BandwidthSource;
use crate::model::{BandwidthSample, DEFAULT_WINDOW, SampleKey, SampleWindow};

/// Lifecycle of one sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Created, never started.
    Idle,
    /// A poll loop is running.
    Polling,
    /// Stopped explicitly; the window keeps its last contents.
    Stopped,
}

/// Tick period and window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    pub period: Duration,
    pub capacity: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            capacity: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone)]
struct Feed {
    epoch: u64,
    /// Newest tick appended in this epoch.
    tick: u64,
    window: SampleWindow,
}

/// Read side of a sampler's window.
#[derive(Debug, Clone)]
pub struct SampleFeed {
    receiver: watch::Receiver<Feed>,
}

impl SampleFeed {
    /// Current window contents.
    pub fn latest(&self) -> SampleWindow {
        self.receiver.borrow().window.clone()
    }

    /// Wait for the window to change. Returns `None` once the sampler is gone.
    pub async fn changed(&mut self) -> Option<SampleWindow> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().window.clone())
    }
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Scoped bandwidth sampler for one device view.
pub struct BandwidthSampler<S: BandwidthSource> {
    source: Arc<S>,
    settings: SamplerSettings,
    feed: Arc<watch::Sender<Feed>>,
    state: SamplerState,
    key: Option<SampleKey>,
    epoch: u64,
    task: Option<PollTask>,
}

impl<S: BandwidthSource> BandwidthSampler<S> {
    pub fn new(source: Arc<S>, settings: SamplerSettings) -> Self {
        let (feed, _) = watch::channel(Feed {
            epoch: 0,
            tick: 0,
            window: SampleWindow::with_capacity(settings.capacity),
        });
        Self {
            source,
            settings,
            feed: Arc::new(feed),
            state: SamplerState::Idle,
            key: None,
            epoch: 0,
            task: None,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Identity currently (or last) sampled.
    pub fn key(&self) -> Option<&SampleKey> {
        self.key.as_ref()
    }

    pub fn settings(&self) -> SamplerSettings {
        self.settings
    }

    /// Snapshot of the window.
    pub fn window(&self) -> SampleWindow {
        self.feed.borrow().window.clone()
    }

    pub fn subscribe(&self) -> SampleFeed {
        SampleFeed {
            receiver: self.feed.subscribe(),
        }
    }

    /// Start sampling `key`, cancelling any previous loop first.
    ///
    /// Switching to a different identity empties the window; restarting
    /// the same identity keeps what was collected.
    pub fn start(&mut self, key: SampleKey) {
        self.cancel_task();

        let same_identity = self.key.as_ref() == Some(&key);
        self.epoch += 1;
        let epoch = self.epoch;
        self.feed.send_modify(|feed| {
            feed.epoch = epoch;
            feed.tick = 0;
            if !same_identity {
                feed.window.clear();
            }
        });

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.source),
            key.clone(),
            epoch,
            self.settings.period,
            Arc::clone(&self.feed),
            cancel.clone(),
        ));

        debug!(%key, epoch, "bandwidth sampler started");
        self.task = Some(PollTask { cancel, handle });
        self.key = Some(key);
        self.state = SamplerState::Polling;
    }

    /// Stop polling. Samples already collected stay in the window.
    pub fn stop(&mut self) {
        if self.state != SamplerState::Polling {
            return;
        }
        self.cancel_task();
        self.epoch += 1;
        let epoch = self.epoch;
        self.feed.send_modify(|feed| feed.epoch = epoch);
        self.state = SamplerState::Stopped;
        debug!("bandwidth sampler stopped");
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel.cancel();
            task.handle.abort();
        }
    }
}

impl<S: BandwidthSource> Drop for BandwidthSampler<S> {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

async fn poll_loop<S: BandwidthSource>(
    source: Arc<S>,
    key: SampleKey,
    epoch: u64,
    period: Duration,
    feed: Arc<watch::Sender<Feed>>,
    cancel: CancellationToken,
) {
    // First request goes out one period after start.
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Dropped with the loop, which aborts whatever is still in flight.
    let mut requests = JoinSet::new();
    let mut tick = 0u64;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tick += 1;
                requests.spawn(sample_once(
                    Arc::clone(&source),
                    key.clone(),
                    epoch,
                    tick,
                    Arc::clone(&feed),
                ));
            }
            Some(_) = requests.join_next(), if !requests.is_empty() => {}
        }
    }

    requests.abort_all();
}

async fn sample_once<S: BandwidthSource>(
    source: Arc<S>,
    key: SampleKey,
    epoch: u64,
    tick: u64,
    feed: Arc<watch::Sender<Feed>>,
) {
    let throughput = match source.sample(key.ip, &key.mac).await {
        Ok(throughput) => throughput,
        Err(e) => {
            warn!(%key, tick, error = %e, "bandwidth sample failed, skipping tick");
            return;
        }
    };

    let sample = BandwidthSample::at(Utc::now(), throughput);
    let appended = feed.send_if_modified(|state| {
        if state.epoch != epoch || state.tick >= tick {
            return false;
        }
        state.tick = tick;
        state.window.push(sample);
        true
    });
    if !appended {
        debug!(%key, tick, "discarding stale bandwidth sample");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::{MacAddress, Throughput};
    use std::collections::HashSet;
    use std::net::IpAddr;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Returns an increasing inbound value per call; fails on listed calls.
    /// Listed addresses answer after 3s with a marker value; listed calls
    /// answer after 2.5s.
    #[derive(Default)]
    struct ScriptedSource {
        calls: AtomicU32,
        failing_calls: Mutex<HashSet<u32>>,
        slow_ips: Mutex<HashSet<IpAddr>>,
        slow_calls: Mutex<HashSet<u32>>,
    }

    impl BandwidthSource for ScriptedSource {
        async fn sample(&self, ip: IpAddr, _mac: &MacAddress) -> Result<Throughput, CoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let slow = self.slow_ips.lock().unwrap().contains(&ip);
            if slow {
                tokio::time::sleep(Duration::from_secs(3)).await;
            } else if self.slow_calls.lock().unwrap().contains(&call) {
                tokio::time::sleep(Duration::from_millis(2_500)).await;
            }
            if self.failing_calls.lock().unwrap().contains(&call) {
                return Err(CoreError::Timeout);
            }
            let marker = if slow { 9_999.0 } else { f64::from(call) };
            Ok(Throughput {
                in_kbps: Some(marker),
                out_kbps: Some(45.0),
            })
        }
    }

    fn key(last_octet: u8) -> SampleKey {
        SampleKey::new(
            IpAddr::from([10, 0, 0, last_octet]),
            MacAddress::new("aa:bb:cc:dd:ee:ff"),
        )
    }

    fn inbound(window: &SampleWindow) -> Vec<f64> {
        window.iter().filter_map(|s| s.in_kbps).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn buffer_grows_one_sample_per_tick() {
        let source = Arc::new(ScriptedSource::default());
        let mut sampler = BandwidthSampler::new(source, SamplerSettings::default());
        assert_eq!(sampler.state(), SamplerState::Idle);

        sampler.start(key(5));
        assert_eq!(sampler.state(), SamplerState::Polling);

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(sampler.window().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn window_settles_at_sixty_most_recent() {
        let source = Arc::new(ScriptedSource::default());
        let mut sampler = BandwidthSampler::new(source, SamplerSettings::default());
        sampler.start(key(5));

        tokio::time::sleep(Duration::from_millis(65_500)).await;
        let window = sampler.window();
        assert_eq!(window.len(), 60);

        let values = inbound(&window);
        let expected: Vec<f64> = (6..=65).map(f64::from).collect();
        assert_eq!(values, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_ticks_do_not_change_length() {
        let source = Arc::new(ScriptedSource::default());
        source.failing_calls.lock().unwrap().extend([3, 4, 5]);
        let mut sampler = BandwidthSampler::new(Arc::clone(&source), SamplerSettings::default());
        sampler.start(key(5));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(sampler.window().len(), 2);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(sampler.window().len(), 2);
        assert_eq!(sampler.state(), SamplerState::Polling);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(inbound(&sampler.window()), vec![1.0, 2.0, 6.0, 7.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_identity_drops_stale_samples() {
        let source = Arc::new(ScriptedSource::default());
        source
            .slow_ips
            .lock()
            .unwrap()
            .insert(IpAddr::from([10, 0, 0, 1]));
        let mut sampler = BandwidthSampler::new(source, SamplerSettings::default());

        // X's first request goes out at t=1s and would answer at t=4s.
        sampler.start(key(1));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(sampler.window().is_empty());

        sampler.start(key(2));
        tokio::time::sleep(Duration::from_millis(6_500)).await;

        let values = inbound(&sampler.window());
        assert_eq!(values.len(), 6);
        assert!(values.iter().all(|v| *v < 9_999.0), "stale sample leaked: {values:?}");
        assert_eq!(sampler.key(), Some(&key(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_window() {
        let source = Arc::new(ScriptedSource::default());
        let mut sampler = BandwidthSampler::new(source, SamplerSettings::default());
        sampler.start(key(5));
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        sampler.stop();
        assert_eq!(sampler.state(), SamplerState::Stopped);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sampler.window().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_observes_appends_and_closes_on_drop() {
        let source = Arc::new(ScriptedSource::default());
        let mut sampler = BandwidthSampler::new(source, SamplerSettings::default());
        let mut feed = sampler.subscribe();
        sampler.start(key(5));

        // The start itself publishes an (empty) window.
        let first = feed.changed().await.unwrap();
        assert!(first.is_empty());
        let next = feed.changed().await.unwrap();
        assert_eq!(next.len(), 1);

        drop(sampler);
        assert!(feed.changed().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_answers_do_not_hold_back_ticks() {
        let source = Arc::new(ScriptedSource::default());
        source
            .slow_ips
            .lock()
            .unwrap()
            .insert(IpAddr::from([10, 0, 0, 5]));
        let mut sampler = BandwidthSampler::new(Arc::clone(&source), SamplerSettings::default());
        sampler.start(key(5));

        // Ticks at 1..=20s, each answered 3s later.
        tokio::time::sleep(Duration::from_millis(20_500)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 20);
        assert_eq!(sampler.window().len(), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn late_answer_is_dropped_once_newer_ticks_landed() {
        let source = Arc::new(ScriptedSource::default());
        source.slow_calls.lock().unwrap().insert(1);
        let mut sampler = BandwidthSampler::new(Arc::clone(&source), SamplerSettings::default());
        sampler.start(key(5));

        // Call 1 goes out at 1s and answers at 3.5s, after ticks 2 and 3.
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(inbound(&sampler.window()), vec![2.0, 3.0, 4.0, 5.0]);
    }
}
