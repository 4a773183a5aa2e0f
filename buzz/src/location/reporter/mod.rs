//! The location reporter engine.
//!
//! [`LocationReporter`] turns a stream of device positions into throttled
//! `POST /driver/location` calls:
//!
//! - positions come from the foreground watch and from the background bridge
//! - each one passes the distance/time [`SendThrottle`]
//! - survivors overwrite a single pending slot (most recent wins)
//! - at most one send is in flight; failures retry with exponential backoff
//!
//! # Concurrency
//!
//! All mutable state lives in one `parking_lot::Mutex`. The lock is never
//! held across an `.await` or while calling into the platform, the transport
//! or the bridge. Every `start`/`stop` cycle bumps a generation counter; send
//! completions and retry timers carry the generation they were created in
//! and are ignored once it is stale.
//!
//! Lock order is bridge, then reporter: bridge handlers call into the
//! reporter while the bridge lock is held, so the reporter never touches the
//! bridge while holding its own lock.


use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::backoff::Backoff;
use super::bridge::{self, BackgroundBridge, HandlerId};
use super::config::{ReporterConfig, DRIVER_LOCATION_TASK};
use super::error::ReporterError;
use super::platform::{
    BackgroundUpdateOptions, LocationAccuracy, LocationPlatform, PlatformError, SampleCallback,
    WatchOptions, WatchSubscription,
};
use super::sample::PositionSample;
use super::state::{ReporterSnapshot, ReporterStatus};
use super::throttle::{SendThrottle, SentMarker};
use super::transport::{LocationTransport, LocationUpdate, TransportError};

/// Reports the device position for one subject (bus).
///
/// Created idle. Call [`start`](Self::start) to request permission and begin
/// watching, [`stop`](Self::stop) to tear everything down. Dropping the
/// reporter removes the watch and the bridge handler but cannot stop
/// OS-level background updates; call `stop` first for that.
pub struct LocationReporter {
    shared: Arc<Shared>,
}

struct Shared {
    config: ReporterConfig,
    throttle: SendThrottle,
    platform: Arc<dyn LocationPlatform>,
    transport: Arc<dyn LocationTransport>,
    bridge: Arc<BackgroundBridge>,
    state: Mutex<Inner>,
    snapshot_tx: watch::Sender<ReporterSnapshot>,
}

struct RetryTimer {
    id: u64,
    handle: JoinHandle<()>,
}

struct Inner {
    subject_id: Option<String>,
    status: ReporterStatus,
    last_error: Option<String>,
    last_location: Option<PositionSample>,

    /// Bumped on every start and stop.
    generation: u64,
    /// Between the beginning of `start` and the next `stop` or failed start.
    active: bool,
    watcher: Option<Box<dyn WatchSubscription>>,
    handler_id: Option<HandlerId>,
    background_enabled: bool,
    runtime: Option<Handle>,

    last_sent: Option<SentMarker>,
    pending: Option<PositionSample>,
    sending: bool,
    retry_timer: Option<RetryTimer>,
    next_timer_id: u64,
    backoff: Backoff,
}

impl Inner {
    fn snapshot(&self) -> ReporterSnapshot {
        ReporterSnapshot {
            status: self.status,
            last_error: self.last_error.clone(),
            last_location: self.last_location,
            background_active: self.background_enabled,
        }
    }
}

impl LocationReporter {
    /// Create an idle reporter using the process-wide background bridge.
    pub fn new(
        subject_id: Option<String>,
        config: ReporterConfig,
        platform: Arc<dyn LocationPlatform>,
        transport: Arc<dyn LocationTransport>,
    ) -> Self {
        Self::with_bridge(subject_id, config, platform, transport, bridge::global())
    }

    pub(crate) fn with_bridge(
        subject_id: Option<String>,
        config: ReporterConfig,
        platform: Arc<dyn LocationPlatform>,
        transport: Arc<dyn LocationTransport>,
        bridge: Arc<BackgroundBridge>,
    ) -> Self {
        let throttle = SendThrottle::new(config.distance_threshold_m, config.time_threshold);
        let backoff = Backoff::new(config.initial_backoff, config.max_backoff);
        let inner = Inner {
            subject_id,
            status: ReporterStatus::Idle,
            last_error: None,
            last_location: None,
            generation: 0,
            active: false,
            watcher: None,
            handler_id: None,
            background_enabled: false,
            runtime: None,
            last_sent: None,
            pending: None,
            sending: false,
            retry_timer: None,
            next_timer_id: 0,
            backoff,
        };
        let (snapshot_tx, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                config,
                throttle,
                platform,
                transport,
                bridge,
                state: Mutex::new(inner),
                snapshot_tx,
            }),
        }
    }

    /// Request permission and begin watching the position.
    ///
    /// Does nothing if a watch is already open. On failure the reporter ends
    /// in [`ReporterStatus::Error`] with `last_error` set; background-update
    /// problems never fail a start.
    pub async fn start(&self) {
        let shared = &self.shared;

        let generation = {
            let mut inner = shared.state.lock();
            if inner.subject_id.is_none() {
                let error = ReporterError::MissingSubject;
                warn!(error = %error, "Cannot start location sharing");
                inner.status = ReporterStatus::Error;
                inner.last_error = Some(error.to_string());
                shared.publish(&inner);
                return;
            }
            if inner.watcher.is_some() {
                inner.status = ReporterStatus::Running;
                shared.publish(&inner);
                return;
            }
            if inner.active {
                debug!("Location reporter start already in progress");
                return;
            }
            let Ok(runtime) = Handle::try_current() else {
                let error = ReporterError::NoRuntime;
                warn!(error = %error, "Cannot start location sharing");
                inner.status = ReporterStatus::Error;
                inner.last_error = Some(error.to_string());
                shared.publish(&inner);
                return;
            };

            inner.generation += 1;
            inner.active = true;
            inner.last_error = None;
            inner.backoff.reset();
            inner.runtime = Some(runtime);
            shared.publish(&inner);
            inner.generation
        };

        match shared.open_watch(generation).await {
            Ok(true) => shared.start_background(generation).await,
            Ok(false) => {}
            Err(error) => shared.fail_start(generation, error).await,
        }
    }

    /// Stop watching, cancel retries and stop background updates.
    ///
    /// Pending samples are dropped. A send already in flight is not
    /// cancelled; its result is ignored. `last_error` is kept.
    pub async fn stop(&self) {
        let background_was_enabled = self.shared.teardown();
        self.shared.stop_background_updates(background_was_enabled).await;
        info!("Location sharing stopped");
    }

    /// Replace the subject identifier.
    ///
    /// Clearing it stops the reporter. A new identifier applies to the next
    /// update sent.
    pub async fn set_subject_id(&self, subject_id: Option<String>) {
        let cleared = subject_id.is_none();
        self.shared.state.lock().subject_id = subject_id;
        if cleared {
            self.stop().await;
        }
    }

    /// Feed a position into the reporter as if the platform delivered it.
    pub fn queue_location(&self, sample: PositionSample) {
        self.shared.queue_location(sample);
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ReporterStatus {
        self.shared.state.lock().status
    }

    /// Most recent error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.shared.state.lock().last_error.clone()
    }

    /// Most recent position seen.
    pub fn last_location(&self) -> Option<PositionSample> {
        self.shared.state.lock().last_location
    }

    /// Current subject identifier.
    pub fn subject_id(&self) -> Option<String> {
        self.shared.state.lock().subject_id.clone()
    }

    /// Everything observable, captured atomically.
    pub fn snapshot(&self) -> ReporterSnapshot {
        self.shared.state.lock().snapshot()
    }

    /// Receive a new snapshot on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ReporterSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReporterConfig {
        &self.shared.config
    }
}

impl Drop for LocationReporter {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.snapshot_tx.send_replace(inner.snapshot());
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Callback handed to the platform watch and the bridge.
    fn sample_callback(self: &Arc<Self>) -> SampleCallback {
        let weak: Weak<Shared> = Arc::downgrade(self);
        Arc::new(move |sample| {
            if let Some(shared) = weak.upgrade() {
                shared.queue_location(sample);
            }
        })
    }

    fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            accuracy: LocationAccuracy::Balanced,
            distance_interval_m: self.config.distance_threshold_m,
            time_interval: self.config.time_threshold,
        }
    }

    fn background_options(&self) -> BackgroundUpdateOptions {
        let service = &self.config.background_service;
        BackgroundUpdateOptions {
            accuracy: LocationAccuracy::Balanced,
            distance_interval_m: self.config.distance_threshold_m,
            time_interval: self.config.time_threshold,
            pauses_updates_automatically: false,
            shows_background_indicator: true,
            notification_title: service.notification_title.clone(),
            notification_body: service.notification_body.clone(),
        }
    }

    /// Returns `Ok(false)` if a stop overtook the start.
    async fn open_watch(self: &Arc<Self>, generation: u64) -> Result<bool, ReporterError> {
        let permission = self
            .platform
            .request_foreground_permission()
            .await
            .map_err(|e| ReporterError::PermissionRequest(e.to_string()))?;
        if !permission.is_granted() {
            return Err(ReporterError::PermissionDenied);
        }
        if !self.is_current(generation) {
            return Ok(false);
        }

        let subscription = self
            .platform
            .watch_position(self.watch_options(), self.sample_callback())
            .await
            .map_err(|e| ReporterError::Watch(e.to_string()))?;

        let mut unclaimed = Some(subscription);
        let subject_id = {
            let mut inner = self.state.lock();
            if inner.generation == generation {
                inner.watcher = unclaimed.take();
                inner.status = ReporterStatus::Running;
                self.publish(&inner);
            }
            inner.subject_id.clone().unwrap_or_default()
        };
        if let Some(mut stale) = unclaimed {
            stale.remove();
            return Ok(false);
        }

        // Registering flushes buffered background samples, so it waits for
        // foreground permission and an open watch.
        let handler_id = self.bridge.register(self.sample_callback());
        {
            let mut inner = self.state.lock();
            if inner.generation != generation {
                drop(inner);
                self.bridge.unregister(handler_id);
                return Ok(false);
            }
            inner.handler_id = Some(handler_id);
        }

        info!(
            subject_id = %subject_id,
            distance_threshold_m = self.config.distance_threshold_m,
            time_threshold_ms = self.config.time_threshold.as_millis() as u64,
            "Location sharing started"
        );
        Ok(true)
    }

    /// Ends a start attempt in error. Bumps the generation so sends and
    /// retries issued during the attempt cannot touch the error state.
    async fn fail_start(&self, generation: u64, error: ReporterError) {
        let (watcher, timer, handler_id, background_was_enabled) = {
            let mut inner = self.state.lock();
            if inner.generation != generation {
                return;
            }
            warn!(error = %error, "Failed to start location sharing");
            inner.generation += 1;
            inner.active = false;
            inner.status = ReporterStatus::Error;
            inner.last_error = Some(error.to_string());
            inner.pending = None;
            inner.sending = false;
            inner.backoff.reset();
            let taken = (
                inner.watcher.take(),
                inner.retry_timer.take(),
                inner.handler_id.take(),
                std::mem::take(&mut inner.background_enabled),
            );
            self.publish(&inner);
            taken
        };

        if let Some(mut watcher) = watcher {
            watcher.remove();
        }
        if let Some(timer) = timer {
            timer.handle.abort();
        }
        if let Some(id) = handler_id {
            self.bridge.unregister(id);
        }
        self.stop_background_updates(background_was_enabled).await;
    }

    /// Best effort: any failure leaves the reporter running in foreground.
    async fn start_background(&self, generation: u64) {
        if !self.config.enable_background_updates || !self.platform.supports_background() {
            return;
        }

        match self.platform.request_background_permission().await {
            Ok(permission) if permission.is_granted() => {}
            Ok(_) => {
                info!("Background location permission not granted, sharing in foreground only");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to request background location permission");
                return;
            }
        }

        if let Err(e) = self
            .bridge
            .define_task_once(|| self.platform.define_background_task(DRIVER_LOCATION_TASK))
        {
            warn!(error = %e, task = DRIVER_LOCATION_TASK, "Failed to define background location task");
            return;
        }

        if !self.is_current(generation) {
            return;
        }

        if let Err(e) = self.restart_background_updates().await {
            warn!(error = %e, task = DRIVER_LOCATION_TASK, "Failed to start background location updates");
            return;
        }

        let stale = {
            let mut inner = self.state.lock();
            if inner.generation == generation {
                inner.background_enabled = true;
                self.publish(&inner);
            }
            inner.generation != generation
        };
        if stale {
            self.stop_background_updates(true).await;
            return;
        }
        info!(task = DRIVER_LOCATION_TASK, "Background location updates started");
    }

    async fn restart_background_updates(&self) -> Result<(), PlatformError> {
        if self
            .platform
            .has_started_location_updates(DRIVER_LOCATION_TASK)
            .await?
        {
            self.platform.stop_location_updates(DRIVER_LOCATION_TASK).await?;
        }
        self.platform
            .start_location_updates(DRIVER_LOCATION_TASK, self.background_options())
            .await
    }

    async fn stop_background_updates(&self, was_enabled: bool) {
        if !was_enabled || !self.platform.supports_background() {
            return;
        }
        let result = async {
            if self
                .platform
                .has_started_location_updates(DRIVER_LOCATION_TASK)
                .await?
            {
                self.platform.stop_location_updates(DRIVER_LOCATION_TASK).await?;
            }
            Ok::<(), PlatformError>(())
        }
        .await;
        if let Err(e) = result {
            warn!(error = %e, task = DRIVER_LOCATION_TASK, "Failed to stop background location updates");
        }
    }

    /// Synchronous part of stop. Returns whether background updates were on.
    fn teardown(&self) -> bool {
        let (watcher, timer, handler_id, background_was_enabled) = {
            let mut inner = self.state.lock();
            inner.generation += 1;
            inner.active = false;
            inner.status = ReporterStatus::Idle;
            inner.pending = None;
            inner.sending = false;
            inner.backoff.reset();
            let taken = (
                inner.watcher.take(),
                inner.retry_timer.take(),
                inner.handler_id.take(),
                std::mem::take(&mut inner.background_enabled),
            );
            self.publish(&inner);
            taken
        };

        if let Some(mut watcher) = watcher {
            watcher.remove();
        }
        if let Some(timer) = timer {
            timer.handle.abort();
        }
        if let Some(id) = handler_id {
            self.bridge.unregister(id);
        }
        background_was_enabled
    }

    fn queue_location(self: &Arc<Self>, sample: PositionSample) {
        let timer = {
            let mut inner = self.state.lock();
            inner.last_location = Some(sample);
            if !inner.active || inner.subject_id.is_none() {
                self.publish(&inner);
                return;
            }

            let decision = self
                .throttle
                .evaluate(inner.last_sent.as_ref(), &sample, Instant::now());
            if !decision.should_send() {
                debug!(?decision, "Location update throttled");
                self.publish(&inner);
                return;
            }

            inner.pending = Some(sample);
            self.publish(&inner);
            inner.retry_timer.take()
        };

        if let Some(timer) = timer {
            timer.handle.abort();
        }
        self.process_queue();
    }

    /// Start sending the pending sample unless a send is already running.
    fn process_queue(self: &Arc<Self>) {
        let (update, sample, generation, runtime) = {
            let mut inner = self.state.lock();
            if inner.sending || !inner.active {
                return;
            }
            let (Some(subject_id), Some(runtime)) =
                (inner.subject_id.clone(), inner.runtime.clone())
            else {
                return;
            };
            let Some(sample) = inner.pending.take() else {
                return;
            };
            inner.sending = true;
            (
                LocationUpdate::new(subject_id, &sample),
                sample,
                inner.generation,
                runtime,
            )
        };

        let shared = Arc::clone(self);
        runtime.spawn(async move {
            let result = shared.transport.send(update).await;
            shared.complete_send(generation, sample, result);
        });
    }

    fn complete_send(
        self: &Arc<Self>,
        generation: u64,
        sample: PositionSample,
        result: Result<(), TransportError>,
    ) {
        let drain_again = {
            let mut inner = self.state.lock();
            if inner.generation != generation {
                debug!("Ignoring send result from a stopped session");
                return;
            }
            inner.sending = false;
            let newer_pending = inner.pending.is_some();

            match result {
                Ok(()) => {
                    debug!(
                        latitude = sample.latitude,
                        longitude = sample.longitude,
                        "Location update sent"
                    );
                    inner.last_error = None;
                    inner.backoff.reset();
                    inner.last_sent = Some(SentMarker::new(sample, Instant::now()));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to send location update");
                    if !newer_pending {
                        inner.pending = Some(sample);
                    }
                    inner.last_error = Some(e.to_string());
                    if inner.retry_timer.is_none() {
                        if let Some(runtime) = inner.runtime.clone() {
                            let delay = inner.backoff.next_delay();
                            let id = inner.next_timer_id;
                            inner.next_timer_id += 1;
                            let handle = self.schedule_retry(&runtime, generation, id, delay);
                            inner.retry_timer = Some(RetryTimer { id, handle });
                        }
                    }
                }
            }

            self.publish(&inner);
            newer_pending
        };

        if drain_again {
            self.process_queue();
        }
    }

    fn schedule_retry(
        self: &Arc<Self>,
        runtime: &Handle,
        generation: u64,
        timer_id: u64,
        delay: Duration,
    ) -> JoinHandle<()> {
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling location update retry");
        let weak = Arc::downgrade(self);
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.retry_fired(generation, timer_id);
            }
        })
    }

    fn retry_fired(self: &Arc<Self>, generation: u64, timer_id: u64) {
        {
            let mut inner = self.state.lock();
            if inner.generation != generation {
                return;
            }
            if inner.retry_timer.as_ref().is_some_and(|t| t.id == timer_id) {
                inner.retry_timer = None;
            }
        }
        self.process_queue();
    }
}
