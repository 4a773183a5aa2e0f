//! Process-wide hand-off between the OS background task and the reporter.
//!
//! Background location deliveries arrive on whatever thread the OS picks,
//! possibly before any reporter exists. The bridge holds at most one handler;
//! samples that arrive while no handler is registered are buffered in order
//! and flushed to the next handler that registers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::{debug, error};

use super::platform::{PlatformError, SampleCallback};
use super::sample::PositionSample;

/// One invocation of the OS background task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundTaskEvent {
    /// Positions delivered with this invocation, oldest first.
    pub locations: Vec<PositionSample>,
    /// Error reported by the OS instead of positions.
    pub error: Option<String>,
}

impl BackgroundTaskEvent {
    /// Event carrying positions.
    pub fn with_locations(locations: Vec<PositionSample>) -> Self {
        Self {
            locations,
            error: None,
        }
    }

    /// Event carrying an OS error.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            locations: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Identifies a registered handler so only its owner can clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HandlerId(u64);

struct BridgeSlot {
    handler: Option<(HandlerId, SampleCallback)>,
    buffer: Vec<PositionSample>,
}

pub(crate) struct BackgroundBridge {
    slot: Mutex<BridgeSlot>,
    task_defined: Mutex<bool>,
    next_id: AtomicU64,
}

impl BackgroundBridge {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(BridgeSlot {
                handler: None,
                buffer: Vec::new(),
            }),
            task_defined: Mutex::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Install `handler`, replacing any previous one, and flush the buffer
    /// into it.
    ///
    /// Handlers run under the bridge lock so buffered and live samples reach
    /// them strictly in arrival order. A handler must not call back into the
    /// bridge.
    pub(crate) fn register(&self, handler: SampleCallback) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut slot = self.slot.lock();

        let buffered = std::mem::take(&mut slot.buffer);
        if !buffered.is_empty() {
            debug!(count = buffered.len(), "Flushing buffered background locations");
        }
        for sample in buffered {
            handler(sample);
        }

        slot.handler = Some((id, handler));
        id
    }

    /// Clear the handler if it is still the one registered under `id`.
    pub(crate) fn unregister(&self, id: HandlerId) -> bool {
        let mut slot = self.slot.lock();
        match slot.handler {
            Some((current, _)) if current == id => {
                slot.handler = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn deliver(&self, sample: PositionSample) {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        match &slot.handler {
            Some((_, handler)) => handler(sample),
            None => slot.buffer.push(sample),
        }
    }

    pub(crate) fn handle_task_event(&self, event: BackgroundTaskEvent) {
        if let Some(error) = event.error {
            error!(error = %error, "Background location task reported an error");
            return;
        }
        for sample in event.locations {
            self.deliver(sample);
        }
    }

    /// Run `define` the first time it is called for this process.
    ///
    /// A failed definition leaves the task undefined so a later start can try
    /// again.
    pub(crate) fn define_task_once<F>(&self, define: F) -> Result<(), PlatformError>
    where
        F: FnOnce() -> Result<(), PlatformError>,
    {
        let mut defined = self.task_defined.lock();
        if !*defined {
            define()?;
            *defined = true;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn buffered_len(&self) -> usize {
        self.slot.lock().buffer.len()
    }

    #[cfg(test)]
    pub(crate) fn has_handler(&self) -> bool {
        self.slot.lock().handler.is_some()
    }
}

/// The bridge shared by every reporter in the process.
pub(crate) fn global() -> Arc<BackgroundBridge> {
    static BRIDGE: OnceLock<Arc<BackgroundBridge>> = OnceLock::new();
    Arc::clone(BRIDGE.get_or_init(|| Arc::new(BackgroundBridge::new())))
}

/// Entry point for the OS background task.
///
/// Positions go to the running reporter, or are buffered until one starts.
/// Error events are logged and dropped.
pub fn dispatch_background_event(event: BackgroundTaskEvent) {
    global().handle_task_event(event);
}
