use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Activated,
    Invalidated,
}

/// Shared readiness of the vision engine.
///
/// The credential gate activates it; the classifier invalidates it when the
/// remote side reports that the configured credential no longer resolves.
/// Both hold the same `Arc<EngineSession>`.
pub struct EngineSession {
    ready: AtomicBool,
    listeners: Mutex<Vec<Sender<SessionEvent>>>,
}

impl EngineSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Opens the gate. Returns `true` if this call changed the state.
    pub fn activate(&self) -> bool {
        let changed = !self.ready.swap(true, Ordering::SeqCst);
        if changed {
            log::info!("Vision engine session activated");
            self.notify(SessionEvent::Activated);
        }
        changed
    }

    /// Closes the gate. Returns `true` if this call changed the state.
    pub fn invalidate(&self) -> bool {
        let changed = self.ready.swap(false, Ordering::SeqCst);
        if changed {
            log::warn!("Vision engine session invalidated; re-authorization required");
            self.notify(SessionEvent::Invalidated);
        }
        changed
    }

    /// Receives every future transition. Dropped receivers are pruned lazily.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(tx);
        }
        rx
    }

    fn notify(&self, event: SessionEvent) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|tx| tx.send(event).is_ok());
        }
    }
}
