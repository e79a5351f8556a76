//! Debounced auto-save.
//!
//! Each change reschedules a single pending save: a change arriving during the
//! quiet period replaces the pending payload instead of queuing another save.
//! Saves run on the tokio runtime and never block or roll back editing; their
//! outcome is published on the event bus.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use layerkit_core::{EditorEvent, EventBus, PersistenceEvent};
use layerkit_settings::AutoSaveSettings;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{DocumentError, DocumentResult};
use crate::persistence::PersistenceApi;

struct PendingSave {
    task: JoinHandle<()>,
    /// Set once the quiet period is over and the save is in flight.
    started: Arc<AtomicBool>,
}

/// Schedules saves of the latest document payload.
pub struct AutoSaver {
    api: Arc<dyn PersistenceApi>,
    events: Arc<EventBus>,
    runtime: Handle,
    debounce: Duration,
    pending: Option<PendingSave>,
    latest: Option<Arc<Vec<u8>>>,
}

impl AutoSaver {
    /// Creates a saver bound to the current tokio runtime.
    ///
    /// Fails with `SaveFailed` when called outside a runtime.
    pub fn new(
        api: Arc<dyn PersistenceApi>,
        events: Arc<EventBus>,
        debounce: Duration,
    ) -> DocumentResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| DocumentError::SaveFailed(format!("no async runtime: {}", e)))?;
        Ok(Self::with_runtime(api, events, debounce, runtime))
    }

    pub fn with_runtime(
        api: Arc<dyn PersistenceApi>,
        events: Arc<EventBus>,
        debounce: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            api,
            events,
            runtime,
            debounce,
            pending: None,
            latest: None,
        }
    }

    pub fn from_settings(
        api: Arc<dyn PersistenceApi>,
        events: Arc<EventBus>,
        settings: &AutoSaveSettings,
    ) -> DocumentResult<Self> {
        Self::new(api, events, Duration::from_millis(settings.debounce_ms))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// True while a save is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.started.load(Ordering::SeqCst) && !p.task.is_finished())
    }

    /// Schedules `bytes` to be saved after the quiet period, replacing any
    /// save still waiting. A save already in flight is left to finish.
    pub fn schedule(&mut self, bytes: Vec<u8>) {
        self.abort_waiting();
        let payload = Arc::new(bytes);
        self.latest = Some(Arc::clone(&payload));

        let started = Arc::new(AtomicBool::new(false));
        let task = {
            let api = Arc::clone(&self.api);
            let events = Arc::clone(&self.events);
            let started = Arc::clone(&started);
            let debounce = self.debounce;
            self.runtime.spawn(async move {
                tokio::time::sleep(debounce).await;
                started.store(true, Ordering::SeqCst);
                let _ = save(api.as_ref(), &events, payload.as_ref().clone()).await;
            })
        };
        self.pending = Some(PendingSave { task, started });

        tracing::debug!("Auto-save scheduled in {:?}", self.debounce);
        notify(
            &self.events,
            PersistenceEvent::SaveScheduled {
                debounce_ms: self.debounce.as_millis() as u64,
            },
        );
    }

    /// Drops a save still waiting for its quiet period.
    pub fn cancel(&mut self) {
        if self.abort_waiting() {
            tracing::debug!("Pending auto-save cancelled");
            notify(&self.events, PersistenceEvent::SaveCancelled);
        }
    }

    /// Saves the most recently scheduled payload now, skipping the wait.
    pub async fn flush(&mut self) -> DocumentResult<Option<String>> {
        self.abort_waiting();
        let Some(payload) = self.latest.clone() else {
            return Ok(None);
        };
        save(self.api.as_ref(), &self.events, payload.as_ref().clone())
            .await
            .map(Some)
    }

    fn abort_waiting(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) if !pending.started.load(Ordering::SeqCst) => {
                pending.task.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.abort_waiting();
    }
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("debounce", &self.debounce)
            .field("pending", &self.is_pending())
            .finish()
    }
}

async fn save(api: &dyn PersistenceApi, events: &EventBus, bytes: Vec<u8>) -> DocumentResult<String> {
    match api.save(bytes).await {
        Ok(url) => {
            tracing::info!("Document saved to {}", url);
            notify(events, PersistenceEvent::SaveSucceeded { url: url.clone() });
            Ok(url)
        }
        Err(e) => {
            tracing::warn!("Auto-save failed: {}", e);
            notify(
                events,
                PersistenceEvent::SaveFailed {
                    reason: e.to_string(),
                },
            );
            Err(DocumentError::SaveFailed(e.to_string()))
        }
    }
}

fn notify(events: &EventBus, event: PersistenceEvent) {
    events.publish(EditorEvent::Persistence(event));
}
