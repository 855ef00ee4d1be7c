//! Hook registry layered over [`EventSink`].
//!
//! Hooks subscribe to one event kind (the serialized `type` tag) or to all
//! events. The registry hands out a single sink, so agents and graphs need
//! no extra wiring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::events::{EventEnvelope, EventSink};

/// Callback invoked for matching events.
pub type Hook = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;

/// Handle returned by registration, used to remove the hook later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

struct Entry {
    id: HookId,
    kind: Option<String>,
    hook: Hook,
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

/// Shared, cloneable set of hooks. Hooks fire in registration order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    inner: Arc<Inner>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for events whose kind equals `kind`, e.g. `"tool_result"`.
    pub fn register(
        &self,
        kind: impl Into<String>,
        hook: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> HookId {
        self.insert(Some(kind.into()), Arc::new(hook))
    }

    /// Register `hook` for every event.
    pub fn register_any(&self, hook: impl Fn(&EventEnvelope) + Send + Sync + 'static) -> HookId {
        self.insert(None, Arc::new(hook))
    }

    /// Returns false when `id` was not registered.
    pub fn remove(&self, id: HookId) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Fire every hook matching the envelope's event. Returns how many ran.
    ///
    /// Hooks run outside the lock, so a hook may register or remove hooks.
    pub fn trigger(&self, envelope: &EventEnvelope) -> usize {
        let kind = envelope.event.kind();
        let matching: Vec<Hook> = self
            .entries()
            .iter()
            .filter(|entry| entry.kind.is_none() || entry.kind.as_deref() == Some(kind))
            .map(|entry| Arc::clone(&entry.hook))
            .collect();
        for hook in &matching {
            hook(envelope);
        }
        matching.len()
    }

    /// Sink that forwards each event to [`HookRegistry::trigger`].
    pub fn sink(&self) -> EventSink {
        let registry = self.clone();
        Arc::new(move |envelope: EventEnvelope| {
            registry.trigger(&envelope);
        })
    }

    fn insert(&self, kind: Option<String>, hook: Hook) -> HookId {
        let id = HookId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(?id, kind = kind.as_deref().unwrap_or("*"), "hook registered");
        self.entries().push(Entry { id, kind, hook });
        id
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}
