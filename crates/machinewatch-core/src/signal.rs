//! Typed notification channels.
//!
//! A [`Signal`] is a callback list for one named notification. Emission calls
//! every connected slot synchronously, in connection order, on the emitting
//! thread. The slot list is snapshotted before delivery, so slots may connect
//! or disconnect other slots (or themselves) while being called.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Handle returned by [`Signal::connect`], used to disconnect a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type Slot<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A named notification channel carrying a payload of type `T`.
///
/// Use `Signal<()>` for payload-free notifications.
pub struct Signal<T> {
    name: &'static str,
    slots: Mutex<Vec<(SubscriptionId, Slot<T>)>>,
}

impl<T> Signal<T> {
    /// Create an empty channel
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Channel name, as used by widgets to look it up
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Connect a slot; it will be called after every slot connected before it
    pub fn connect<F>(&self, slot: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.slots.lock().push((id, Arc::new(slot)));
        tracing::debug!("{} connected to {}", id, self.name);
        id
    }

    /// Disconnect a slot
    ///
    /// Returns true if the subscription was found and removed.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        let removed = slots.len() != before;
        if removed {
            tracing::debug!("{} disconnected from {}", id, self.name);
        }
        removed
    }

    /// Deliver `value` to every connected slot
    pub fn emit(&self, value: &T) {
        let slots: Vec<Slot<T>> = self
            .slots
            .lock()
            .iter()
            .map(|(_, slot)| Arc::clone(slot))
            .collect();
        for slot in slots {
            slot(value);
        }
    }

    /// Number of connected slots
    pub fn slot_count(&self) -> usize {
        self.slots.lock().len()
    }
}

impl Signal<()> {
    /// Deliver a payload-free notification
    pub fn notify(&self) {
        self.emit(&());
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("slots", &self.slot_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_connect_and_disconnect() {
        let signal: Signal<bool> = Signal::new("paused");

        let id = signal.connect(|_| {});
        assert_eq!(signal.slot_count(), 1);

        assert!(signal.disconnect(id));
        assert_eq!(signal.slot_count(), 0);

        // Double disconnect should return false
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_emit_in_connection_order() {
        let signal: Signal<i32> = Signal::new("line");
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            signal.connect(move |line| order.lock().push(format!("{tag}:{line}")));
        }

        signal.emit(&42);
        assert_eq!(
            *order.lock(),
            vec!["first:42", "second:42", "third:42"]
        );
    }

    #[test]
    fn test_notify_unit_signal() {
        let signal: Signal<()> = Signal::new("all_homed");
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        signal.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        signal.notify();
        signal.notify();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_slot_may_disconnect_itself() {
        let signal = Arc::new(Signal::<()>::new("widget_update"));
        let counter = Arc::new(AtomicUsize::new(0));
        let id_cell = Arc::new(Mutex::new(None));

        let (s, c, cell) = (signal.clone(), counter.clone(), id_cell.clone());
        let id = signal.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *cell.lock() {
                s.disconnect(id);
            }
        });
        *id_cell.lock() = Some(id);

        signal.notify();
        signal.notify();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(signal.slot_count(), 0);
    }

    #[test]
    fn test_subscription_id_display() {
        let signal: Signal<()> = Signal::new("x");
        let id = signal.connect(|_| {});
        let text = id.to_string();
        assert!(text.starts_with("Sub("));
        assert_eq!(text.len(), "Sub(".len() + 8 + 1);
    }
}
