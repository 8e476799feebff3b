//! Signal/slot system for the course toolbox.
//!
//! This module provides a small, type-safe observer mechanism. Views emit
//! signals when the user interacts with them (a field loses focus, a key is
//! pressed, a form is submitted) and controllers connect slots to react.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - Connection that disconnects when released or dropped
//! - [`SubscriptionSet`] - A bundle of guards acquired together and released
//!   together
//!
//! # Re-entrancy
//!
//! Slots are invoked after the connection table lock has been released, so a
//! slot may freely connect to or disconnect from the signal that is invoking
//! it. The set of slots invoked by one `emit` is fixed when the emission
//! starts.
//!
//! # Example
//!
//! ```
//! use course_toolbox_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Check whether a connection is still attached.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "course_toolbox_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so the lock is not held while they run.
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args: 'static> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot and return a guard that disconnects it.
    ///
    /// The guard holds a weak reference to the signal: releasing a guard whose
    /// signal has already been dropped is a no-op.
    pub fn connect_guarded<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id: Some(id),
        }
    }
}

/// Something that stays attached until released.
pub trait Subscription: Send {
    /// Detach the subscription.
    ///
    /// Returns `true` if this call detached a live connection.
    fn release(&mut self) -> bool;

    /// Whether the subscription has not been released yet.
    fn is_active(&self) -> bool;
}

/// A connection guard that disconnects when released or dropped.
///
/// Created via [`Signal::connect_guarded`].
///
/// # Example
///
/// ```
/// use course_toolbox_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Arc::new(Signal::<i32>::new());
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_guarded(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43); // Nothing happens - the guard was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: Option<ConnectionId>,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The id of the guarded connection, if it has not been released.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }
}

impl<Args: 'static> Subscription for ConnectionGuard<Args> {
    fn release(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        match self.signal.upgrade() {
            Some(signal) => signal.disconnect(id),
            None => false,
        }
    }

    fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish()
    }
}

/// A set of subscriptions acquired together and released together.
///
/// Releasing the set detaches every member exactly once. Dropping an
/// unreleased set releases it.
#[derive(Default)]
pub struct SubscriptionSet {
    members: Vec<Box<dyn Subscription>>,
}

impl SubscriptionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription to the set.
    pub fn push(&mut self, subscription: impl Subscription + 'static) {
        self.members.push(Box::new(subscription));
    }

    /// Number of members that are still attached.
    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|s| s.is_active()).count()
    }

    /// Whether the set holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Detach every member and empty the set.
    ///
    /// Returns the number of connections that were actually detached.
    pub fn release(&mut self) -> usize {
        let released = self
            .members
            .drain(..)
            .map(|mut member| member.release())
            .filter(|detached| *detached)
            .count();
        tracing::trace!(target: targets::SIGNAL, released, "subscription set released");
        released
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SubscriptionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionSet")
            .field("active", &self.active_count())
            .finish()
    }
}
