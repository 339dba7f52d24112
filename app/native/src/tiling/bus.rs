//! Event subscription registry.
//!
//! The bus keeps subscribers in registration order and buffers emitted events
//! until the manager delivers them. Subscribers are taken out of the bus while
//! an event is being delivered, so a subscriber may invoke commands (which
//! emit more events) without aliasing the registry.
//!
//! Subscriptions and unsubscriptions made during a delivery take effect for
//! the next event.

use std::collections::VecDeque;

use super::error::TilingResult;
use super::events::{Event, EventKind};
use super::manager::TilingManager;

/// A reactive rule fed by the event stream.
pub trait EventSubscriber: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Event kinds this subscriber wants to see.
    fn interests(&self) -> &'static [EventKind];

    /// Handles one event. Errors are logged by the manager and never reach
    /// the emitter.
    fn on_event(&mut self, event: &Event, manager: &mut TilingManager) -> TilingResult<()>;
}

/// Identifies a subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) subscriber: Box<dyn EventSubscriber>,
}

impl Subscription {
    pub(crate) fn wants(&self, kind: EventKind) -> bool {
        self.subscriber.interests().contains(&kind)
    }
}

/// Subscriber lists plus the queue of events not yet delivered.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscription>,
    pending: VecDeque<Event>,
    next_id: u64,
    delivering: bool,
    removed: Vec<SubscriptionId>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a subscriber at the end of the delivery order.
    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        tracing::debug!(subscriber = subscriber.name(), "subscriber registered");
        self.subscribers.push(Subscription { id, subscriber });
        id
    }

    /// Removes a subscriber. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.delivering {
            if self.removed.contains(&id) {
                return false;
            }
            self.removed.push(id);
            return true;
        }

        let before = self.subscribers.len();
        self.subscribers.retain(|subscription| subscription.id != id);
        self.subscribers.len() != before
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.subscribers.len() }

    /// Names of registered subscribers in delivery order.
    #[must_use]
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|subscription| subscription.subscriber.name()).collect()
    }

    // ========================================================================
    // Pending queue
    // ========================================================================

    pub fn enqueue(&mut self, event: Event) { self.pending.push_back(event); }

    #[must_use]
    pub fn pending_len(&self) -> usize { self.pending.len() }

    #[must_use]
    pub fn has_pending(&self) -> bool { !self.pending.is_empty() }

    /// Drops events queued after `len`.
    pub fn truncate_pending(&mut self, len: usize) { self.pending.truncate(len); }

    /// Takes every queued event, oldest first.
    pub fn take_pending(&mut self) -> Vec<Event> { self.pending.drain(..).collect() }

    pub fn clear_pending(&mut self) { self.pending.clear(); }

    // ========================================================================
    // Delivery
    // ========================================================================

    /// Moves the subscriber list out for one delivery.
    pub(crate) fn begin_delivery(&mut self) -> Vec<Subscription> {
        self.delivering = true;
        std::mem::take(&mut self.subscribers)
    }

    /// Returns `true` if `id` was unsubscribed during the current delivery.
    pub(crate) fn is_removed(&self, id: SubscriptionId) -> bool { self.removed.contains(&id) }

    /// Puts the subscriber list back, appending any subscriptions added in
    /// the meantime and dropping the removed ones.
    pub(crate) fn end_delivery(&mut self, mut delivered: Vec<Subscription>) {
        delivered.append(&mut self.subscribers);
        let removed = std::mem::take(&mut self.removed);
        delivered.retain(|subscription| !removed.contains(&subscription.id));
        self.subscribers = delivered;
        self.delivering = false;
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_names())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::state::WindowHandle;

    struct Named(&'static str);

    impl EventSubscriber for Named {
        fn name(&self) -> &'static str { self.0 }

        fn interests(&self) -> &'static [EventKind] { &[EventKind::WindowClosed] }

        fn on_event(&mut self, _: &Event, _: &mut TilingManager) -> TilingResult<()> { Ok(()) }
    }

    #[test]
    fn test_subscribe_preserves_order() {
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Named("a")));
        bus.subscribe(Box::new(Named("b")));
        assert_eq!(bus.subscriber_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_outside_delivery() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(Box::new(Named("a")));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_changes_during_delivery_apply_afterwards() {
        let mut bus = EventBus::new();
        let first = bus.subscribe(Box::new(Named("a")));

        let taken = bus.begin_delivery();
        assert_eq!(taken.len(), 1);
        assert!(taken[0].wants(EventKind::WindowClosed));

        bus.subscribe(Box::new(Named("late")));
        assert!(bus.unsubscribe(first));
        assert!(bus.is_removed(first));

        bus.end_delivery(taken);
        assert_eq!(bus.subscriber_names(), vec!["late"]);
    }

    #[test]
    fn test_pending_queue() {
        let mut bus = EventBus::new();
        bus.enqueue(Event::WindowClosed { handle: WindowHandle(1) });
        bus.enqueue(Event::WindowClosed { handle: WindowHandle(2) });
        assert_eq!(bus.pending_len(), 2);

        bus.truncate_pending(1);
        let taken = bus.take_pending();
        assert_eq!(taken, vec![Event::WindowClosed { handle: WindowHandle(1) }]);
        assert!(!bus.has_pending());
    }
}
