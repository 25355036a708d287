use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::debug;

type Slot<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Slots<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Slot<T>)>>,
}

trait Disconnect {
    fn disconnect(&self, id: u64);
}

impl<T> Disconnect for Slots<T> {
    fn disconnect(&self, id: u64) {
        self.entries.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
    }
}

/// Single-threaded multicast notification.
///
/// Handlers run in connection order. A handler may cancel subscriptions
/// (including its own) while the signal is being emitted; cancelled handlers
/// that have not run yet are skipped.
pub struct Signal<T> {
    slots: Rc<Slots<T>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn connect(&self, handler: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        let slot: Slot<T> = Rc::new(RefCell::new(handler));
        self.slots.entries.borrow_mut().push((id, slot));

        let slots: Rc<dyn Disconnect> = self.slots.clone();
        Subscription {
            slots: Some(Rc::downgrade(&slots)),
            id,
        }
    }

    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Slot<T>)> = self.slots.entries.borrow().clone();
        for (id, slot) in snapshot {
            let connected = self
                .slots
                .entries
                .borrow()
                .iter()
                .any(|(slot_id, _)| *slot_id == id);
            if !connected {
                continue;
            }
            match slot.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(value),
                Err(_) => debug!("Skipping re-entrant handler {}", id),
            };
        }
    }

    pub fn handler_count(&self) -> usize {
        self.slots.entries.borrow().len()
    }
}

/// Cancellation handle for a connected handler. Dropping it disconnects.
#[must_use = "dropping a Subscription disconnects its handler"]
pub struct Subscription {
    slots: Option<Weak<dyn Disconnect>>,
    id: u64,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(slots) = self.slots.take().and_then(|weak| weak.upgrade()) {
            slots.disconnect(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Subscriptions owned by one component, released newest first
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Cancel everything in reverse order of acquisition
    pub fn clear(&mut self) {
        while let Some(subscription) = self.subscriptions.pop() {
            subscription.cancel();
        }
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.clear();
    }
}
