//! Minimal subscriber registry built on `std::sync::mpsc`.
//!
//! Each subscriber owns its own receiver; publishing clones the value into
//! every live channel. Dropping or disposing a [`Subscription`] removes it
//! from the registry without touching the others.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

struct Registry<T> {
    next_id: u64,
    senders: Vec<(u64, Sender<T>)>,
}

fn lock<T>(m: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
    // A panic while publishing leaves the list itself consistent.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct Broadcast<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                senders: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        let mut reg = lock(&self.inner);
        let id = reg.next_id;
        reg.next_id += 1;
        reg.senders.push((id, tx));
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.inner),
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).senders.len()
    }

    /// Drop every subscriber. Their receivers see a disconnect.
    pub fn clear(&self) {
        lock(&self.inner).senders.clear();
    }
}

impl<T: Clone> Broadcast<T> {
    /// Send `value` to every subscriber, pruning closed channels.
    pub fn publish(&self, value: &T) {
        lock(&self.inner)
            .senders
            .retain(|(_, tx)| tx.send(value.clone()).is_ok());
    }
}

pub struct Subscription<T> {
    id: u64,
    rx: Receiver<T>,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    pub fn try_recv(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain everything pending and return only the newest value.
    pub fn latest(&self) -> Option<T> {
        let mut last = None;
        while let Some(v) = self.try_recv() {
            last = Some(v);
        }
        last
    }

    /// Stop receiving. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).senders.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
