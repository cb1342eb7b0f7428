//! Redraw notification plumbing.
//!
//! Each editor owns an [`UpdateRegistry`] mapping grid coordinates to the
//! callback a UI registered for that cell, plus a [`PendingUpdates`] set
//! of cells touched since the last drain.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned when registering a redraw callback.
    pub struct CallbackKey;
}

/// A note grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteCell {
    pub voice: usize,
    pub column: usize,
    pub pitch: usize,
}

/// A dynamics lane cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DynamicsCell {
    pub voice: usize,
    pub column: usize,
}

struct Registration<K> {
    cell: K,
    callback: Box<dyn FnMut()>,
}

/// Callbacks keyed by cell. At most one callback per cell.
pub struct UpdateRegistry<K> {
    callbacks: SlotMap<CallbackKey, Registration<K>>,
    by_cell: BTreeMap<K, CallbackKey>,
}

impl<K: Ord + Copy> UpdateRegistry<K> {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
            by_cell: BTreeMap::new(),
        }
    }

    /// Register `callback` for `cell`, replacing any earlier registration.
    pub fn register(&mut self, cell: K, callback: impl FnMut() + 'static) -> CallbackKey {
        if let Some(old) = self.by_cell.remove(&cell) {
            self.callbacks.remove(old);
        }
        let key = self.callbacks.insert(Registration {
            cell,
            callback: Box::new(callback),
        });
        self.by_cell.insert(cell, key);
        key
    }

    /// Remove a registration. Stale keys are ignored.
    pub fn unregister(&mut self, key: CallbackKey) -> bool {
        match self.callbacks.remove(key) {
            Some(reg) => {
                self.by_cell.remove(&reg.cell);
                true
            }
            None => false,
        }
    }

    /// Invoke the callback for `cell`, if any.
    pub fn notify(&mut self, cell: K) -> bool {
        let Some(&key) = self.by_cell.get(&cell) else {
            return false;
        };
        match self.callbacks.get_mut(key) {
            Some(reg) => {
                (reg.callback)();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<K: Ord + Copy> Default for UpdateRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicated cells awaiting a redraw, in first-touched order.
#[derive(Clone, Debug)]
pub struct PendingUpdates<K> {
    order: Vec<K>,
    seen: BTreeSet<K>,
}

impl<K: Ord + Copy> PendingUpdates<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Queue a cell. Returns false if it was already queued.
    pub fn push(&mut self, cell: K) -> bool {
        if !self.seen.insert(cell) {
            return false;
        }
        self.order.push(cell);
        true
    }

    pub fn contains(&self, cell: &K) -> bool {
        self.seen.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Empty the queue, returning the cells in order.
    pub fn take(&mut self) -> Vec<K> {
        self.seen.clear();
        core::mem::take(&mut self.order)
    }

    /// Empty the queue, notifying each cell's callback.
    ///
    /// Returns the number of callbacks invoked.
    pub fn drain(&mut self, registry: &mut UpdateRegistry<K>) -> usize {
        self.take()
            .into_iter()
            .filter(|cell| registry.notify(*cell))
            .count()
    }
}

impl<K: Ord + Copy> Default for PendingUpdates<K> {
    fn default() -> Self {
        Self::new()
    }
}
