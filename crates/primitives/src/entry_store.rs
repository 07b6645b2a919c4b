//! Generic lock-guarded entry collection
//!
//! The search-geometry store addresses entries by position, the
//! item-geometry store by item id. Both share flag handling, cover caching
//! and read access through `EntryStore<S>`, where `S` is the underlying
//! collection. Missing keys come back as `None`; each store decides whether
//! that is an error or a no-op.

use crate::entry::{FlagOp, GeometryEntry};
use mapstate_concurrency::{LockableState, ReadGuard, WriteGuard};
use mapstate_core::{ActiveFlags, ItemId, Result};
use std::collections::HashMap;
use std::fmt::Debug;

/// Collection of geometry entries addressed by `Key`
pub trait EntrySlots: Send + Sync {
    /// How entries are addressed
    type Key: Copy + Debug;

    /// Entry at `key`
    fn slot(&self, key: Self::Key) -> Option<&GeometryEntry>;

    /// Mutable entry at `key`
    fn slot_mut(&mut self, key: Self::Key) -> Option<&mut GeometryEntry>;

    /// Number of entries
    fn count(&self) -> usize;

    /// Visit every entry
    fn visit(&self, f: &mut dyn FnMut(Self::Key, &GeometryEntry));
}

impl EntrySlots for Vec<GeometryEntry> {
    type Key = usize;

    fn slot(&self, key: usize) -> Option<&GeometryEntry> {
        self.get(key)
    }

    fn slot_mut(&mut self, key: usize) -> Option<&mut GeometryEntry> {
        self.get_mut(key)
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn visit(&self, f: &mut dyn FnMut(usize, &GeometryEntry)) {
        for (pos, entry) in self.iter().enumerate() {
            f(pos, entry);
        }
    }
}

impl EntrySlots for HashMap<ItemId, GeometryEntry> {
    type Key = ItemId;

    fn slot(&self, key: ItemId) -> Option<&GeometryEntry> {
        self.get(&key)
    }

    fn slot_mut(&mut self, key: ItemId) -> Option<&mut GeometryEntry> {
        self.get_mut(&key)
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn visit(&self, f: &mut dyn FnMut(ItemId, &GeometryEntry)) {
        for (id, entry) in self.iter() {
            f(*id, entry);
        }
    }
}

/// Entry collection behind a reader/writer lock
pub struct EntryStore<S: EntrySlots> {
    state: LockableState<S>,
}

impl<S: EntrySlots> EntryStore<S> {
    /// Guard `slots` under a lock named `label`
    pub fn new(label: &'static str, slots: S) -> Self {
        Self {
            state: LockableState::new(label, slots),
        }
    }

    /// Shared hold on the whole collection
    pub fn read_lock(&self) -> ReadGuard<'_, S> {
        self.state.read_lock()
    }

    /// Exclusive hold on the whole collection, for structural changes
    pub fn write_lock(&self) -> WriteGuard<'_, S> {
        self.state.write_lock()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.state.read_lock().count()
    }

    /// True if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one entry under a shared hold
    pub fn read<R>(&self, key: S::Key, f: impl FnOnce(&GeometryEntry) -> R) -> Option<R> {
        let guard = self.state.read_lock();
        guard.slot(key).map(f)
    }

    /// Mutate one entry under an exclusive hold
    pub fn update<R>(&self, key: S::Key, f: impl FnOnce(&mut GeometryEntry) -> R) -> Option<R> {
        let mut guard = self.state.write_lock();
        guard.slot_mut(key).map(f)
    }

    /// Apply a flag operation to one entry
    ///
    /// `Ok(None)` when `key` is absent.
    pub fn apply_flag(
        &self,
        key: S::Key,
        op: FlagOp,
        flag: ActiveFlags,
    ) -> Result<Option<ActiveFlags>> {
        self.update(key, |entry| entry.apply_flag(op, flag))
            .transpose()
    }

    /// Visit every entry under one shared hold
    ///
    /// `f` must not touch this store again. The lock is writer-fair, so a
    /// nested read deadlocks once another thread queues a write.
    pub fn for_each(&self, mut f: impl FnMut(S::Key, &GeometryEntry)) {
        let guard = self.state.read_lock();
        guard.visit(&mut f);
    }

    /// Clone every entry under one shared hold
    pub fn values(&self) -> Vec<GeometryEntry> {
        let mut out = Vec::new();
        self.for_each(|_, entry| out.push(entry.clone()));
        out
    }
}
