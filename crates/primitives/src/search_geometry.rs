//! SearchGeometryState: user-drawn search geometries
//!
//! ## Design Principles
//!
//! 1. **Positional identity**: entries are addressed by position. `remove`
//!    shifts every later entry down by one; callers holding positions across
//!    a remove must discard them (signalled by `Structural`).
//! 2. **Fail fast**: an out-of-range position is a programmer error and
//!    returns `Error::PositionOutOfRange` before anything is mutated or
//!    emitted.
//! 3. **Emit after release**: every mutator drops its write guard before
//!    notifying, so subscribers may read the store from their callback.

use crate::entry::{FlagOp, GeometryEntry};
use crate::entry_store::EntryStore;
use crate::events::SearchGeometryEvent;
use mapstate_concurrency::{Notifier, Subscription};
use mapstate_core::{ActiveFlags, Error, GeometryKind, ItemIndex, LineString, Result};
use tracing::debug;

/// Ordered, positionally addressed geometry entries
pub struct SearchGeometryState {
    entries: EntryStore<Vec<GeometryEntry>>,
    notifier: Notifier<SearchGeometryEvent>,
}

impl Default for SearchGeometryState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchGeometryState {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty store with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: EntryStore::new("search_geometry", Vec::with_capacity(capacity)),
            notifier: Notifier::new(),
        }
    }

    /// Register an observer for this store's events
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SearchGeometryEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    // ========== Mutators ==========

    /// Append an inactive entry and return its position
    pub fn add(&self, name: impl Into<String>, data: LineString, kind: GeometryKind) -> Result<usize> {
        let entry = GeometryEntry::new(name, data, kind)?;
        let pos = {
            let mut guard = self.entries.write_lock();
            guard.push(entry);
            guard.len() - 1
        };
        debug!(pos, kind = %kind, "search geometry added");
        self.notifier.emit(&SearchGeometryEvent::Structural);
        Ok(pos)
    }

    /// Remove the entry at `pos`, shifting later positions down by one
    pub fn remove(&self, pos: usize) -> Result<GeometryEntry> {
        let removed = {
            let mut guard = self.entries.write_lock();
            if pos >= guard.len() {
                return Err(Error::out_of_range(pos, guard.len()));
            }
            guard.remove(pos)
        };
        debug!(pos, "search geometry removed");
        self.notifier.emit(&SearchGeometryEvent::Structural);
        Ok(removed)
    }

    /// Set `flag` on the entry at `pos`, leaving other flags untouched
    pub fn activate(&self, pos: usize, flag: ActiveFlags) -> Result<ActiveFlags> {
        self.apply_flag(pos, FlagOp::Activate, flag)
    }

    /// Clear `flag` on the entry at `pos`
    pub fn deactivate(&self, pos: usize, flag: ActiveFlags) -> Result<ActiveFlags> {
        self.apply_flag(pos, FlagOp::Deactivate, flag)
    }

    /// Flip `flag` on the entry at `pos`
    pub fn toggle(&self, pos: usize, flag: ActiveFlags) -> Result<ActiveFlags> {
        self.apply_flag(pos, FlagOp::Toggle, flag)
    }

    /// Replace the cached covering cells of the entry at `pos`
    pub fn set_cells(&self, pos: usize, idx: ItemIndex) -> Result<()> {
        self.update(pos, |entry| entry.cells = idx)?;
        debug!(pos, "search geometry cells set");
        self.notifier.emit(&SearchGeometryEvent::Changed(pos));
        Ok(())
    }

    /// Replace the cached covering triangles of the entry at `pos`
    pub fn set_triangles(&self, pos: usize, idx: ItemIndex) -> Result<()> {
        self.update(pos, |entry| entry.triangles = idx)?;
        debug!(pos, "search geometry triangles set");
        self.notifier.emit(&SearchGeometryEvent::Changed(pos));
        Ok(())
    }

    fn apply_flag(&self, pos: usize, op: FlagOp, flag: ActiveFlags) -> Result<ActiveFlags> {
        let mask = self.update(pos, |entry| entry.apply_flag(op, flag))??;
        debug!(pos, ?op, ?mask, "search geometry flags");
        self.notifier.emit(&SearchGeometryEvent::Changed(pos));
        Ok(mask)
    }

    /// Mutate the entry at `pos`; the reported length is the one the
    /// range check saw
    fn update<R>(&self, pos: usize, f: impl FnOnce(&mut GeometryEntry) -> R) -> Result<R> {
        let mut guard = self.entries.write_lock();
        let len = guard.len();
        guard
            .get_mut(pos)
            .map(f)
            .ok_or_else(|| Error::out_of_range(pos, len))
    }

    // ========== Readers ==========

    /// Number of entries
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Display name of the entry at `pos`
    pub fn name(&self, pos: usize) -> Result<String> {
        self.read(pos, |e| e.name.clone())
    }

    /// Active flags of the entry at `pos`
    pub fn active(&self, pos: usize) -> Result<ActiveFlags> {
        self.read(pos, |e| e.active)
    }

    /// Geometry kind of the entry at `pos`
    pub fn kind(&self, pos: usize) -> Result<GeometryKind> {
        self.read(pos, |e| e.kind)
    }

    /// Coordinates of the entry at `pos`
    pub fn data(&self, pos: usize) -> Result<LineString> {
        self.read(pos, |e| e.data.clone())
    }

    /// Cached covering cells of the entry at `pos`
    pub fn cells(&self, pos: usize) -> Result<ItemIndex> {
        self.read(pos, |e| e.cells.clone())
    }

    /// Cached covering triangles of the entry at `pos`
    pub fn triangles(&self, pos: usize) -> Result<ItemIndex> {
        self.read(pos, |e| e.triangles.clone())
    }

    /// Full copy of the entry at `pos`
    pub fn entry(&self, pos: usize) -> Result<GeometryEntry> {
        self.read(pos, GeometryEntry::clone)
    }

    /// Visit entries in position order under one shared hold
    ///
    /// `f` must not call any method of this store, readers included: a
    /// nested read waits behind a writer queued on another thread, which
    /// waits for this hold.
    pub fn for_each(&self, f: impl FnMut(usize, &GeometryEntry)) {
        self.entries.for_each(f);
    }

    /// Copy of all entries in position order
    pub fn snapshot(&self) -> Vec<GeometryEntry> {
        self.entries.values()
    }

    fn read<R>(&self, pos: usize, f: impl FnOnce(&GeometryEntry) -> R) -> Result<R> {
        let guard = self.entries.read_lock();
        guard
            .get(pos)
            .map(f)
            .ok_or_else(|| Error::out_of_range(pos, guard.len()))
    }
}
