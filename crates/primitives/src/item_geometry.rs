//! ItemGeometryState: highlighted geometries of search result items
//!
//! Entries are keyed by item id and created lazily: the first `activate`
//! for an id fetches its geometry from the object store while holding the
//! write lock, inserts it with no flags, then applies the flag. Every other
//! operation treats an unknown id as a valid, inactive item: `active`
//! returns the empty set and `deactivate`/`toggle_item` do nothing.

use crate::entry::{FlagOp, GeometryEntry};
use crate::entry_store::EntryStore;
use crate::events::ItemGeometryEvent;
use mapstate_concurrency::{Notifier, Subscription};
use mapstate_core::{ActiveFlags, Error, GeometryKind, ItemId, ObjectStore, Result};
use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Item geometries keyed by item id
pub struct ItemGeometryState {
    store: Arc<dyn ObjectStore>,
    entries: EntryStore<HashMap<ItemId, GeometryEntry>>,
    notifier: Notifier<ItemGeometryEvent>,
    zoom_on_show: bool,
}

impl ItemGeometryState {
    /// Create an empty store backed by `store`
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            entries: EntryStore::new("item_geometry", HashMap::new()),
            notifier: Notifier::new(),
            zoom_on_show: false,
        }
    }

    /// Also request a zoom whenever `SHOW` goes from clear to set on an item
    #[must_use]
    pub fn with_zoom_on_show(mut self, enabled: bool) -> Self {
        self.zoom_on_show = enabled;
        self
    }

    /// Register an observer for this store's events
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ItemGeometryEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Set `flag` on `item_id`, fetching its geometry on first use
    ///
    /// If the object store fails, nothing is inserted and no event fires.
    pub fn activate(&self, item_id: ItemId, flag: ActiveFlags) -> Result<ActiveFlags> {
        let (before, mask, created) = {
            let mut guard = self.entries.write_lock();
            let (entry, created) = match guard.entry(item_id) {
                MapEntry::Occupied(slot) => (slot.into_mut(), false),
                MapEntry::Vacant(slot) => (slot.insert(self.materialize(item_id)?), true),
            };
            let before = entry.active;
            (before, entry.apply_flag(FlagOp::Activate, flag)?, created)
        };
        debug!(item_id, created, ?mask, "item geometry activated");
        self.notifier.emit(&ItemGeometryEvent::Changed);
        // Zoom only when the item becomes shown, not on repeated shows
        let shown = !before.contains(ActiveFlags::SHOW) && mask.contains(ActiveFlags::SHOW);
        if self.zoom_on_show && shown {
            self.notifier.emit(&ItemGeometryEvent::ZoomToItem(item_id));
        }
        Ok(mask)
    }

    /// Clear `flag` on `item_id`; no-op for unknown ids
    pub fn deactivate(&self, item_id: ItemId, flag: ActiveFlags) -> Result<ActiveFlags> {
        self.apply_existing(item_id, FlagOp::Deactivate, flag)
    }

    /// Flip `flag` on `item_id`; no-op for unknown ids
    ///
    /// Never creates an entry, even though flipping an absent flag would
    /// otherwise set it.
    pub fn toggle_item(&self, item_id: ItemId, flag: ActiveFlags) -> Result<ActiveFlags> {
        self.apply_existing(item_id, FlagOp::Toggle, flag)
    }

    /// Remove every entry
    pub fn clear(&self) {
        let removed = {
            let mut guard = self.entries.write_lock();
            let n = guard.len();
            guard.clear();
            n
        };
        debug!(removed, "item geometry cleared");
        self.notifier.emit(&ItemGeometryEvent::Changed);
    }

    /// Ask consumers to recenter the view on `item_id`
    pub fn zoom_to_item(&self, item_id: ItemId) {
        debug!(item_id, "zoom requested");
        self.notifier.emit(&ItemGeometryEvent::ZoomToItem(item_id));
    }

    fn apply_existing(&self, item_id: ItemId, op: FlagOp, flag: ActiveFlags) -> Result<ActiveFlags> {
        match self.entries.apply_flag(item_id, op, flag)? {
            Some(mask) => {
                debug!(item_id, ?op, ?mask, "item geometry flags");
                self.notifier.emit(&ItemGeometryEvent::Changed);
                Ok(mask)
            }
            None => Ok(ActiveFlags::NONE),
        }
    }

    /// Build a fresh entry for `item_id`; called with the write lock held
    fn materialize(&self, item_id: ItemId) -> Result<GeometryEntry> {
        let (kind, data) = self.store.fetch_geometry(item_id).map_err(|e| {
            warn!(item_id, error = %e, "object store lookup failed");
            match e {
                Error::ObjectStore { .. } => e,
                other => Error::object_store(item_id, other.to_string()),
            }
        })?;
        if kind == GeometryKind::Invalid {
            return Err(Error::object_store(item_id, "object store returned no geometry"));
        }
        GeometryEntry::new(format!("item {}", item_id), data, kind)
    }

    // ========== Readers ==========

    /// Active flags of `item_id`; empty for unknown ids
    pub fn active(&self, item_id: ItemId) -> ActiveFlags {
        self.entries
            .read(item_id, |e| e.active)
            .unwrap_or(ActiveFlags::NONE)
    }

    /// True if an entry exists for `item_id`
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.entries.read_lock().contains_key(&item_id)
    }

    /// Number of materialized entries
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Copy of the entry for `item_id`
    pub fn entry(&self, item_id: ItemId) -> Option<GeometryEntry> {
        self.entries.read(item_id, GeometryEntry::clone)
    }

    /// Visit entry values under one shared hold; ids are not exposed
    ///
    /// `f` must not call any method of this store, readers included.
    pub fn for_each(&self, mut f: impl FnMut(&GeometryEntry)) {
        self.entries.for_each(|_, entry| f(entry));
    }

    /// Copy of all entry values, in unspecified order
    pub fn entries(&self) -> Vec<GeometryEntry> {
        self.entries.values()
    }
}
