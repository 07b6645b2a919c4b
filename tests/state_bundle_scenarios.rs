//! End-to-end scenarios for the mapstate state layer
//!
//! These tests drive a full StateBundle the way a UI would:
//!
//! 1. **Scenarios** - the documented add/activate/toggle/remove flows
//! 2. **Threads** - input, render and completion threads sharing stores
//! 3. **Notification** - events observed after the write is visible
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test state_bundle_scenarios
//! ```

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use mapstate::{
    ActiveFlags, CellQueryResult, Completer, Coordinate, Error, GeometryKind, ItemGeometryEvent,
    ItemId, ItemIndex, LineString, ObjectStore, Result, SearchGeometryEvent, StateBundle,
    StatesConfig, TextSearchEvent,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// In-memory completer over a fixed item table.
///
/// A query matches every item whose name contains it; each item sits in the
/// cell `id / 10`.
struct TableCompleter {
    items: Arc<ItemTable>,
}

struct ItemTable {
    names: HashMap<ItemId, (&'static str, GeometryKind, LineString)>,
}

impl ObjectStore for ItemTable {
    fn fetch_geometry(&self, item_id: ItemId) -> Result<(GeometryKind, LineString)> {
        self.names
            .get(&item_id)
            .map(|(_, kind, data)| (*kind, data.clone()))
            .ok_or_else(|| Error::object_store(item_id, "unknown item"))
    }
}

impl Completer for TableCompleter {
    fn complete(&self, query: &str) -> Result<(CellQueryResult, ItemIndex)> {
        let items: ItemIndex = self
            .items
            .names
            .iter()
            .filter(|(_, (name, _, _))| name.contains(query))
            .map(|(id, _)| *id)
            .collect();
        let mut cells: HashMap<u32, Vec<u32>> = HashMap::new();
        for id in items.iter() {
            cells.entry(id / 10).or_default().push(id);
        }
        let cqr = CellQueryResult::from_cells(cells.into_iter().map(|(c, v)| (c, v.into())));
        Ok((cqr, items))
    }

    fn cells_for(&self, _kind: GeometryKind, data: &LineString) -> Result<ItemIndex> {
        Ok(data.iter().map(|c| c.lat as u32).collect())
    }

    fn triangles_for(&self, _kind: GeometryKind, data: &LineString) -> Result<ItemIndex> {
        Ok(data.iter().map(|c| c.lon as u32).collect())
    }

    fn object_store(&self) -> Arc<dyn ObjectStore> {
        self.items.clone()
    }
}

fn point(lat: f64, lon: f64) -> LineString {
    vec![Coordinate::new(lat, lon)].into()
}

fn path3() -> LineString {
    vec![
        Coordinate::new(1.0, 10.0),
        Coordinate::new(2.0, 20.0),
        Coordinate::new(3.0, 30.0),
    ]
    .into()
}

fn create_states(config: &StatesConfig) -> StateBundle {
    let mut names = HashMap::new();
    names.insert(12, ("cafe central", GeometryKind::Point, point(48.2, 16.3)));
    names.insert(17, ("cafe sacher", GeometryKind::Point, point(48.1, 16.4)));
    names.insert(42, ("museum", GeometryKind::Point, point(48.0, 16.0)));
    names.insert(55, ("park", GeometryKind::Polygon, path3()));
    let completer = TableCompleter {
        items: Arc::new(ItemTable { names }),
    };
    StateBundle::new(Arc::new(completer), config)
}

// ============================================================================
// SECTION 1: Scenarios
// ============================================================================

#[test]
fn test_search_geometry_scenario() {
    let states = create_states(&StatesConfig::default());
    let sgs = &states.search_geometry;

    assert_eq!(sgs.add("A", path3(), GeometryKind::Path).unwrap(), 0);
    assert_eq!(sgs.size(), 1);

    sgs.activate(0, ActiveFlags::SHOW).unwrap();
    assert_eq!(sgs.active(0).unwrap(), ActiveFlags::SHOW);

    sgs.toggle(0, ActiveFlags::CELLS).unwrap();
    assert_eq!(sgs.active(0).unwrap(), ActiveFlags::SHOW | ActiveFlags::CELLS);

    sgs.remove(0).unwrap();
    assert_eq!(sgs.size(), 0);
}

#[test]
fn test_item_geometry_scenario() {
    let states = create_states(&StatesConfig::default());
    let igs = &states.item_geometry;

    igs.activate(42, ActiveFlags::SHOW).unwrap();
    assert_eq!(igs.active(42), ActiveFlags::SHOW);
    assert_eq!(igs.entry(42).unwrap().kind, GeometryKind::Point);

    igs.toggle_item(42, ActiveFlags::SHOW).unwrap();
    assert_eq!(igs.active(42), ActiveFlags::NONE);
    assert!(igs.contains(42));
    assert_eq!(igs.size(), 1);
}

#[test]
fn test_unknown_item_activation_propagates_failure() {
    let states = create_states(&StatesConfig::default());
    let err = states
        .item_geometry
        .activate(999, ActiveFlags::SHOW)
        .unwrap_err();
    assert!(matches!(err, Error::ObjectStore { item_id: 999, .. }));
    assert_eq!(states.item_geometry.size(), 0);
}

#[test]
fn test_query_then_show_result() {
    let states = create_states(&StatesConfig::default());
    let zooms = Arc::new(Mutex::new(Vec::new()));
    let _sub = {
        let zooms = Arc::clone(&zooms);
        states.item_geometry.subscribe(move |e| {
            if let ItemGeometryEvent::ZoomToItem(id) = e {
                zooms.lock().push(*id);
            }
        })
    };

    assert_eq!(states.run_query_for("cafe").unwrap(), 2);
    let snap = states.result_list.snapshot();
    assert_eq!(snap.query, "cafe");
    assert_eq!(snap.items.as_slice(), &[12, 17]);
    assert_eq!(snap.cqr.cell_count(), 1);

    let id = states.show_result_item(1).unwrap();
    assert_eq!(id, 17);
    assert_eq!(states.item_geometry.active(17), ActiveFlags::SHOW);
    assert_eq!(*zooms.lock(), vec![17]);
}

#[test]
fn test_search_cover_cached_on_entry() {
    let states = create_states(&StatesConfig::default());
    states
        .search_geometry
        .add("route", path3(), GeometryKind::Path)
        .unwrap();
    states.compute_search_cover(0).unwrap();

    let entry = states.search_geometry.entry(0).unwrap();
    assert_eq!(entry.cells.as_slice(), &[1, 2, 3]);
    assert_eq!(entry.triangles.as_slice(), &[10, 20, 30]);
    assert_eq!(entry.active, ActiveFlags::NONE);
}

#[test]
fn test_repeated_text_notifies_once() {
    let states = create_states(&StatesConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let _sub = {
        let seen = Arc::clone(&seen);
        states.text_search.subscribe(move |e| {
            let TextSearchEvent::Changed(v) = e;
            seen.lock().push(v.clone());
        })
    };
    states.text_search.set_search_text("park");
    states.text_search.set_search_text("park");
    assert_eq!(*seen.lock(), vec!["park".to_string()]);
}

// ============================================================================
// SECTION 2: Threads
// ============================================================================

/// An input thread adds and removes geometries while render threads iterate;
/// every iteration sees a contiguous, fully formed sequence.
#[test]
fn test_render_threads_iterate_while_input_mutates() {
    let states = create_states(&StatesConfig::default());
    let stop = Arc::new(AtomicBool::new(false));
    let bad = Arc::new(AtomicUsize::new(0));
    let start = Arc::new(Barrier::new(4));

    let renderers: Vec<_> = (0..3)
        .map(|_| {
            let states = states.clone();
            let stop = Arc::clone(&stop);
            let bad = Arc::clone(&bad);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                while !stop.load(Ordering::SeqCst) {
                    let mut expected = 0;
                    states.search_geometry.for_each(|pos, entry| {
                        if pos != expected || entry.data.len() != 3 {
                            bad.fetch_add(1, Ordering::SeqCst);
                        }
                        expected += 1;
                    });
                }
            })
        })
        .collect();

    start.wait();
    for i in 0..300 {
        states
            .search_geometry
            .add(format!("g{}", i), path3(), GeometryKind::Path)
            .unwrap();
        if i % 3 == 0 {
            states.search_geometry.remove(0).unwrap();
        }
    }
    stop.store(true, Ordering::SeqCst);
    for r in renderers {
        r.join().unwrap();
    }

    assert_eq!(bad.load(Ordering::SeqCst), 0);
    assert_eq!(states.search_geometry.size(), 200);
}

/// Concurrent activations of the same item from many threads create exactly
/// one entry.
#[test]
fn test_concurrent_activation_creates_one_entry() {
    let states = create_states(&StatesConfig {
        zoom_on_show: false,
        ..StatesConfig::default()
    });
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let states = states.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let flag = if i % 2 == 0 {
                    ActiveFlags::SHOW
                } else {
                    ActiveFlags::CELLS
                };
                states.item_geometry.activate(55, flag).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(states.item_geometry.size(), 1);
    assert_eq!(
        states.item_geometry.active(55),
        ActiveFlags::SHOW | ActiveFlags::CELLS
    );
}

/// A background completion thread publishes results while readers check
/// that query and items always belong together.
#[test]
fn test_background_queries_publish_consistent_results() {
    let states = create_states(&StatesConfig::default());
    let stop = Arc::new(AtomicBool::new(false));
    let torn = Arc::new(AtomicUsize::new(0));

    let reader = {
        let states = states.clone();
        let stop = Arc::clone(&stop);
        let torn = Arc::clone(&torn);
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                let snap = states.result_list.snapshot();
                let expected: &[u32] = match snap.query.as_str() {
                    "" => &[],
                    "cafe" => &[12, 17],
                    "museum" => &[42],
                    "park" => &[55],
                    _ => &[0],
                };
                if snap.items.as_slice() != expected || snap.cqr.flatten() != snap.items {
                    torn.fetch_add(1, Ordering::SeqCst);
                }
            }
        })
    };

    let worker = {
        let states = states.clone();
        thread::spawn(move || {
            for q in ["cafe", "museum", "park"].iter().cycle().take(150) {
                states.run_query_for(*q).unwrap();
            }
        })
    };

    worker.join().unwrap();
    stop.store(true, Ordering::SeqCst);
    reader.join().unwrap();
    assert_eq!(torn.load(Ordering::SeqCst), 0);
}

// ============================================================================
// SECTION 3: Notification
// ============================================================================

/// Subscribers read the store from their callback and always see the write
/// that triggered the event.
#[test]
fn test_subscriber_observes_write_that_triggered_event() {
    let states = create_states(&StatesConfig::default());
    let observed = Arc::new(Mutex::new(Vec::new()));
    let _sub = {
        let sgs = Arc::downgrade(&states.search_geometry);
        let observed = Arc::clone(&observed);
        states.search_geometry.subscribe(move |e| {
            if let (SearchGeometryEvent::Changed(pos), Some(sgs)) = (e, sgs.upgrade()) {
                observed.lock().push(sgs.active(*pos).unwrap());
            }
        })
    };

    states
        .search_geometry
        .add("A", path3(), GeometryKind::Path)
        .unwrap();
    states
        .search_geometry
        .activate(0, ActiveFlags::TRIANGLES)
        .unwrap();
    states.search_geometry.toggle(0, ActiveFlags::SHOW).unwrap();

    assert_eq!(
        *observed.lock(),
        vec![
            ActiveFlags::TRIANGLES,
            ActiveFlags::TRIANGLES | ActiveFlags::SHOW
        ]
    );
}

#[test]
fn test_dropped_subscription_stops_delivery() {
    let states = create_states(&StatesConfig::default());
    let count = Arc::new(AtomicUsize::new(0));
    let sub = {
        let count = Arc::clone(&count);
        states.result_list.subscribe(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };
    states.run_query_for("park").unwrap();
    drop(sub);
    states.run_query_for("cafe").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
