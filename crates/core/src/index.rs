//! Index sets produced by the search engine
//!
//! ItemIndex is an immutable sorted id set backed by a shared buffer, so
//! cloning out of a store under a read lock is O(1). CellQueryResult pairs
//! spatial cells with the items matched inside them.

use std::sync::Arc;

/// Immutable, sorted, de-duplicated set of ids
///
/// Used for item ids, cell ids and triangle ids alike; the meaning of the
/// ids is owned by the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemIndex {
    ids: Arc<[u32]>,
}

impl Default for ItemIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemIndex {
    /// Empty set
    pub fn new() -> Self {
        Self {
            ids: Arc::from(Vec::new()),
        }
    }

    fn from_sorted(ids: Vec<u32>) -> Self {
        Self { ids: Arc::from(ids) }
    }

    /// Number of ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the set is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id at `pos` in ascending order
    pub fn at(&self, pos: usize) -> Option<u32> {
        self.ids.get(pos).copied()
    }

    /// Membership test
    pub fn contains(&self, id: u32) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Iterate ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Ids as a sorted slice
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    /// Ids present in either set
    #[must_use]
    pub fn union(&self, other: &ItemIndex) -> ItemIndex {
        let (a, b) = (self.as_slice(), other.as_slice());
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        ItemIndex::from_sorted(out)
    }

    /// Ids present in both sets
    #[must_use]
    pub fn intersection(&self, other: &ItemIndex) -> ItemIndex {
        let (a, b) = (self.as_slice(), other.as_slice());
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        ItemIndex::from_sorted(out)
    }

    /// Ids in `self` but not in `other`
    #[must_use]
    pub fn difference(&self, other: &ItemIndex) -> ItemIndex {
        ItemIndex::from_sorted(self.iter().filter(|id| !other.contains(*id)).collect())
    }
}

impl FromIterator<u32> for ItemIndex {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut ids: Vec<u32> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        ItemIndex::from_sorted(ids)
    }
}

impl From<Vec<u32>> for ItemIndex {
    fn from(ids: Vec<u32>) -> Self {
        ids.into_iter().collect()
    }
}

/// One cell of a query result and the items matched in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatch {
    /// Cell id in the search engine's spatial partition
    pub cell_id: u32,
    /// Items matched inside the cell
    pub items: ItemIndex,
}

/// Per-cell result of a query, as produced by the completer
///
/// The state layer treats this as opaque apart from flattening it into the
/// result item list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellQueryResult {
    cells: Vec<CellMatch>,
}

impl CellQueryResult {
    /// Empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(cell_id, items)` pairs, sorted by cell id
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (u32, ItemIndex)>,
    {
        let mut cells: Vec<CellMatch> = cells
            .into_iter()
            .map(|(cell_id, items)| CellMatch { cell_id, items })
            .collect();
        cells.sort_by_key(|c| c.cell_id);
        Self { cells }
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if no cell matched
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Matched cells in ascending cell-id order
    pub fn cells(&self) -> &[CellMatch] {
        &self.cells
    }

    /// Union of all per-cell item sets
    pub fn flatten(&self) -> ItemIndex {
        self.cells
            .iter()
            .flat_map(|c| c.items.iter())
            .collect()
    }
}
