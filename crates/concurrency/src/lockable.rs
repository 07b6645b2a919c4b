//! Reader/writer guarded state
//!
//! `LockableState<T>` owns a value behind a `parking_lot::RwLock`:
//! any number of shared holders, or exactly one exclusive holder.
//!
//! ## Contract
//!
//! - `read_lock()` blocks while a writer holds the lock or is queued for it.
//!   Readers never block each other while no writer is waiting.
//! - `write_lock()` blocks until every reader and writer has released. Once
//!   it is queued, new readers wait behind it, including a second
//!   `read_lock()` on a thread that already holds a shared guard.
//! - Guards release exactly once, when dropped, on every exit path
//!   (normal return, `?` early return, unwinding).
//! - Acquisition is not re-entrant. Taking the same state's lock again while
//!   holding it deadlocks. There is no upgrade or downgrade; release and
//!   reacquire instead.
//! - There is no timeout. `try_read_lock()` / `try_write_lock()` are the only
//!   non-blocking paths.
//!
//! A writer that panics while holding the lock releases it without poisoning;
//! later readers see whatever state the writer left behind.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::ops::Deref;
use tracing::trace;

/// Shared hold on a `LockableState`
pub type ReadGuard<'a, T> = RwLockReadGuard<'a, T>;

/// Exclusive hold on a `LockableState`
pub type WriteGuard<'a, T> = RwLockWriteGuard<'a, T>;

/// Kind of hold requested from [`LockableState::lock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    /// Shared (read) access
    Shared,
    /// Exclusive (write) access
    Exclusive,
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKind::Shared => f.write_str("shared"),
            LockKind::Exclusive => f.write_str("exclusive"),
        }
    }
}

/// Scoped hold of either kind
///
/// Dereferences to the protected value. Mutable access is only available
/// through an exclusive hold.
pub enum ScopedLock<'a, T> {
    /// Shared hold
    Shared(ReadGuard<'a, T>),
    /// Exclusive hold
    Exclusive(WriteGuard<'a, T>),
}

impl<'a, T> ScopedLock<'a, T> {
    /// Kind of hold this guard represents
    pub fn kind(&self) -> LockKind {
        match self {
            ScopedLock::Shared(_) => LockKind::Shared,
            ScopedLock::Exclusive(_) => LockKind::Exclusive,
        }
    }

    /// Mutable access, `None` on a shared hold
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            ScopedLock::Shared(_) => None,
            ScopedLock::Exclusive(guard) => Some(&mut **guard),
        }
    }
}

impl<'a, T> Deref for ScopedLock<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            ScopedLock::Shared(guard) => guard,
            ScopedLock::Exclusive(guard) => guard,
        }
    }
}

impl<'a, T> From<ReadGuard<'a, T>> for ScopedLock<'a, T> {
    fn from(guard: ReadGuard<'a, T>) -> Self {
        ScopedLock::Shared(guard)
    }
}

impl<'a, T> From<WriteGuard<'a, T>> for ScopedLock<'a, T> {
    fn from(guard: WriteGuard<'a, T>) -> Self {
        ScopedLock::Exclusive(guard)
    }
}

/// A value guarded by a reader/writer lock
///
/// Every store in the state layer wraps its collection in one of these. The
/// label only appears in trace logs.
pub struct LockableState<T> {
    label: &'static str,
    inner: RwLock<T>,
}

impl<T> LockableState<T> {
    /// Wrap `value` under a lock named `label`
    pub fn new(label: &'static str, value: T) -> Self {
        Self {
            label,
            inner: RwLock::new(value),
        }
    }

    /// Name used in trace logs
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Take a shared hold, blocking while a writer holds the lock
    pub fn read_lock(&self) -> ReadGuard<'_, T> {
        trace!(state = self.label, kind = %LockKind::Shared, "acquire");
        self.inner.read()
    }

    /// Take an exclusive hold, blocking until all holders release
    pub fn write_lock(&self) -> WriteGuard<'_, T> {
        trace!(state = self.label, kind = %LockKind::Exclusive, "acquire");
        self.inner.write()
    }

    /// Take a hold of the requested kind
    pub fn lock(&self, kind: LockKind) -> ScopedLock<'_, T> {
        match kind {
            LockKind::Shared => self.read_lock().into(),
            LockKind::Exclusive => self.write_lock().into(),
        }
    }

    /// Shared hold without blocking, `None` if a writer holds the lock
    pub fn try_read_lock(&self) -> Option<ReadGuard<'_, T>> {
        self.inner.try_read()
    }

    /// Exclusive hold without blocking, `None` if anyone holds the lock
    pub fn try_write_lock(&self) -> Option<WriteGuard<'_, T>> {
        self.inner.try_write()
    }

    /// Hold of the requested kind without blocking
    pub fn try_lock(&self, kind: LockKind) -> Option<ScopedLock<'_, T>> {
        match kind {
            LockKind::Shared => self.try_read_lock().map(ScopedLock::from),
            LockKind::Exclusive => self.try_write_lock().map(ScopedLock::from),
        }
    }

    /// Run `f` under a shared hold
    pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.read_lock();
        f(&guard)
    }

    /// Run `f` under an exclusive hold
    ///
    /// The hold is released before this returns, so callers can notify
    /// observers afterwards without holding the lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.write_lock();
        f(&mut guard)
    }
}

impl<T: Default> Default for LockableState<T> {
    fn default() -> Self {
        Self::new("state", T::default())
    }
}

impl<T> fmt::Debug for LockableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockableState")
            .field("label", &self.label)
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}
