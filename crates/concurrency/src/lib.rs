//! Concurrency layer for mapstate
//!
//! This crate provides the two primitives every store is built on:
//! - LockableState: a value behind a reader/writer lock with scoped guards
//! - Notifier: synchronous fan-out of change events to subscribers
//!
//! Stores mutate under an exclusive hold, release it, then emit. A reader
//! that locks after receiving an event always observes the write that
//! caused it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lockable;
pub mod notify;

pub use lockable::{LockKind, LockableState, ReadGuard, ScopedLock, WriteGuard};
pub use notify::{Notifier, Subscription};
