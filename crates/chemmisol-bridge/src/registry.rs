//! Generation-tagged handle registry for engines owned by the host
//!
//! A handle is a non-zero `i64` laid out as `(generation << 32) | slot`.
//! Freed slots are reused with the next generation, so a handle kept after
//! its engine was disposed never designates another engine.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

struct Slot<T> {
    generation: u32,
    value: Arc<Mutex<T>>,
}

/// Thread-safe registry mapping handles to values.
///
/// Each value sits behind its own mutex: operations on one handle are
/// serialized, operations on different handles run concurrently.
pub struct HandleRegistry<T> {
    slots: DashMap<u32, Slot<T>>,
    free: Mutex<Vec<(u32, u32)>>,
    next_slot: AtomicU32,
}

fn encode(slot: u32, generation: u32) -> i64 {
    ((u64::from(generation) << 32) | u64::from(slot)) as i64
}

fn decode(handle: i64) -> (u32, u32) {
    let raw = handle as u64;
    ((raw & 0xffff_ffff) as u32, (raw >> 32) as u32)
}

impl<T> HandleRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            free: Mutex::new(Vec::new()),
            next_slot: AtomicU32::new(0),
        }
    }

    /// Insert a value and return its handle.
    pub fn insert(&self, value: T) -> i64 {
        let reused = self.free.lock().pop();
        let (slot, generation) =
            reused.unwrap_or_else(|| (self.next_slot.fetch_add(1, Ordering::Relaxed), 1));
        self.slots.insert(
            slot,
            Slot {
                generation,
                value: Arc::new(Mutex::new(value)),
            },
        );
        encode(slot, generation)
    }

    /// Get the value of a live handle.
    pub fn get(&self, handle: i64) -> Option<Arc<Mutex<T>>> {
        let (slot, generation) = decode(handle);
        self.slots
            .get(&slot)
            .filter(|entry| generation != 0 && entry.generation == generation)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Remove a live handle, returning its value.
    ///
    /// The handle, and any copy of it, is stale afterwards.
    pub fn remove(&self, handle: i64) -> Option<Arc<Mutex<T>>> {
        let (slot, generation) = decode(handle);
        if generation == 0 {
            return None;
        }
        let (_, entry) = self
            .slots
            .remove_if(&slot, |_, entry| entry.generation == generation)?;
        let next = generation.wrapping_add(1).max(1);
        self.free.lock().push((slot, next));
        Some(entry.value)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no handle is live.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
