//! Handle registry.
//!
//! A [`HandleTable`] maps the opaque handles a backend hands out to the
//! backend's per-handle state. It is the single place where the lifetime
//! rules are enforced:
//!
//! ```text
//!   insert() ──→ Live ──→ release() ──→ Released (tombstone)
//!                 │                         │
//!                 └── get()/get_mut() ok     └── any use: ContractViolation
//! ```
//!
//! A released slot stays tombstoned forever unless the table was created
//! with [`HandleTable::with_reuse`], in which case the slot may be handed
//! out again by a later `insert`. A slot is never handed out while live.

use std::marker::PhantomData;

use qirt_ir::{Handle, QubitId, ResultId};

use crate::error::{HalError, HalResult, Violation};

/// Handle types that can key a [`HandleTable`].
pub trait HandleKey: Copy + Into<Handle> {
    /// Build a handle from its raw value.
    fn from_raw(raw: u64) -> Self;
    /// The raw value of this handle.
    fn raw(self) -> u64;
}

impl HandleKey for QubitId {
    fn from_raw(raw: u64) -> Self {
        QubitId(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl HandleKey for ResultId {
    fn from_raw(raw: u64) -> Self {
        ResultId(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Live(T),
    Released,
}

/// Slot table from handles to backend state, with tombstones.
#[derive(Debug)]
pub struct HandleTable<K, T> {
    slots: Vec<Slot<T>>,
    /// Raw value of the handle stored in slot 0.
    base: u64,
    /// Released slots available for reuse; `None` disables reuse.
    free: Option<Vec<usize>>,
    live: usize,
    _key: PhantomData<K>,
}

impl<K: HandleKey, T> HandleTable<K, T> {
    /// Create an empty table that never reuses released slots.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            base: 0,
            free: None,
            live: 0,
            _key: PhantomData,
        }
    }

    /// Create an empty table that recycles released slots.
    pub fn with_reuse() -> Self {
        Self {
            free: Some(Vec::new()),
            ..Self::new()
        }
    }

    /// Offset every handle issued by this table by `base`.
    ///
    /// Result tables use this to keep clear of the `Zero`/`One` constants.
    pub fn with_base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Store `value` and return a handle that is not currently live.
    pub fn insert(&mut self, value: T) -> K {
        let reused = self.free.as_mut().and_then(Vec::pop);
        let index = match reused {
            Some(index) => {
                self.slots[index] = Slot::Live(value);
                index
            }
            None => {
                self.slots.push(Slot::Live(value));
                self.slots.len() - 1
            }
        };
        self.live += 1;
        K::from_raw(self.base + index as u64)
    }

    fn index_of(&self, key: K) -> Option<usize> {
        key.raw()
            .checked_sub(self.base)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < self.slots.len())
    }

    fn violation_for(&self, key: K) -> Violation {
        match self.index_of(key) {
            Some(_) => Violation::Released,
            None => Violation::Unknown,
        }
    }

    /// Look up the state behind a live handle.
    pub fn get(&self, key: K, operation: &'static str) -> HalResult<&T> {
        match self.index_of(key).map(|i| &self.slots[i]) {
            Some(Slot::Live(value)) => Ok(value),
            _ => Err(HalError::violation(operation, key, self.violation_for(key))),
        }
    }

    /// Mutable lookup of the state behind a live handle.
    pub fn get_mut(&mut self, key: K, operation: &'static str) -> HalResult<&mut T> {
        let violation = self.violation_for(key);
        match self.index_of(key) {
            Some(i) => match &mut self.slots[i] {
                Slot::Live(value) => Ok(value),
                Slot::Released => Err(HalError::violation(operation, key, violation)),
            },
            None => Err(HalError::violation(operation, key, violation)),
        }
    }

    /// Tombstone a live handle and return its state.
    pub fn release(&mut self, key: K, operation: &'static str) -> HalResult<T> {
        let Some(index) = self.index_of(key) else {
            return Err(HalError::violation(operation, key, Violation::Unknown));
        };
        match std::mem::replace(&mut self.slots[index], Slot::Released) {
            Slot::Live(value) => {
                self.live -= 1;
                if let Some(free) = self.free.as_mut() {
                    free.push(index);
                }
                Ok(value)
            }
            Slot::Released => Err(HalError::violation(operation, key, Violation::Released)),
        }
    }

    /// Whether `key` names a live slot.
    pub fn is_live(&self, key: K) -> bool {
        matches!(
            self.index_of(key).map(|i| &self.slots[i]),
            Some(Slot::Live(_))
        )
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of slots ever created, live or tombstoned.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live handles in slot order.
    pub fn live_handles(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| match slot {
            Slot::Live(_) => Some(K::from_raw(self.base + i as u64)),
            Slot::Released => None,
        })
    }

    /// Iterate mutably over the state of every live handle.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Live(value) => Some(value),
            Slot::Released => None,
        })
    }
}

impl<K: HandleKey, T> Default for HandleTable<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
