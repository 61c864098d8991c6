//! Lazily growing object pools
//!
//! Objects are toggled active/inactive instead of being dropped. A pool
//! only ever grows: when every object is claimed, `acquire` asks the
//! factory for one more.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Anything a [`Pool`] can hand out
pub trait Poolable {
    fn is_active(&self) -> bool;
    /// Claim the object. Only called on inactive objects.
    fn activate(&mut self);
    /// Deactivate and clear transient state (position, velocity) for reuse
    fn release(&mut self);
}

/// Creates the underlying object when a pool has to grow
pub trait Factory<K, T> {
    fn instantiate(&mut self, kind: K, slot: usize) -> Result<T, SimError>;
}

impl<K, T, F> Factory<K, T> for F
where
    F: FnMut(K, usize) -> Result<T, SimError>,
{
    fn instantiate(&mut self, kind: K, slot: usize) -> Result<T, SimError> {
        self(kind, slot)
    }
}

/// Stable identity of one pooled object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle<K> {
    pub kind: K,
    pub slot: usize,
}

/// Ordered pool of one kind of object
pub struct Pool<K, T> {
    kind: K,
    items: Vec<T>,
    factory: Box<dyn Factory<K, T>>,
}

impl<K: fmt::Debug, T> fmt::Debug for Pool<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("kind", &self.kind)
            .field("len", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl<K, T> Pool<K, T>
where
    K: Copy + fmt::Debug,
    T: Poolable,
{
    pub fn new(kind: K, factory: impl Factory<K, T> + 'static) -> Self {
        Self {
            kind,
            items: Vec::new(),
            factory: Box::new(factory),
        }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    /// Grow to at least `count` objects, all left inactive
    pub fn prewarm(&mut self, count: usize) -> Result<(), SimError> {
        while self.items.len() < count {
            self.grow()?;
        }
        Ok(())
    }

    /// Claim the first inactive object, growing the pool if none is free
    pub fn acquire(&mut self) -> Result<PoolHandle<K>, SimError> {
        let slot = match self.items.iter().position(|item| !item.is_active()) {
            Some(slot) => slot,
            None => {
                let slot = self.grow()?;
                log::debug!("{:?} pool grew to {}", self.kind, self.items.len());
                slot
            }
        };
        self.items[slot].activate();
        Ok(self.handle(slot))
    }

    /// Return an object to the pool. Stale or foreign handles are ignored.
    pub fn release(&mut self, handle: PoolHandle<K>) -> bool {
        match self.items.get_mut(handle.slot) {
            Some(item) if item.is_active() => {
                item.release();
                true
            }
            _ => false,
        }
    }

    /// Release every object, active or not
    pub fn release_all(&mut self) {
        for item in &mut self.items {
            item.release();
        }
    }

    pub fn get(&self, handle: PoolHandle<K>) -> Option<&T> {
        self.items.get(handle.slot)
    }

    pub fn get_mut(&mut self, handle: PoolHandle<K>) -> Option<&mut T> {
        self.items.get_mut(handle.slot)
    }

    pub fn handle(&self, slot: usize) -> PoolHandle<K> {
        PoolHandle {
            kind: self.kind,
            slot,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Active objects with their handles, in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle<K>, &T)> {
        let kind = self.kind;
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_active())
            .map(move |(slot, item)| (PoolHandle { kind, slot }, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    fn grow(&mut self) -> Result<usize, SimError> {
        let slot = self.items.len();
        let mut item = self.factory.instantiate(self.kind, slot)?;
        if item.is_active() {
            item.release();
        }
        self.items.push(item);
        Ok(slot)
    }
}
