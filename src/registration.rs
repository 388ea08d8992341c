//! Service registration types.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;

pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Implementation type ID for diagnostics
    pub(crate) impl_id: Option<TypeId>,
    /// Singleton cache; the lock is held while the constructor runs so the
    /// value is built exactly once
    pub(crate) single_runtime: Option<Mutex<Option<AnyArc>>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(Mutex::new(None)),
            Lifetime::Transient => None,
        };

        Self {
            lifetime,
            ctor,
            impl_id,
            single_runtime,
        }
    }
}

/// Service registry holding all registrations in registration order
pub(crate) struct Registry {
    entries: Vec<(Key, Registration)>,
    index: HashMap<Key, usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a registration; a later registration for the same key replaces
    /// the earlier one in place
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos] = (key, registration),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, registration));
            }
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }
}
