//! Per-kind keyed record storage.
//!
//! Identifiers are issued in increasing order, so iterating the underlying
//! `BTreeMap` yields records in insertion order.

use std::collections::BTreeMap;

use crate::error::{ClinicError, ClinicResult};
use crate::ids::IdAllocator;
use crate::model::Entity;

/// Builds the error returned when `id` does not resolve for the store's kind.
pub(crate) fn not_found<T: Entity>(id: u64) -> ClinicError {
    ClinicError::not_found(format!("{} with id={} not found", T::KIND, id))
}

/// In-memory collection for a single entity kind.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    records: BTreeMap<u64, T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an identifier, builds the record with it and stores it.
    ///
    /// Returns a copy of the stored record. Fails without touching the store once
    /// the kind's identifier space is used up.
    pub fn insert(&mut self, ids: &IdAllocator, build: impl FnOnce(u64) -> T) -> ClinicResult<T> {
        let id = ids.next_id(T::KIND).ok_or_else(|| {
            ClinicError::invalid_input(format!("no {} identifiers left to issue", T::KIND))
        })?;
        let record = build(id);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    pub fn get(&self, id: u64) -> ClinicResult<T> {
        self.records.get(&id).cloned().ok_or_else(|| not_found::<T>(id))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// Applies `patch` to the stored record and returns the result.
    ///
    /// The patch must not change the identifier.
    pub fn update(&mut self, id: u64, patch: impl FnOnce(&mut T)) -> ClinicResult<T> {
        let record = self.records.get_mut(&id).ok_or_else(|| not_found::<T>(id))?;
        patch(record);
        debug_assert_eq!(record.id(), id, "update must not change the identifier");
        Ok(record.clone())
    }

    pub fn delete(&mut self, id: u64) -> ClinicResult<()> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found::<T>(id))
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest identifier currently stored.
    pub fn max_id(&self) -> Option<u64> {
        self.records.keys().next_back().copied()
    }

    /// Puts back a record that already carries an identifier. Used when loading a
    /// snapshot; returns false if the identifier was already present.
    pub(crate) fn restore(&mut self, record: T) -> bool {
        let id = record.id();
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, record);
        true
    }
}
