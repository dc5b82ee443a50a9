//! Mapping between external shaft keys (as written in a machine
//! description) and contiguous arena ids.

use std::collections::HashMap;

use da_core::ShaftId;

use crate::error::{GraphError, GraphResult};

/// Bidirectional key <-> `ShaftId` map.
///
/// Anonymous shafts (created by the loader, not named in the description)
/// have no key.
#[derive(Debug, Clone, Default)]
pub struct ShaftIndex {
    by_key: HashMap<i64, ShaftId>,
    /// Indexed by `ShaftId::slot()`.
    keys: Vec<Option<i64>>,
}

impl ShaftIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` names `shaft`.
    pub fn insert(&mut self, key: i64, shaft: ShaftId) -> GraphResult<()> {
        if self.by_key.contains_key(&key) {
            return Err(GraphError::DuplicateKey { key });
        }
        self.by_key.insert(key, shaft);
        self.set_key(shaft, Some(key));
        Ok(())
    }

    /// Record an anonymous shaft so `key_of` stays total.
    pub fn insert_anonymous(&mut self, shaft: ShaftId) {
        self.set_key(shaft, None);
    }

    fn set_key(&mut self, shaft: ShaftId, key: Option<i64>) {
        let slot = shaft.slot();
        if self.keys.len() <= slot {
            self.keys.resize(slot + 1, None);
        }
        self.keys[slot] = key;
    }

    pub fn get(&self, key: i64) -> GraphResult<ShaftId> {
        self.by_key
            .get(&key)
            .copied()
            .ok_or(GraphError::UnknownKey { key })
    }

    pub fn contains(&self, key: i64) -> bool {
        self.by_key.contains_key(&key)
    }

    pub fn key_of(&self, shaft: ShaftId) -> Option<i64> {
        self.keys.get(shaft.slot()).copied().flatten()
    }

    /// Number of keyed shafts.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
