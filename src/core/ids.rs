use std::collections::HashMap;

use crate::error::{GraphError, Result};

/// Dense internal node index.
pub type NodeId = u32;

/// Node identifier as it appears in the input.
pub type ExternalId = u64;

/// Bijective mapping between input identifiers and dense internal indices.
///
/// Internal indices are handed out in first-seen order and never change for
/// the lifetime of the registry.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    map: HashMap<ExternalId, NodeId>,
    externals: Vec<ExternalId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert(&mut self, external_id: ExternalId) -> Result<NodeId> {
        if let Some(&id) = self.map.get(&external_id) {
            return Ok(id);
        }
        let next = self.externals.len();
        if next >= NodeId::MAX as usize {
            return Err(GraphError::TooManyNodes {
                limit: NodeId::MAX as usize,
            });
        }
        let id = next as NodeId;
        self.map.insert(external_id, id);
        self.externals.push(external_id);
        Ok(id)
    }

    pub fn get(&self, external_id: ExternalId) -> Option<NodeId> {
        self.map.get(&external_id).copied()
    }

    pub fn external(&self, id: NodeId) -> ExternalId {
        self.externals[id as usize]
    }

    pub fn externals(&self) -> &[ExternalId] {
        &self.externals
    }

    pub fn len(&self) -> usize {
        self.externals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.externals.is_empty()
    }

    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
        self.externals.shrink_to_fit();
    }

    /// Bytes held by the forward table and the reverse vector.
    pub fn memory_bytes(&self) -> usize {
        // hashbrown keeps one control byte per bucket next to each slot
        let slot = size_of::<(ExternalId, NodeId)>() + 1;
        self.map.capacity() * slot + self.externals.capacity() * size_of::<ExternalId>()
    }
}
