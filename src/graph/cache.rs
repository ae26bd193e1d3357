//! Caller-owned cache of built graphs.

use std::collections::HashMap;
use std::sync::Arc;

use super::builder::GraphBuilder;
use super::network::Graph;
use crate::error::Result;
use crate::schedule::ScheduleData;

/// Cache key: schedule snapshot identity plus every build constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphKey {
    pub snapshot: String,
    config_bits: [u64; 8],
}

impl GraphKey {
    pub fn new(snapshot: &str, builder: &GraphBuilder) -> Self {
        Self {
            snapshot: snapshot.to_string(),
            config_bits: builder.config().key_bits(),
        }
    }
}

/// Built graphs shared through [`Arc`].
///
/// The cache is an ordinary value owned by the caller; nothing is global.
/// The caller is responsible for choosing snapshot ids that change
/// whenever the underlying schedule data or bridge rules change.
///
/// # Examples
///
/// ```
/// use u_multimodal::graph::{GraphBuilder, GraphCache, GraphConfig};
/// use u_multimodal::schedule::{ScheduleData, StopRecord};
///
/// let mut data = ScheduleData::default();
/// data.stops.push(StopRecord::new("A", "METRO", 41.15, -8.61));
///
/// let builder = GraphBuilder::new(GraphConfig::default());
/// let mut cache = GraphCache::new();
/// let first = cache.get_or_build("2024-09", &builder, &data).unwrap();
/// let again = cache.get_or_build("2024-09", &builder, &data).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
/// ```
#[derive(Debug, Default)]
pub struct GraphCache {
    graphs: HashMap<GraphKey, Arc<Graph>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached graph or builds and stores it.
    pub fn get_or_build(
        &mut self,
        snapshot: &str,
        builder: &GraphBuilder,
        data: &ScheduleData,
    ) -> Result<Arc<Graph>> {
        let key = GraphKey::new(snapshot, builder);
        if let Some(graph) = self.graphs.get(&key) {
            log::debug!("graph cache hit for snapshot '{snapshot}'");
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(builder.build(data)?);
        self.graphs.insert(key, Arc::clone(&graph));
        Ok(graph)
    }

    pub fn get(&self, snapshot: &str, builder: &GraphBuilder) -> Option<Arc<Graph>> {
        self.graphs.get(&GraphKey::new(snapshot, builder)).cloned()
    }

    /// Drops every graph built from `snapshot`. Returns how many were removed.
    pub fn invalidate(&mut self, snapshot: &str) -> usize {
        let before = self.graphs.len();
        self.graphs.retain(|key, _| key.snapshot != snapshot);
        before - self.graphs.len()
    }

    /// Drops the graph of one exact key.
    pub fn invalidate_key(&mut self, key: &GraphKey) -> bool {
        self.graphs.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
