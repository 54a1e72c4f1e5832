// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Analysis cache keyed by file content identity
//!
//! Hits are authoritative: the engine never recomputes for a known
//! identity until the caller clears or purges the entry. Entries whose
//! estimate carries a non-finite or negative weight are considered
//! poisoned and removed by `purge_invalid`.

use super::{analyze_bytes, MeshAnalysis};
use crate::config::EngineConfig;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Content hash used as the cache key
pub type FileId = String;

/// SHA-256 over the raw bytes, hex encoded
pub fn file_identity(bytes: &[u8]) -> FileId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// In-memory analysis cache
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: DashMap<FileId, Arc<MeshAnalysis>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<MeshAnalysis>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, id: FileId, analysis: MeshAnalysis) -> Arc<MeshAnalysis> {
        let analysis = Arc::new(analysis);
        self.entries.insert(id, Arc::clone(&analysis));
        analysis
    }

    /// Return the cached analysis for these bytes, computing it on miss.
    pub fn get_or_analyze(
        &self,
        bytes: &[u8],
        declared_size_mb: Option<f64>,
        config: &EngineConfig,
    ) -> Arc<MeshAnalysis> {
        let id = file_identity(bytes);
        if let Some(hit) = self.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%id, "analysis cache hit");
            return hit;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let analysis = analyze_bytes(bytes, declared_size_mb, config);
        self.insert(id, analysis)
    }

    /// Drop one entry, forcing recomputation on next access
    pub fn invalidate(&self, id: &str) {
        self.entries.remove(id);
    }

    /// Drop entries with non-finite or negative weight. Returns how many
    /// were removed.
    pub fn purge_invalid(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, analysis| {
            analysis
                .estimate
                .as_ref()
                .map(|e| e.weight_g.is_finite() && e.weight_g >= 0.0)
                .unwrap_or(false)
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "purged poisoned cache entries");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
