// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Pipeline composition - the entry points the dashboard calls
//!
//! `analyze_bytes` chains decode, geometry analysis, and estimation, and
//! routes decode failures to the file-size fallback so a result always
//! comes back. The surrounding concerns of the boundary layer live in
//! the submodules: content-identity caching, the single-flight fetch
//! gate, and paced batch processing.

mod cache;
mod fetch;

pub use cache::{file_identity, AnalysisCache, CacheStats, FileId};
pub use fetch::{BatchRunner, FetchGate, FetchPermit};

use crate::config::EngineConfig;
use crate::decode::{self, DecodeError};
use crate::estimate::{self, ManufacturingEstimate};
use crate::geometry::{self, GeometryMetrics, SourceFormat, TriangleSoup};
use crate::orient::{self, RotationCandidate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Complete analysis of one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshAnalysis {
    /// Geometry metrics; absent when decoding failed entirely
    pub metrics: Option<GeometryMetrics>,
    /// Quote; absent only for invalid estimator configuration
    pub estimate: Option<ManufacturingEstimate>,
    /// Detected source format, when decoding succeeded
    pub format: Option<SourceFormat>,
    /// Why the engine fell back to file-size estimation, when it did
    pub decode_failure: Option<String>,
}

impl MeshAnalysis {
    /// True when any fallback or degradation path was taken
    pub fn degraded(&self) -> bool {
        self.decode_failure.is_some()
            || self
                .metrics
                .as_ref()
                .map(|m| m.degraded())
                .unwrap_or(false)
    }
}

/// Analyze a raw mesh byte buffer end to end.
///
/// `declared_size_mb` is the transport layer's knowledge of the file
/// size; when absent the buffer length stands in. The function never
/// fails: malformed bytes produce a file-size estimate instead.
pub fn analyze_bytes(
    bytes: &[u8],
    declared_size_mb: Option<f64>,
    config: &EngineConfig,
) -> MeshAnalysis {
    match decode::decode(bytes, &config.decode) {
        Ok(soup) => {
            let metrics = geometry::analyze(&soup, &config.analyzer);
            let estimate = estimate::estimate(&metrics, &config.material, &config.print);
            debug!(
                triangles = metrics.triangle_count,
                volume_cm3 = metrics.volume_cm3,
                degraded = metrics.degraded(),
                "analysis complete"
            );
            MeshAnalysis {
                format: Some(soup.format),
                metrics: Some(metrics),
                estimate,
                decode_failure: None,
            }
        }
        Err(error) => {
            let size_mb = declared_size_mb.unwrap_or(bytes.len() as f64 / BYTES_PER_MB);
            warn!(%error, size_mb, "decode failed, estimating from file size");
            MeshAnalysis {
                metrics: None,
                estimate: estimate::estimate_from_file_size(size_mb, &config.fallback),
                format: None,
                decode_failure: Some(error.to_string()),
            }
        }
    }
}

/// Decode a buffer and search for its best print orientation.
///
/// Unlike `analyze_bytes` this can fail: without decodable geometry
/// there is nothing to rotate.
pub fn orient_bytes(
    bytes: &[u8],
    config: &EngineConfig,
) -> Result<RotationCandidate, DecodeError> {
    let soup = decode::decode(bytes, &config.decode)?;
    Ok(orient::find_optimal_rotation(&soup, &config.envelope))
}

/// Decode without analysis, for callers that need the soup itself.
pub fn decode_bytes(bytes: &[u8], config: &EngineConfig) -> Result<TriangleSoup, DecodeError> {
    decode::decode(bytes, &config.decode)
}
