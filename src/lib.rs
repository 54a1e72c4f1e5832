// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Meshquote STL Geometry & Estimation Engine
//!
//! Decodes untrusted STL byte buffers into triangle soup, derives
//! physical properties, prices them into manufacturing estimates, and
//! searches print orientations against a build envelope. The engine is
//! pure computation over byte buffers and value types; fetching,
//! rendering, and persistence belong to the caller.

pub mod cli;
pub mod config;
pub mod decode;
pub mod estimate;
pub mod geometry;
pub mod orient;
pub mod pipeline;

pub use config::{BuildEnvelope, EngineConfig, MaterialProfile, PrintSettings};
pub use decode::{decode, detect_format, DecodeError};
pub use estimate::{
    estimate, estimate_from_file_size, EstimateFidelity, ManufacturingEstimate,
};
pub use geometry::{
    analyze, BoundingBox, GeometryMetrics, SourceFormat, Triangle, TriangleSoup, VolumeSource,
};
pub use orient::{enumerate_candidates, find_optimal_rotation, RotationCandidate};
pub use pipeline::{analyze_bytes, AnalysisCache, FetchGate, MeshAnalysis};

/// Main entry point: analyze a mesh buffer with the default configuration
pub fn analyze_mesh(bytes: &[u8]) -> MeshAnalysis {
    pipeline::analyze_bytes(bytes, None, &EngineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_buffer_still_yields_a_result() {
        let result = analyze_mesh(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(result.metrics.is_none());
        assert!(result.estimate.is_some());
    }
}
