// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Geometry analysis - bounding box, volume, surface area

use super::{BoundingBox, TriangleSoup};
use crate::config::AnalyzerSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which path produced the reported volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    /// Signed-volume sum over every decoded triangle
    Measured,
    /// Signed volume scaled up from a truncated sample
    Extrapolated,
    /// Bounding-box occupancy heuristic
    BboxHeuristic,
}

/// Physical properties derived from a triangle soup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryMetrics {
    pub triangle_count: usize,
    pub vertex_count: usize,
    pub bbox: BoundingBox,
    /// Mesh volume in cm³, clamped to the configured sane range
    pub volume_cm3: f64,
    /// Total facet area in mm², absent for an empty soup
    pub surface_area_mm2: Option<f64>,
    pub volume_source: VolumeSource,
}

impl GeometryMetrics {
    /// True when the volume was extrapolated or substituted by a heuristic
    pub fn degraded(&self) -> bool {
        self.volume_source != VolumeSource::Measured
    }

    /// Bounding-box extents in mm as [width, depth, height]
    pub fn dimensions_mm(&self) -> [f64; 3] {
        let size = self.bbox.size();
        [size.x, size.y, size.z]
    }
}

/// Analyze a triangle soup and compute its physical metrics.
///
/// Pure function of the soup; repeated calls yield identical results.
pub fn analyze(soup: &TriangleSoup, settings: &AnalyzerSettings) -> GeometryMetrics {
    let bbox = soup.bounding_box();
    let sampled = soup.triangle_count();

    let mut signed_sum_mm3 = 0.0;
    for triangle in &soup.triangles {
        let [v0, v1, v2] = &triangle.vertices;
        // Signed volume of the tetrahedron formed by the triangle and the origin
        let signed = v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;

        // Non-finite or implausibly large contributions are decode noise
        if !signed.is_finite() || signed.abs() > settings.max_contribution_mm3 {
            continue;
        }
        signed_sum_mm3 += signed;
    }

    let mut volume_mm3 = signed_sum_mm3.abs();
    let mut source = VolumeSource::Measured;

    if let Some(claimed) = soup.claimed_triangles {
        if claimed > sampled && sampled > 0 {
            volume_mm3 *= claimed as f64 / sampled as f64;
            source = VolumeSource::Extrapolated;
            debug!(claimed, sampled, "extrapolating volume from partial sample");
        }
    }

    let mut volume_cm3 = volume_mm3 / 1000.0;
    if !volume_cm3.is_finite() || volume_cm3 < settings.volume_floor_cm3 {
        volume_cm3 = bbox.volume() / 1000.0 * settings.occupancy_fraction;
        source = VolumeSource::BboxHeuristic;
        debug!(volume_cm3, "substituting bounding-box occupancy heuristic");
    }
    if !volume_cm3.is_finite() {
        volume_cm3 = settings.volume_clamp_min_cm3;
    }
    volume_cm3 = volume_cm3.clamp(settings.volume_clamp_min_cm3, settings.volume_clamp_max_cm3);

    let surface_area_mm2 = if sampled > 0 {
        Some(surface_area(soup))
    } else {
        None
    };

    GeometryMetrics {
        triangle_count: sampled,
        vertex_count: soup.vertex_count(),
        bbox,
        volume_cm3,
        surface_area_mm2,
        volume_source: source,
    }
}

/// Total facet area from triangle cross products
fn surface_area(soup: &TriangleSoup) -> f64 {
    let mut area = 0.0;
    for triangle in &soup.triangles {
        let [v0, v1, v2] = &triangle.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let contribution = edge1.cross(&edge2).norm() / 2.0;
        if contribution.is_finite() {
            area += contribution;
        }
    }
    area
}
