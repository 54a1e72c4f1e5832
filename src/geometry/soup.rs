// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Triangle soup representation

use super::BoundingBox;
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// File format a soup was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Binary,
    Ascii,
}

/// Triangle with three corner positions and an advisory facet normal
///
/// The normal is whatever the file stated. Volume and area math never
/// trusts it; both derive orientation from the vertex winding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
    pub normal: Option<Vector3<f64>>,
}

impl Triangle {
    pub fn new(vertices: [Point3<f64>; 3]) -> Self {
        Self {
            vertices,
            normal: None,
        }
    }

    pub fn with_normal(vertices: [Point3<f64>; 3], normal: Vector3<f64>) -> Self {
        Self {
            vertices,
            normal: Some(normal),
        }
    }
}

/// Unindexed triangle mesh plus decode provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleSoup {
    pub triangles: Vec<Triangle>,
    pub format: SourceFormat,
    /// Triangle count claimed by the binary header. `None` for ASCII input.
    /// May exceed `triangles.len()` when the decoder capped its sample or
    /// the file was truncated.
    pub claimed_triangles: Option<usize>,
}

impl TriangleSoup {
    pub fn new(format: SourceFormat) -> Self {
        Self {
            triangles: Vec::new(),
            format,
            claimed_triangles: None,
        }
    }

    pub fn with_capacity(format: SourceFormat, triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
            format,
            claimed_triangles: None,
        }
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// True when the header claimed more triangles than were decoded.
    pub fn is_truncated_sample(&self) -> bool {
        self.claimed_triangles
            .map(|claimed| claimed > self.triangles.len())
            .unwrap_or(false)
    }

    /// Compute bounding box over every vertex
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for triangle in &self.triangles {
            for vertex in &triangle.vertices {
                bbox.expand_to_include(vertex);
            }
        }
        bbox
    }

    /// Bounding box of the soup after applying `rotation`, without
    /// mutating the soup itself.
    pub fn rotated_bounding_box(&self, rotation: &Rotation3<f64>) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for triangle in &self.triangles {
            for vertex in &triangle.vertices {
                bbox.expand_to_include(&(rotation * vertex));
            }
        }
        bbox
    }
}
