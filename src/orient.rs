// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Print-orientation search
//!
//! Ranks a small discrete grid of rotations by a support-proxy score:
//! vertical extent over the square root of the footprint area. Lower is
//! better; a flat, broad base needs less support material. The 8-point
//! grid is a deliberate approximation chosen for speed, not a global
//! optimum - a human fine-tunes from its suggestion.

use crate::config::BuildEnvelope;
use crate::geometry::{BoundingBox, TriangleSoup};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// X-axis then Z-axis candidate angles, degrees. Y rotation is excluded
/// from the search space to keep the candidate count at 8.
const X_STEPS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];
const Z_STEPS: [f64; 2] = [0.0, 90.0];

/// One evaluated rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationCandidate {
    pub x_deg: f64,
    pub y_deg: f64,
    pub z_deg: f64,
    /// Axis-aligned bounding box after rotation
    pub bbox: BoundingBox,
    /// Whether the rotated box fits the build envelope on all axes
    pub fits: bool,
    /// Support-proxy score; lower is better
    pub score: f64,
}

impl RotationCandidate {
    pub fn is_identity(&self) -> bool {
        self.x_deg == 0.0 && self.y_deg == 0.0 && self.z_deg == 0.0
    }

    fn evaluate(soup: &TriangleSoup, x_deg: f64, z_deg: f64, envelope: &BuildEnvelope) -> Self {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let bbox = soup.rotated_bounding_box(&rotation);

        if bbox.is_degenerate() {
            return Self {
                x_deg,
                y_deg: 0.0,
                z_deg,
                bbox,
                fits: false,
                score: f64::INFINITY,
            };
        }

        let size = bbox.size();
        let base_area = size.x * size.y;
        let score = if base_area > 0.0 {
            size.z / base_area.sqrt()
        } else {
            f64::INFINITY
        };

        Self {
            x_deg,
            y_deg: 0.0,
            z_deg,
            bbox,
            fits: envelope.contains(&size),
            score,
        }
    }
}

/// Evaluate the full candidate grid in enumeration order
pub fn enumerate_candidates(
    soup: &TriangleSoup,
    envelope: &BuildEnvelope,
) -> Vec<RotationCandidate> {
    let mut candidates = Vec::with_capacity(X_STEPS.len() * Z_STEPS.len());
    for x_deg in X_STEPS {
        for z_deg in Z_STEPS {
            candidates.push(RotationCandidate::evaluate(soup, x_deg, z_deg, envelope));
        }
    }
    candidates
}

/// Pick the fitting candidate with the lowest support-proxy score.
///
/// Ties break toward the earliest enumerated candidate. When nothing
/// fits the envelope, the identity rotation is returned (with its
/// `fits` flag false) so the caller can still present the unrotated
/// model with a warning.
pub fn find_optimal_rotation(soup: &TriangleSoup, envelope: &BuildEnvelope) -> RotationCandidate {
    let candidates = enumerate_candidates(soup, envelope);

    let mut best: Option<&RotationCandidate> = None;
    for candidate in &candidates {
        if !candidate.fits {
            continue;
        }
        let better = match best {
            Some(current) => candidate.score < current.score,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) => candidate.clone(),
        None => {
            debug!("no rotation candidate fits the build envelope");
            // First enumerated candidate is the identity rotation
            candidates[0].clone()
        }
    }
}
