// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! ASCII STL text scanning

use super::coordinates_ok;
use crate::config::DecodeLimits;
use crate::geometry::{SourceFormat, Triangle, TriangleSoup};
use nalgebra::Point3;
use tracing::debug;

/// Scan text for `vertex <x> <y> <z>` statements.
///
/// The scan is case-insensitive, accepts exponent notation, and bounds
/// its own work: at most `max_ascii_scan_bytes` of the buffer are looked
/// at and at most `max_ascii_vertices` vertices accepted. Every three
/// accepted vertices form one triangle; ASCII facet normals are ignored
/// since the format provides no trustworthy ones anyway.
pub(super) fn decode(bytes: &[u8], limits: &DecodeLimits) -> TriangleSoup {
    let window = &bytes[..bytes.len().min(limits.max_ascii_scan_bytes)];
    let text = String::from_utf8_lossy(window);

    let mut soup = TriangleSoup::new(SourceFormat::Ascii);
    let mut pending: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut accepted = 0usize;

    let mut tokens = text.split_whitespace();
    while let Some(token) = tokens.next() {
        if accepted >= limits.max_ascii_vertices {
            debug!(accepted, "ascii vertex cap reached");
            break;
        }
        if !token.eq_ignore_ascii_case("vertex") {
            continue;
        }

        let mut coords = [0f64; 3];
        let mut valid = true;
        for slot in coords.iter_mut() {
            match tokens.next().and_then(|t| t.parse::<f64>().ok()) {
                Some(value) => *slot = value,
                None => {
                    valid = false;
                    break;
                }
            }
        }

        if !valid || !coordinates_ok(coords, limits.coordinate_ceiling) {
            continue;
        }

        pending.push(Point3::new(coords[0], coords[1], coords[2]));
        accepted += 1;

        if pending.len() == 3 {
            soup.push(Triangle::new([pending[0], pending[1], pending[2]]));
            pending.clear();
        }
    }

    if window.len() < bytes.len() {
        debug!(
            scanned = window.len(),
            total = bytes.len(),
            "ascii scan window cap reached"
        );
    }

    soup
}
