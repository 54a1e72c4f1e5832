// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Binary STL record decoding

use super::{claimed_triangles, coordinates_ok, BINARY_HEADER_LEN, BINARY_RECORD_LEN};
use crate::config::DecodeLimits;
use crate::geometry::{SourceFormat, Triangle, TriangleSoup};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Walk 50-byte triangle records after the 84-byte header.
///
/// Decodes at most `max_binary_triangles` records even when the header
/// claims more; the claimed count is preserved on the soup so the
/// analyzer can extrapolate. Triangles with any invalid vertex are
/// dropped, never substituted.
pub(super) fn decode(bytes: &[u8], limits: &DecodeLimits) -> TriangleSoup {
    let claimed = claimed_triangles(bytes) as usize;
    let available = bytes.len().saturating_sub(BINARY_HEADER_LEN) / BINARY_RECORD_LEN;
    let take = claimed.min(available).min(limits.max_binary_triangles);

    let mut soup = TriangleSoup::with_capacity(SourceFormat::Binary, take);
    soup.claimed_triangles = Some(claimed);

    let mut dropped = 0usize;
    for index in 0..take {
        let start = BINARY_HEADER_LEN + index * BINARY_RECORD_LEN;
        let record = &bytes[start..start + BINARY_RECORD_LEN];

        match read_triangle(record, limits.coordinate_ceiling) {
            Some(triangle) => soup.push(triangle),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped binary triangles with invalid vertices");
    }
    if take < claimed {
        debug!(claimed, take, "binary decode truncated");
    }

    soup
}

/// One 50-byte record: normal, three vertices, attribute padding ignored
fn read_triangle(record: &[u8], ceiling: f64) -> Option<Triangle> {
    let mut vertices = [Point3::origin(); 3];
    for (slot, vertex) in vertices.iter_mut().enumerate() {
        let coords = read_vector(record, 12 + slot * 12);
        if !coordinates_ok(coords, ceiling) {
            return None;
        }
        *vertex = Point3::new(coords[0], coords[1], coords[2]);
    }

    // The stated facet normal is carried along but only when sane;
    // downstream math never depends on it
    let normal = read_vector(record, 0);
    let triangle = if coordinates_ok(normal, ceiling) {
        Triangle::with_normal(vertices, Vector3::new(normal[0], normal[1], normal[2]))
    } else {
        Triangle::new(vertices)
    };

    Some(triangle)
}

fn read_vector(record: &[u8], at: usize) -> [f64; 3] {
    [
        read_f32(record, at),
        read_f32(record, at + 4),
        read_f32(record, at + 8),
    ]
}

fn read_f32(record: &[u8], at: usize) -> f64 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&record[at..at + 4]);
    f32::from_le_bytes(raw) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_f32(buffer: &mut Vec<u8>, value: f32) {
        buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Build a binary STL buffer from triangles given as nine coordinates
    fn binary_stl(claimed: u32, triangles: &[[f32; 9]]) -> Vec<u8> {
        let mut buffer = vec![0u8; 80];
        buffer.extend_from_slice(&claimed.to_le_bytes());
        for coords in triangles {
            for _ in 0..3 {
                put_f32(&mut buffer, 0.0); // normal
            }
            for value in coords {
                put_f32(&mut buffer, *value);
            }
            buffer.extend_from_slice(&[0u8; 2]); // attribute bytes
        }
        buffer
    }

    #[test]
    fn test_decodes_valid_records() {
        let bytes = binary_stl(
            2,
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            ],
        );
        let soup = decode(&bytes, &DecodeLimits::default());

        assert_eq!(soup.triangle_count(), 2);
        assert_eq!(soup.claimed_triangles, Some(2));
        assert_eq!(soup.format, SourceFormat::Binary);
    }

    #[test]
    fn test_invalid_vertex_drops_whole_triangle() {
        let bytes = binary_stl(
            2,
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [f32::NAN, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            ],
        );
        let soup = decode(&bytes, &DecodeLimits::default());
        assert_eq!(soup.triangle_count(), 1);
    }

    #[test]
    fn test_oversized_coordinate_rejected() {
        let bytes = binary_stl(1, &[[0.0, 0.0, 0.0, 200_000.0, 0.0, 0.0, 0.0, 1.0, 0.0]]);
        let soup = decode(&bytes, &DecodeLimits::default());
        assert_eq!(soup.triangle_count(), 0);
    }

    #[test]
    fn test_truncated_body_keeps_claimed_count() {
        // Header claims 5 but only 2 records follow
        let mut bytes = binary_stl(
            5,
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            ],
        );
        // Trailing garbage shorter than a record must not be read as one
        bytes.extend_from_slice(&[0xAB; 10]);

        let soup = decode(&bytes, &DecodeLimits::default());
        assert_eq!(soup.triangle_count(), 2);
        assert_eq!(soup.claimed_triangles, Some(5));
        assert!(soup.is_truncated_sample());
    }

    #[test]
    fn test_decode_cap_applies() {
        let limits = DecodeLimits {
            max_binary_triangles: 1,
            ..DecodeLimits::default()
        };
        let bytes = binary_stl(
            2,
            &[
                [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            ],
        );
        let soup = decode(&bytes, &limits);
        assert_eq!(soup.triangle_count(), 1);
        assert_eq!(soup.claimed_triangles, Some(2));
    }
}
