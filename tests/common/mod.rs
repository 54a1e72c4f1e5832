// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Shared synthetic mesh fixtures
//!
//! Not every test binary uses every fixture.
#![allow(dead_code)]

/// Twelve consistently wound triangles of an axis-aligned box with one
/// corner at the origin, as flat nine-coordinate records
pub fn cube_triangles(w: f32, d: f32, h: f32) -> Vec<[f32; 9]> {
    let quads = [
        // bottom (z = 0), top (z = h)
        [
            [0.0, 0.0, 0.0],
            [0.0, d, 0.0],
            [w, d, 0.0],
            [w, 0.0, 0.0],
        ],
        [[0.0, 0.0, h], [w, 0.0, h], [w, d, h], [0.0, d, h]],
        // front (y = 0), back (y = d)
        [
            [0.0, 0.0, 0.0],
            [w, 0.0, 0.0],
            [w, 0.0, h],
            [0.0, 0.0, h],
        ],
        [[0.0, d, 0.0], [0.0, d, h], [w, d, h], [w, d, 0.0]],
        // left (x = 0), right (x = w)
        [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, h],
            [0.0, d, h],
            [0.0, d, 0.0],
        ],
        [[w, 0.0, 0.0], [w, d, 0.0], [w, d, h], [w, 0.0, h]],
    ];

    let mut triangles = Vec::with_capacity(12);
    for [a, b, c, d] in quads {
        triangles.push([a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]]);
        triangles.push([a[0], a[1], a[2], c[0], c[1], c[2], d[0], d[1], d[2]]);
    }
    triangles
}

/// Binary STL buffer claiming `claimed` triangles in the header
pub fn binary_stl_with_claim(claimed: u32, triangles: &[[f32; 9]]) -> Vec<u8> {
    let mut buffer = vec![0u8; 80];
    buffer.extend_from_slice(&claimed.to_le_bytes());
    for coords in triangles {
        for _ in 0..3 {
            buffer.extend_from_slice(&0f32.to_le_bytes()); // facet normal
        }
        for value in coords {
            buffer.extend_from_slice(&value.to_le_bytes());
        }
        buffer.extend_from_slice(&[0u8; 2]); // attribute byte count
    }
    buffer
}

/// Well-formed binary STL buffer
pub fn binary_stl(triangles: &[[f32; 9]]) -> Vec<u8> {
    binary_stl_with_claim(triangles.len() as u32, triangles)
}

/// ASCII STL export of the same triangles
pub fn ascii_stl(triangles: &[[f32; 9]]) -> String {
    let mut text = String::from("solid fixture\n");
    for coords in triangles {
        text.push_str("  facet normal 0 0 0\n    outer loop\n");
        for vertex in coords.chunks(3) {
            text.push_str(&format!(
                "      vertex {} {} {}\n",
                vertex[0], vertex[1], vertex[2]
            ));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid fixture\n");
    text
}
