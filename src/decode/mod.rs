// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Decoding untrusted STL byte buffers into triangle soup
//!
//! The decoder never panics on arbitrary input: every read is bounds
//! checked, record counts are capped, and malformed content degrades to a
//! `DecodeError` the caller routes to file-size estimation.

mod ascii;
mod binary;

use crate::config::DecodeLimits;
use crate::geometry::{SourceFormat, TriangleSoup};
use thiserror::Error;
use tracing::debug;

/// 80-byte comment header plus the 4-byte triangle count
pub const BINARY_HEADER_LEN: usize = 84;
/// 12-byte normal, three 12-byte vertices, 2 bytes of padding
pub const BINARY_RECORD_LEN: usize = 50;

/// Recoverable decode failure; callers fall back to file-size estimation
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("buffer yielded {vertices} valid vertices, need at least 3")]
    InsufficientGeometry { vertices: usize },

    #[error("decoded vertices collapse to a degenerate bounding box")]
    DegenerateBounds,
}

/// Classify a buffer as binary or ASCII STL.
///
/// Binary iff the buffer length is within tolerance of the size implied
/// by the header's triangle count. Everything else is treated as text.
pub fn detect_format(bytes: &[u8], limits: &DecodeLimits) -> SourceFormat {
    if bytes.len() >= BINARY_HEADER_LEN && bytes.len() > limits.binary_min_len {
        let claimed = claimed_triangles(bytes) as u64;
        let expected = BINARY_HEADER_LEN as u64 + claimed * BINARY_RECORD_LEN as u64;
        if (bytes.len() as u64).abs_diff(expected) <= limits.binary_size_tolerance {
            return SourceFormat::Binary;
        }
    }
    SourceFormat::Ascii
}

/// Decode a byte buffer into a triangle soup.
pub fn decode(bytes: &[u8], limits: &DecodeLimits) -> Result<TriangleSoup, DecodeError> {
    let format = detect_format(bytes, limits);
    debug!(len = bytes.len(), ?format, "decoding mesh buffer");

    let soup = match format {
        SourceFormat::Binary => binary::decode(bytes, limits),
        SourceFormat::Ascii => ascii::decode(bytes, limits),
    };

    let vertices = soup.vertex_count();
    if vertices < 3 {
        return Err(DecodeError::InsufficientGeometry { vertices });
    }
    if soup.bounding_box().is_degenerate() {
        return Err(DecodeError::DegenerateBounds);
    }

    debug!(
        triangles = soup.triangle_count(),
        claimed = ?soup.claimed_triangles,
        "decode complete"
    );
    Ok(soup)
}

/// Little-endian u32 triangle count at byte offset 80.
///
/// Callers must ensure the buffer holds at least `BINARY_HEADER_LEN` bytes.
fn claimed_triangles(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[80..BINARY_HEADER_LEN]);
    u32::from_le_bytes(raw)
}

/// Whether all three coordinates are finite and within the ceiling
fn coordinates_ok(coords: [f64; 3], ceiling: f64) -> bool {
    coords
        .iter()
        .all(|c| c.is_finite() && c.abs() <= ceiling)
}
