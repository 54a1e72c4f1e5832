// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Geometry module - triangle soup representation and analysis

mod analyze;
mod bbox;
mod soup;

pub use analyze::{analyze, GeometryMetrics, VolumeSource};
pub use bbox::BoundingBox;
pub use soup::{SourceFormat, Triangle, TriangleSoup};
