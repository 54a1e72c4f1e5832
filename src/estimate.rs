// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Manufacturing estimation - weight, price, print time
//!
//! Two entry points: `estimate` prices measured geometry through the
//! shell/infill model, `estimate_from_file_size` is the purely empirical
//! linear model used when decoding produced nothing usable. Both are pure
//! functions; invalid input yields `None`, never a panic.

use crate::config::{FallbackModel, MaterialProfile, PrintSettings};
use crate::geometry::GeometryMetrics;
use serde::{Deserialize, Serialize};

/// How trustworthy an estimate is, as a single signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateFidelity {
    /// Derived from measured geometry
    Geometry,
    /// Derived from geometry whose volume needed a fallback path
    GeometryDegraded,
    /// Linear model over the raw file size; no dimensional data
    FileSize,
}

/// Quote record handed to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturingEstimate {
    pub weight_g: f64,
    pub price_before_tax: f64,
    pub price_with_tax: f64,
    pub print_time_hours: f64,
    /// Human-readable rendering, e.g. "3h 25m"
    pub print_time_text: String,
    /// [width, depth, height] in mm; absent on the file-size path
    pub dimensions_mm: Option<[f64; 3]>,
    pub fidelity: EstimateFidelity,
}

impl ManufacturingEstimate {
    /// True for results the UI should label as rough file-size guesses
    pub fn is_estimate(&self) -> bool {
        self.fidelity == EstimateFidelity::FileSize
    }
}

/// Price measured geometry.
///
/// Returns `None` for out-of-range profiles or unusable metrics.
pub fn estimate(
    metrics: &GeometryMetrics,
    material: &MaterialProfile,
    print: &PrintSettings,
) -> Option<ManufacturingEstimate> {
    if !material.is_valid() || !print.is_valid() {
        return None;
    }
    if !metrics.volume_cm3.is_finite() || metrics.volume_cm3 <= 0.0 {
        return None;
    }

    // Solid shell plus fractional infill lattice
    let effective_cm3 = metrics.volume_cm3 * print.shell_ratio
        + metrics.volume_cm3 * (1.0 - print.shell_ratio) * print.infill_fraction;
    let weight_g = (effective_cm3 * material.density_g_cm3).max(1.0);

    let complexity_fee = complexity_fee(metrics.triangle_count, material);
    let price_before_tax = (weight_g * material.material_rate_per_g
        + weight_g * material.labor_rate_per_g
        + material.setup_fee
        + complexity_fee)
        .max(material.price_floor);
    let price_before_tax = round_currency(price_before_tax);
    let price_with_tax = round_currency(price_before_tax * (1.0 + material.tax_rate));

    let dimensions = metrics.dimensions_mm();
    let print_time_hours = print_time_hours(&dimensions, print);

    let fidelity = if metrics.degraded() {
        EstimateFidelity::GeometryDegraded
    } else {
        EstimateFidelity::Geometry
    };

    Some(ManufacturingEstimate {
        weight_g,
        price_before_tax,
        price_with_tax,
        print_time_hours,
        print_time_text: format_print_time(print_time_hours),
        dimensions_mm: Some(dimensions),
        fidelity,
    })
}

/// Empirical linear model over the raw file size in megabytes.
///
/// Calibrated against known real quotes; monotonically non-decreasing in
/// `size_mb` for both price and weight.
pub fn estimate_from_file_size(
    size_mb: f64,
    model: &FallbackModel,
) -> Option<ManufacturingEstimate> {
    if !model.is_valid() {
        return None;
    }
    if !size_mb.is_finite() || size_mb <= 0.0 {
        return None;
    }

    let weight_g = (size_mb * model.weight_g_per_mb).max(model.min_weight_g);
    let price_before_tax = round_currency((size_mb * model.price_per_mb).max(model.price_floor));
    let price_with_tax = round_currency(price_before_tax * (1.0 + model.tax_rate));
    let print_time_hours = (weight_g * model.hours_per_g).max(model.min_hours);

    Some(ManufacturingEstimate {
        weight_g,
        price_before_tax,
        price_with_tax,
        print_time_hours,
        print_time_text: format_print_time(print_time_hours),
        dimensions_mm: None,
        fidelity: EstimateFidelity::FileSize,
    })
}

/// Fee stepping up with triangle count beyond the threshold
fn complexity_fee(triangle_count: usize, material: &MaterialProfile) -> f64 {
    let extra = triangle_count.saturating_sub(material.complexity_threshold);
    extra as f64 / material.complexity_step as f64 * material.complexity_fee_per_step
}

/// Layered print-time model over the bounding-box footprint
fn print_time_hours(dimensions: &[f64; 3], print: &PrintSettings) -> f64 {
    let [width, depth, height] = *dimensions;
    let layers = (height / print.layer_height_mm).ceil().max(1.0);

    let perimeter_s = 2.0 * (width + depth) / print.perimeter_speed_mm_s;
    let infill_s = width * depth * print.infill_fraction / print.infill_rate_mm2_s;
    let per_layer_s = perimeter_s + infill_s + print.layer_overhead_s;

    let hours = layers * per_layer_s / 3600.0;
    if !hours.is_finite() {
        return print.min_print_time_h;
    }
    hours.max(print.min_print_time_h)
}

/// Render float hours as "Xh Ym"
pub fn format_print_time(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, VolumeSource};
    use nalgebra::Point3;

    fn metrics(volume_cm3: f64, triangle_count: usize) -> GeometryMetrics {
        GeometryMetrics {
            triangle_count,
            vertex_count: triangle_count * 3,
            bbox: BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(50.0, 40.0, 30.0)),
            volume_cm3,
            surface_area_mm2: Some(1000.0),
            volume_source: VolumeSource::Measured,
        }
    }

    #[test]
    fn test_geometry_estimate_weight_model() {
        let material = MaterialProfile::default();
        let print = PrintSettings::default();
        let result = estimate(&metrics(100.0, 500), &material, &print).unwrap();

        // effective = 100 * (0.25 + 0.75 * 0.2) = 40 cm³, weight = 40 * 1.24
        assert!((result.weight_g - 49.6).abs() < 1e-9);
        assert_eq!(result.fidelity, EstimateFidelity::Geometry);
        assert!(!result.is_estimate());
        assert!(result.dimensions_mm.is_some());
        assert!(result.price_with_tax > result.price_before_tax);
    }

    #[test]
    fn test_tiny_part_floors() {
        let material = MaterialProfile::default();
        let print = PrintSettings::default();
        let result = estimate(&metrics(0.1, 12), &material, &print).unwrap();

        assert!((result.weight_g - 1.0).abs() < 1e-9);
        assert!((result.price_before_tax - material.price_floor).abs() < 1e-9);
        assert!(result.print_time_hours >= print.min_print_time_h);
    }

    #[test]
    fn test_complexity_fee_kicks_in_above_threshold() {
        let material = MaterialProfile::default();
        let print = PrintSettings::default();

        let cheap = estimate(&metrics(100.0, 100_000), &material, &print).unwrap();
        let costly = estimate(&metrics(100.0, 300_000), &material, &print).unwrap();

        // 200k triangles beyond the threshold => two fee steps
        assert!((costly.price_before_tax - cheap.price_before_tax - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_inputs_yield_none() {
        let material = MaterialProfile::default();
        let print = PrintSettings::default();

        assert!(estimate(&metrics(f64::NAN, 12), &material, &print).is_none());
        assert!(estimate(&metrics(-1.0, 12), &material, &print).is_none());

        let mut bad = MaterialProfile::default();
        bad.density_g_cm3 = -1.0;
        assert!(estimate(&metrics(10.0, 12), &bad, &print).is_none());
    }

    #[test]
    fn test_file_size_fallback() {
        let model = FallbackModel::default();
        let result = estimate_from_file_size(2.0, &model).unwrap();

        assert_eq!(result.fidelity, EstimateFidelity::FileSize);
        assert!(result.is_estimate());
        assert_eq!(result.dimensions_mm, None);
        assert!((result.weight_g - 22.0).abs() < 1e-9);
        assert!((result.price_before_tax - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_file_size_fallback_rejects_bad_sizes() {
        let model = FallbackModel::default();
        assert!(estimate_from_file_size(0.0, &model).is_none());
        assert!(estimate_from_file_size(-3.0, &model).is_none());
        assert!(estimate_from_file_size(f64::NAN, &model).is_none());
    }

    #[test]
    fn test_fallback_monotonicity() {
        let model = FallbackModel::default();
        let sizes = [0.01, 0.1, 0.5, 1.0, 2.5, 8.0, 64.0, 512.0];
        let mut previous: Option<ManufacturingEstimate> = None;
        for size in sizes {
            let current = estimate_from_file_size(size, &model).unwrap();
            if let Some(prev) = &previous {
                assert!(current.price_before_tax >= prev.price_before_tax);
                assert!(current.price_with_tax >= prev.price_with_tax);
                assert!(current.weight_g >= prev.weight_g);
            }
            previous = Some(current);
        }
    }

    #[test]
    fn test_format_print_time() {
        assert_eq!(format_print_time(0.0), "0h 0m");
        assert_eq!(format_print_time(0.25), "0h 15m");
        assert_eq!(format_print_time(3.42), "3h 25m");
        assert_eq!(format_print_time(26.0), "26h 0m");
    }
}
