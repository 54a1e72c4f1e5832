// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Engine configuration system
//!
//! Every tuned constant of the pipeline lives here rather than at its use
//! site: decode caps, analyzer heuristics, the material pricing profile,
//! the print-time model, the file-size fallback slopes, the build
//! envelope, and batch pacing. Defaults match the values calibrated
//! against observed real quotes; override via `meshquote.toml` or
//! environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Caps and ceilings applied while decoding untrusted buffers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeLimits {
    /// Reject any vertex coordinate with |c| above this
    pub coordinate_ceiling: f64,
    /// Byte slack allowed between buffer length and the header-derived size
    pub binary_size_tolerance: u64,
    /// Buffers at or below this length are never classified as binary
    pub binary_min_len: usize,
    /// Maximum binary triangle records actually decoded
    pub max_binary_triangles: usize,
    /// Maximum vertices accepted from an ASCII scan
    pub max_ascii_vertices: usize,
    /// Maximum bytes of an ASCII buffer that are scanned at all
    pub max_ascii_scan_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            coordinate_ceiling: 100_000.0,
            binary_size_tolerance: 1_000,
            binary_min_len: 100,
            max_binary_triangles: 200_000,
            max_ascii_vertices: 600_000,
            max_ascii_scan_bytes: 5_000_000,
        }
    }
}

/// Heuristics applied when deriving volume from a soup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    /// Per-triangle signed contributions above this (mm³) are decode noise
    pub max_contribution_mm3: f64,
    /// Volumes below this (cm³) trigger the bounding-box heuristic
    pub volume_floor_cm3: f64,
    /// Average solidity assumed when substituting bbox volume
    pub occupancy_fraction: f64,
    pub volume_clamp_min_cm3: f64,
    pub volume_clamp_max_cm3: f64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_contribution_mm3: 1e12,
            volume_floor_cm3: 0.01,
            occupancy_fraction: 0.3,
            volume_clamp_min_cm3: 0.1,
            volume_clamp_max_cm3: 100_000.0,
        }
    }
}

/// Material and pricing profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub name: String,
    /// g/cm³
    pub density_g_cm3: f64,
    /// Currency per gram of material
    pub material_rate_per_g: f64,
    /// Currency per gram of handling/labor
    pub labor_rate_per_g: f64,
    pub setup_fee: f64,
    pub price_floor: f64,
    pub tax_rate: f64,
    /// Triangle count beyond which the complexity fee starts accruing
    pub complexity_threshold: usize,
    /// Triangles per complexity fee step
    pub complexity_step: usize,
    /// Currency added per full step above the threshold
    pub complexity_fee_per_step: f64,
}

impl Default for MaterialProfile {
    fn default() -> Self {
        Self {
            name: "PLA".to_string(),
            density_g_cm3: 1.24,
            material_rate_per_g: 0.45,
            labor_rate_per_g: 0.30,
            setup_fee: 6.0,
            price_floor: 12.0,
            tax_rate: 0.19,
            complexity_threshold: 100_000,
            complexity_step: 100_000,
            complexity_fee_per_step: 5.0,
        }
    }
}

impl MaterialProfile {
    pub fn is_valid(&self) -> bool {
        self.density_g_cm3.is_finite()
            && self.density_g_cm3 > 0.0
            && self.material_rate_per_g.is_finite()
            && self.material_rate_per_g >= 0.0
            && self.labor_rate_per_g.is_finite()
            && self.labor_rate_per_g >= 0.0
            && self.setup_fee.is_finite()
            && self.setup_fee >= 0.0
            && self.price_floor.is_finite()
            && self.price_floor >= 0.0
            && self.tax_rate.is_finite()
            && (0.0..1.0).contains(&self.tax_rate)
            && self.complexity_step > 0
            && self.complexity_fee_per_step.is_finite()
            && self.complexity_fee_per_step >= 0.0
    }
}

/// Physical print model used for weight and time estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Fraction of the volume printed solid as outer walls
    pub shell_ratio: f64,
    /// Lattice density of the interior
    pub infill_fraction: f64,
    pub layer_height_mm: f64,
    /// Perimeter travel speed, mm/s
    pub perimeter_speed_mm_s: f64,
    /// Infill coverage rate, mm²/s
    pub infill_rate_mm2_s: f64,
    /// Fixed overhead per layer (moves, cooling), seconds
    pub layer_overhead_s: f64,
    pub min_print_time_h: f64,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            shell_ratio: 0.25,
            infill_fraction: 0.20,
            layer_height_mm: 0.2,
            perimeter_speed_mm_s: 35.0,
            infill_rate_mm2_s: 60.0,
            layer_overhead_s: 1.5,
            min_print_time_h: 0.25,
        }
    }
}

impl PrintSettings {
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.shell_ratio)
            && (0.0..=1.0).contains(&self.infill_fraction)
            && self.layer_height_mm.is_finite()
            && self.layer_height_mm > 0.0
            && self.perimeter_speed_mm_s > 0.0
            && self.infill_rate_mm2_s > 0.0
            && self.layer_overhead_s.is_finite()
            && self.layer_overhead_s >= 0.0
            && self.min_print_time_h.is_finite()
            && self.min_print_time_h >= 0.0
    }
}

/// Purely empirical linear model used when geometry is unusable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackModel {
    pub price_per_mb: f64,
    pub weight_g_per_mb: f64,
    pub hours_per_g: f64,
    pub min_weight_g: f64,
    pub min_hours: f64,
    pub price_floor: f64,
    pub tax_rate: f64,
}

impl Default for FallbackModel {
    fn default() -> Self {
        Self {
            price_per_mb: 9.5,
            weight_g_per_mb: 11.0,
            hours_per_g: 0.045,
            min_weight_g: 1.0,
            min_hours: 0.25,
            price_floor: 12.0,
            tax_rate: 0.19,
        }
    }
}

impl FallbackModel {
    pub fn is_valid(&self) -> bool {
        self.price_per_mb.is_finite()
            && self.price_per_mb >= 0.0
            && self.weight_g_per_mb.is_finite()
            && self.weight_g_per_mb >= 0.0
            && self.hours_per_g.is_finite()
            && self.hours_per_g >= 0.0
            && self.tax_rate.is_finite()
            && (0.0..1.0).contains(&self.tax_rate)
    }
}

/// Maximum printable dimensions of the target printer, in mm
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildEnvelope {
    pub max_x_mm: f64,
    pub max_y_mm: f64,
    pub max_z_mm: f64,
}

impl Default for BuildEnvelope {
    fn default() -> Self {
        Self {
            max_x_mm: 220.0,
            max_y_mm: 220.0,
            max_z_mm: 250.0,
        }
    }
}

impl BuildEnvelope {
    pub fn new(max_x_mm: f64, max_y_mm: f64, max_z_mm: f64) -> Self {
        Self {
            max_x_mm,
            max_y_mm,
            max_z_mm,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_x_mm > 0.0 && self.max_y_mm > 0.0 && self.max_z_mm > 0.0
    }

    /// Whether an axis-aligned extent fits on all three axes
    pub fn contains(&self, size: &nalgebra::Vector3<f64>) -> bool {
        size.x <= self.max_x_mm && size.y <= self.max_y_mm && size.z <= self.max_z_mm
    }
}

/// Pacing applied when processing a library of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Delay between consecutive files, milliseconds
    pub pacing_ms: u64,
    /// Maximum files processed per invocation
    pub max_per_run: usize,
    /// Poll interval while waiting on the fetch gate, milliseconds
    pub gate_poll_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            pacing_ms: 400,
            max_per_run: 3,
            gate_poll_ms: 50,
        }
    }
}

/// Aggregate engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub decode: DecodeLimits,
    pub analyzer: AnalyzerSettings,
    pub material: MaterialProfile,
    pub print: PrintSettings,
    pub fallback: FallbackModel,
    pub envelope: BuildEnvelope,
    pub batch: BatchSettings,
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var("MESHQUOTE_CONFIG").unwrap_or_else(|_| "meshquote.toml".into());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(tax) = std::env::var("MESHQUOTE_TAX_RATE") {
            if let Ok(tax) = tax.parse::<f64>() {
                config.material.tax_rate = tax;
                config.fallback.tax_rate = tax;
            }
        }

        if let Ok(limit) = std::env::var("MESHQUOTE_BATCH_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                config.batch.max_per_run = limit;
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.material.is_valid());
        assert!(config.print.is_valid());
        assert!(config.fallback.is_valid());
        assert!(config.envelope.is_valid());
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        let mut material = MaterialProfile::default();
        material.density_g_cm3 = 0.0;
        assert!(!material.is_valid());

        let mut material = MaterialProfile::default();
        material.tax_rate = 1.5;
        assert!(!material.is_valid());

        let mut print = PrintSettings::default();
        print.layer_height_mm = -0.2;
        assert!(!print.is_valid());
    }

    #[test]
    fn test_envelope_contains() {
        let envelope = BuildEnvelope::new(200.0, 200.0, 200.0);
        assert!(envelope.contains(&nalgebra::Vector3::new(200.0, 100.0, 50.0)));
        assert!(!envelope.contains(&nalgebra::Vector3::new(200.1, 100.0, 50.0)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.material.name, config.material.name);
        assert!((parsed.material.density_g_cm3 - config.material.density_g_cm3).abs() < 1e-12);
        assert_eq!(parsed.batch.max_per_run, config.batch.max_per_run);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            [material]
            name = "PETG"
            density_g_cm3 = 1.27
            material_rate_per_g = 0.5
            labor_rate_per_g = 0.3
            setup_fee = 6.0
            price_floor = 12.0
            tax_rate = 0.19
            complexity_threshold = 100000
            complexity_step = 100000
            complexity_fee_per_step = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.material.name, "PETG");
        // Unspecified sections fall back to defaults
        assert_eq!(parsed.decode.max_binary_triangles, 200_000);
        assert!((parsed.print.shell_ratio - 0.25).abs() < 1e-12);
    }
}
