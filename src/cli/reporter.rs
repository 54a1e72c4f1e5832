// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! CLI output reporter with colored formatting

use crate::orient::RotationCandidate;
use crate::pipeline::MeshAnalysis;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a full analysis with colors
    pub fn report_analysis(file: &str, analysis: &MeshAnalysis, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        match &analysis.metrics {
            Some(metrics) => {
                let format = analysis
                    .format
                    .map(|f| format!("{:?}", f).to_lowercase())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("\n{}", "Geometry:".bold());
                println!("  {} {}", "Format:".bright_black(), format.cyan());
                println!(
                    "  {} {}",
                    "Triangles:".bright_black(),
                    metrics.triangle_count.to_string().cyan()
                );
                let [w, d, h] = metrics.dimensions_mm();
                println!(
                    "  {} {:.1} × {:.1} × {:.1} mm",
                    "Dimensions:".bright_black(),
                    w,
                    d,
                    h
                );
                let volume = format!("{:.2} cm³", metrics.volume_cm3);
                if metrics.degraded() {
                    println!(
                        "  {} {} {}",
                        "Volume:".bright_black(),
                        volume.yellow(),
                        "(approximate)".yellow()
                    );
                } else {
                    println!("  {} {}", "Volume:".bright_black(), volume.green());
                }
                if let Some(area) = metrics.surface_area_mm2 {
                    println!(
                        "  {} {:.1} mm²",
                        "Surface area:".bright_black(),
                        area
                    );
                }
            }
            None => {
                let reason = analysis
                    .decode_failure
                    .as_deref()
                    .unwrap_or("unknown decode failure");
                println!(
                    "\n{} {}",
                    "⚠️".yellow(),
                    format!("Could not decode geometry: {}", reason).yellow()
                );
                println!("{}", "Falling back to file-size estimation".bright_black());
            }
        }

        if let Some(estimate) = &analysis.estimate {
            println!("\n{}", "Estimate:".bold());
            println!(
                "  {} {:.1} g",
                "Weight:".bright_black(),
                estimate.weight_g
            );
            println!(
                "  {} {:.2} / {:.2} {}",
                "Price:".bright_black(),
                estimate.price_before_tax,
                estimate.price_with_tax,
                "(net / gross)".bright_black()
            );
            println!(
                "  {} {}",
                "Print time:".bright_black(),
                estimate.print_time_text.cyan()
            );
            if estimate.is_estimate() {
                println!(
                    "  {}",
                    "Rough estimate from file size only".yellow()
                );
            }
        }

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report an orientation search result
    pub fn report_orientation(file: &str, candidate: &RotationCandidate) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        println!(
            "  {} X {}°, Y {}°, Z {}°",
            "Rotation:".bright_black(),
            candidate.x_deg,
            candidate.y_deg,
            candidate.z_deg
        );
        let size = candidate.bbox.size();
        println!(
            "  {} {:.1} × {:.1} × {:.1} mm",
            "Rotated bbox:".bright_black(),
            size.x,
            size.y,
            size.z
        );
        println!(
            "  {} {:.4}",
            "Support score:".bright_black(),
            candidate.score
        );
        if candidate.fits {
            println!("  {} {}", "✅".green(), "Fits build volume".green());
        } else {
            println!(
                "  {} {}",
                "❌".red(),
                "Does not fit build volume at any searched rotation".red()
            );
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
