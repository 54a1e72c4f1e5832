// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! CLI support - discovery, batch reporting, terminal output

mod reporter;

pub use reporter::Reporter;

use crate::pipeline::MeshAnalysis;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find `.stl` files under a directory, sorted for stable batch order
pub fn discover_stl_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("stl"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// One processed file in a batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub file: String,
    pub size_mb: f64,
    pub triangle_count: Option<usize>,
    pub weight_g: Option<f64>,
    pub price_with_tax: Option<f64>,
    pub print_time_text: Option<String>,
    pub degraded: bool,
    pub decode_failure: Option<String>,
}

impl BatchEntry {
    pub fn from_analysis(file: &Path, size_mb: f64, analysis: &MeshAnalysis) -> Self {
        Self {
            file: file.display().to_string(),
            size_mb,
            triangle_count: analysis.metrics.as_ref().map(|m| m.triangle_count),
            weight_g: analysis.estimate.as_ref().map(|e| e.weight_g),
            price_with_tax: analysis.estimate.as_ref().map(|e| e.price_with_tax),
            print_time_text: analysis
                .estimate
                .as_ref()
                .map(|e| e.print_time_text.clone()),
            degraded: analysis.degraded(),
            decode_failure: analysis.decode_failure.clone(),
        }
    }
}

/// Batch run summary written as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub discovered: usize,
    pub processed: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn new(discovered: usize) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            discovered,
            processed: 0,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: BatchEntry) {
        self.entries.push(entry);
        self.processed = self.entries.len();
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {:?}", path))?;
        Ok(())
    }
}
