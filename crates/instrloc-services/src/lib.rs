//! High-level orchestration layer over the lower-level crates.
//! Intentionally thin: exposes the two-phase review/confirm protocol used
//! by CLI and tests without importing pipeline crates directly.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use instrloc_config::InstrlocConfig;
use instrloc_pipeline::ExportOptions;

pub use instrloc_core::{
    ExportRecord, Inconsistency, ResolvedRow, Result, Row, Sheet, UniquePair,
};

/// Fully resolved runtime settings. Config file values and caller overrides
/// are folded in before any pipeline stage runs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dictionary: BTreeMap<String, String>,
    pub store_view_code: String,
    pub escape_commas: bool,
    pub collapse_repeats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&InstrlocConfig::default())
    }
}

impl Settings {
    pub fn from_config(cfg: &InstrlocConfig) -> Self {
        Self {
            dictionary: instrloc_config::effective_dictionary(cfg),
            store_view_code: cfg
                .store_view_code
                .clone()
                .unwrap_or_else(|| instrloc_config::DEFAULT_STORE_VIEW.to_string()),
            escape_commas: cfg.escape_commas.unwrap_or(true),
            collapse_repeats: cfg.collapse_repeats.unwrap_or(false),
        }
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            store_view_code: self.store_view_code.clone(),
            escape_commas: self.escape_commas,
            collapse_repeats: self.collapse_repeats,
        }
    }
}

/// Review-stage outputs: everything the caller needs to decide whether to
/// confirm. Advisory throughout; nothing here blocks the export.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub resolved: Vec<ResolvedRow>,
    pub unmatched: BTreeSet<String>,
    pub inconsistencies: Vec<Inconsistency>,
    pub unique_pairs: Vec<UniquePair>,
    /// Exportable instruction rows with no preceding identifier row; these
    /// will be dropped from the catalog.
    pub orphaned: usize,
}

/// Confirm-stage outputs, written only after every stage succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub resolved: Vec<ResolvedRow>,
    pub records: Vec<ExportRecord>,
    /// Instruction rows lost to the missing-identifier drop; see
    /// [`ReviewReport::orphaned`].
    pub orphaned: usize,
}

/// First phase: classify and resolve every row, collect the advisory
/// reports. The caller decides when (and whether) to call [`confirm`].
pub fn review(sheet: &Sheet, settings: &Settings) -> ReviewReport {
    let (resolved, unmatched) = instrloc_pipeline::resolve(&sheet.rows, &settings.dictionary);
    let inconsistencies = instrloc_pipeline::find_inconsistencies(&resolved);
    let unique_pairs = instrloc_pipeline::unique_pairs(&resolved);
    let orphaned = instrloc_pipeline::orphan_count(&resolved);
    ReviewReport {
        resolved,
        unmatched,
        inconsistencies,
        unique_pairs,
        orphaned,
    }
}

/// Second phase: full fresh recomputation from the raw rows, then grouping
/// into catalog records. No state carries over from any earlier review; an
/// empty record set is a valid no-op result for the caller to report.
pub fn confirm(sheet: &Sheet, settings: &Settings) -> ExportBundle {
    let (resolved, _) = instrloc_pipeline::resolve(&sheet.rows, &settings.dictionary);
    let pairs = instrloc_pipeline::unique_pairs(&resolved);
    let records = instrloc_pipeline::build_export(&resolved, &pairs, &settings.export_options());
    let orphaned = instrloc_pipeline::orphan_count(&resolved);
    ExportBundle {
        resolved,
        records,
        orphaned,
    }
}

/// Load a sheet and review it. The fatal missing-column error surfaces here
/// before any processing.
pub fn review_file(path: &Path, settings: &Settings) -> Result<ReviewReport> {
    let sheet = instrloc_ingest::read_sheet_from_path(path)?;
    Ok(review(&sheet, settings))
}

/// Load a sheet and run the confirm phase on it.
pub fn confirm_file(path: &Path, settings: &Settings) -> Result<ExportBundle> {
    let sheet = instrloc_ingest::read_sheet_from_path(path)?;
    Ok(confirm(&sheet, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[(&str, &str)]) -> Sheet {
        Sheet {
            extra_headers: Vec::new(),
            rows: rows
                .iter()
                .map(|(s, t)| Row {
                    source: s.to_string(),
                    target: t.to_string(),
                    extras: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn review_collects_all_advisories() {
        let sheet = sheet(&[
            ("Orphaned", "يتيم"),
            ("1001", ""),
            ("Ball", ""),
            ("Ball", "كورة"),
            ("Mystery", ""),
        ]);
        let report = review(&sheet, &Settings::default());
        assert_eq!(report.resolved.len(), 5);
        assert!(report.unmatched.contains("Mystery"));
        // dictionary wins on both Ball rows, so they agree
        assert!(report.inconsistencies.is_empty());
        assert_eq!(report.orphaned, 1);
        assert!(report.unique_pairs.iter().any(|p| p.source == "Orphaned"));
    }

    #[test]
    fn confirm_recomputes_from_scratch() {
        let sheet = sheet(&[("1001", ""), ("Ball", ""), ("1002", ""), ("Soft", "")]);
        let settings = Settings::default();
        let first = confirm(&sheet, &settings);
        let second = confirm(&sheet, &settings);
        assert_eq!(first.records, second.records);
        assert_eq!(first.records.len(), 4);
    }

    #[test]
    fn empty_export_set_is_a_no_op_not_an_error() {
        let sheet = sheet(&[("Mystery", "")]);
        let bundle = confirm(&sheet, &Settings::default());
        assert!(bundle.records.is_empty());
        assert_eq!(bundle.resolved.len(), 1);
    }

    #[test]
    fn settings_pick_up_config_values() {
        let cfg = InstrlocConfig {
            store_view_code: Some("ar_SA".into()),
            escape_commas: Some(false),
            collapse_repeats: Some(true),
            dictionary: None,
        };
        let settings = Settings::from_config(&cfg);
        assert_eq!(settings.store_view_code, "ar_SA");
        assert!(!settings.escape_commas);
        assert!(settings.collapse_repeats);
        assert!(settings.dictionary.contains_key("Fresh Cut"));
    }
}
