use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Canonical name of the required source-text column.
pub const SOURCE_COLUMN: &str = "English Instructions";
/// Canonical name of the optional target-text column.
pub const TARGET_COLUMN: &str = "Arabic Instructions";

/// Constant attribute set written into every catalog record.
pub const ATTRIBUTE_SET_CODE: &str = "Default";
/// Constant product type written into every catalog record.
pub const PRODUCT_TYPE: &str = "simple";

/// One input row after cell normalization. Cells are coerced to trimmed
/// text at the ingestion boundary; rows have no identity beyond their
/// position in the sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub source: String,
    /// Pre-existing target text; empty when the column is blank or absent.
    pub target: String,
    /// Values of any additional original columns, in header order.
    pub extras: Vec<String>,
}

/// An ordered sheet of rows, immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Headers of the preserved extra columns, in original order.
    pub extra_headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// A classified row: identifier rows echo their digits into `target` and
/// carry no SKU association of their own; instruction rows carry the SKU
/// current at their position (`None` before the first identifier row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRow {
    pub source: String,
    pub target: String,
    pub sku: Option<String>,
}

/// A confirmed canonical (source, target) pair. Set semantics downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniquePair {
    pub source: String,
    pub target: String,
}

/// One source text with more than one distinct resolved target, targets in
/// first-appearance order. Transient report data, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inconsistency {
    pub source: String,
    pub targets: Vec<String>,
}

/// One catalog-import row: a SKU scoped to a single store view with its
/// pipe-joined custom-option string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub sku: String,
    /// Empty string for the default store view; the configured locale code
    /// (e.g. "ar_EG") for the secondary one.
    pub store_view_code: String,
    pub attribute_set_code: String,
    pub product_type: String,
    pub custom_options: String,
}

#[derive(Debug, Error)]
pub enum InstrlocError {
    #[error("missing required column: {0}")]
    MissingColumn(String),
    /// Catch-all kept for callers that need a typed error without a
    /// dedicated variant.
    #[error("{0}")]
    Other(String),
}
