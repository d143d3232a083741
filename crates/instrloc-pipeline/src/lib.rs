use instrloc_core::{
    ExportRecord, Inconsistency, ResolvedRow, Row, UniquePair, ATTRIBUTE_SET_CODE, PRODUCT_TYPE,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A SKU token is a non-empty run of decimal digits.
fn is_sku_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// An identifier row echoes its digits: source and target are equal and
/// purely numeric. Only resolved rows satisfy this shape.
fn is_identifier_row(r: &ResolvedRow) -> bool {
    r.source == r.target && is_sku_token(&r.source)
}

/// Identifier and blank rows never take part in consistency checking,
/// deduplication, or grouping.
fn is_instruction(r: &ResolvedRow) -> bool {
    !is_identifier_row(r) && !r.source.is_empty() && !r.target.is_empty()
}

struct ResolveAcc {
    resolved: Vec<ResolvedRow>,
    unmatched: BTreeSet<String>,
    current_sku: Option<String>,
}

/// Classify every row and resolve its target text. Resolution order per
/// row: exact case-sensitive dictionary hit (wins even over a pre-existing
/// target), then all-digit identifier token (echoed, updates the running
/// SKU), then pass-through of a non-blank existing target, else empty
/// target and the source joins the advisory unmatched set.
///
/// Every input row appears in the output, in order. Classification of a
/// single row depends only on its own fields and the dictionary; only the
/// SKU association is positional.
pub fn resolve(
    rows: &[Row],
    dictionary: &BTreeMap<String, String>,
) -> (Vec<ResolvedRow>, BTreeSet<String>) {
    let acc = rows.iter().fold(
        ResolveAcc {
            resolved: Vec::with_capacity(rows.len()),
            unmatched: BTreeSet::new(),
            current_sku: None,
        },
        |mut acc, row| {
            let source = row.source.trim();
            let existing = row.target.trim();

            if let Some(translated) = dictionary.get(source) {
                acc.resolved.push(ResolvedRow {
                    source: source.to_string(),
                    target: translated.clone(),
                    sku: acc.current_sku.clone(),
                });
            } else if is_sku_token(source) {
                // Identifier rows define the SKU for what follows but carry
                // no association themselves.
                acc.current_sku = Some(source.to_string());
                acc.resolved.push(ResolvedRow {
                    source: source.to_string(),
                    target: source.to_string(),
                    sku: None,
                });
            } else if !existing.is_empty() {
                acc.resolved.push(ResolvedRow {
                    source: source.to_string(),
                    target: existing.to_string(),
                    sku: acc.current_sku.clone(),
                });
            } else {
                if !source.is_empty() {
                    acc.unmatched.insert(source.to_string());
                }
                acc.resolved.push(ResolvedRow {
                    source: source.to_string(),
                    target: String::new(),
                    sku: acc.current_sku.clone(),
                });
            }
            acc
        },
    );
    (acc.resolved, acc.unmatched)
}

/// Report every source text that resolved to more than one distinct target.
/// Group order and target order both follow first appearance. Advisory
/// only; never blocks the pipeline.
pub fn find_inconsistencies(resolved: &[ResolvedRow]) -> Vec<Inconsistency> {
    let mut order: Vec<&str> = Vec::new();
    let mut targets: HashMap<&str, Vec<&str>> = HashMap::new();

    for r in resolved.iter().filter(|r| is_instruction(r)) {
        let entry = targets.entry(r.source.as_str()).or_insert_with(|| {
            order.push(r.source.as_str());
            Vec::new()
        });
        if !entry.contains(&r.target.as_str()) {
            entry.push(r.target.as_str());
        }
    }

    order
        .into_iter()
        .filter(|source| targets[source].len() > 1)
        .map(|source| Inconsistency {
            source: source.to_string(),
            targets: targets[source].iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// Reduce instruction rows to distinct (source, target) pairs in
/// first-occurrence order. Downstream the result is purely a membership
/// set; the order only matters for presentation.
pub fn unique_pairs(resolved: &[ResolvedRow]) -> Vec<UniquePair> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut out = Vec::new();
    for r in resolved.iter().filter(|r| is_instruction(r)) {
        if seen.insert((r.source.as_str(), r.target.as_str())) {
            out.push(UniquePair {
                source: r.source.clone(),
                target: r.target.clone(),
            });
        }
    }
    out
}

/// Count exportable instruction rows that precede any identifier row.
/// Such rows are silently dropped from the catalog; callers may want to
/// surface the loss.
pub fn orphan_count(resolved: &[ResolvedRow]) -> usize {
    resolved
        .iter()
        .filter(|r| is_instruction(r) && r.sku.is_none())
        .count()
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Store-view code for the secondary-locale records.
    pub store_view_code: String,
    /// Escape commas in option titles as `\,`.
    pub escape_commas: bool,
    /// Collapse repeated identical pairs within one SKU's option string.
    pub collapse_repeats: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            store_view_code: "ar_EG".to_string(),
            escape_commas: true,
            collapse_repeats: false,
        }
    }
}

fn option_entry(title: &str, escape_commas: bool) -> String {
    let title = if escape_commas {
        title.replace(',', "\\,")
    } else {
        title.to_string()
    };
    format!(
        "name=Custom Option,type=radio,required=0,price=0,price_type=fixed,sku=,option_title={title}"
    )
}

/// Group confirmed instructions under their owning SKU and synthesize the
/// catalog records: per SKU, in first-seen order, one default-locale record
/// joining the source titles and one secondary-locale record joining the
/// target titles, instructions pipe-joined in encounter order.
///
/// Walks the resolved sequence in original order with a local current-SKU
/// accumulator. Rows before the first identifier, rows with empty fields,
/// and pairs outside the confirmed set contribute nothing; an orphan
/// instruction is silently lost rather than attributed to any SKU.
pub fn build_export(
    resolved: &[ResolvedRow],
    confirmed: &[UniquePair],
    options: &ExportOptions,
) -> Vec<ExportRecord> {
    let confirmed: HashSet<(&str, &str)> = confirmed
        .iter()
        .map(|p| (p.source.as_str(), p.target.as_str()))
        .collect();

    let mut sku_order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    let mut current_sku: Option<&str> = None;

    for r in resolved {
        if is_identifier_row(r) {
            current_sku = Some(r.source.as_str());
            continue;
        }
        let Some(sku) = current_sku else { continue };
        if r.source.is_empty() || r.target.is_empty() {
            continue;
        }
        if !confirmed.contains(&(r.source.as_str(), r.target.as_str())) {
            continue;
        }
        let group = grouped.entry(sku).or_insert_with(|| {
            sku_order.push(sku);
            Vec::new()
        });
        let pair = (r.source.as_str(), r.target.as_str());
        if options.collapse_repeats && group.contains(&pair) {
            continue;
        }
        group.push(pair);
    }

    let mut records = Vec::with_capacity(sku_order.len() * 2);
    for sku in sku_order {
        let group = &grouped[sku];
        let mut source_entries = Vec::with_capacity(group.len());
        let mut target_entries = Vec::with_capacity(group.len());
        for (en, ar) in group {
            source_entries.push(option_entry(en, options.escape_commas));
            target_entries.push(option_entry(ar, options.escape_commas));
        }
        records.push(ExportRecord {
            sku: sku.to_string(),
            store_view_code: String::new(),
            attribute_set_code: ATTRIBUTE_SET_CODE.to_string(),
            product_type: PRODUCT_TYPE.to_string(),
            custom_options: source_entries.join("|"),
        });
        records.push(ExportRecord {
            sku: sku.to_string(),
            store_view_code: options.store_view_code.clone(),
            attribute_set_code: ATTRIBUTE_SET_CODE.to_string(),
            product_type: PRODUCT_TYPE.to_string(),
            custom_options: target_entries.join("|"),
        });
    }
    records
}
