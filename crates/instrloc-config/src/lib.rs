use serde::Deserialize;
use std::collections::BTreeMap;

/// Store-view code used for the secondary locale when nothing is configured.
pub const DEFAULT_STORE_VIEW: &str = "ar_EG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstrlocConfig {
    /// Secondary store-view code for the catalog file.
    pub store_view_code: Option<String>,
    /// Escape commas in option titles as `\,` (default true).
    pub escape_commas: Option<bool>,
    /// Collapse repeated identical pairs within one SKU's option string
    /// (default false).
    pub collapse_repeats: Option<bool>,
    /// Extra or overriding dictionary entries; merged over the embedded set.
    pub dictionary: Option<BTreeMap<String, String>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<InstrlocConfig, ConfigError> {
    // Search order: CWD/instrloc.toml, $HOME/.config/instrloc/instrloc.toml
    let mut merged = InstrlocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("instrloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<InstrlocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("instrloc").join("instrloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<InstrlocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: InstrlocConfig, b: InstrlocConfig) -> InstrlocConfig {
    if a.store_view_code.is_none() {
        a.store_view_code = b.store_view_code;
    }
    if a.escape_commas.is_none() {
        a.escape_commas = b.escape_commas;
    }
    if a.collapse_repeats.is_none() {
        a.collapse_repeats = b.collapse_repeats;
    }
    a.dictionary = match (a.dictionary, b.dictionary) {
        (Some(mut a_dict), Some(b_dict)) => {
            // CWD entries win over entries from the user config dir.
            for (k, v) in b_dict {
                a_dict.entry(k).or_insert(v);
            }
            Some(a_dict)
        }
        (None, d) | (d, None) => d,
    };
    a
}

/// Fixed culinary-preparation terms shipped with the tool. Lookups against
/// this table are exact, case-sensitive string matches only.
pub fn embedded_dictionary() -> BTreeMap<String, String> {
    [
        ("Fresh Cut", "مقطع طازج"),
        ("Medium Slices", "شرائح متوسطة"),
        ("Regular Cut", "تقطيع عادي"),
        ("Fine Grated", "مبشور ناعم"),
        ("Whole Piece", "قطعة واحدة"),
        ("Rough Grated", "مبشور خشن"),
        ("Sandwich Slices", "تقطيع ساندوتشات"),
        ("Thick Slices", "تقطيع سميك"),
        ("Thin Slices", "تقطيع رفيع"),
        ("Medium Cubes", "مكعبات متوسطة"),
        ("Large Cubes", "مكعبات كبيرة"),
        ("Small Cubes", "مكعبات صغيرة"),
        ("Ball", "كُرة"),
        ("Firm", "قوام متماسك"),
        ("Soft", "قوام طري"),
    ]
    .into_iter()
    .map(|(en, ar)| (en.to_string(), ar.to_string()))
    .collect()
}

/// Embedded dictionary with the config-file entries layered on top; a
/// config entry for an existing term overrides the embedded value.
pub fn effective_dictionary(cfg: &InstrlocConfig) -> BTreeMap<String, String> {
    let mut dict = embedded_dictionary();
    if let Some(extra) = &cfg.dictionary {
        for (k, v) in extra {
            dict.insert(k.clone(), v.clone());
        }
    }
    dict
}
