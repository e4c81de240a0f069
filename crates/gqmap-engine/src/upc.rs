//! UPC canonicalisation.
//!
//! Catalog exports and store lists disagree on how a UPC is written: some
//! carry strings, some numbers (losing leading zeros), some pad to 12
//! digits. Every key goes through [`Upc::parse`] so lookups compare like
//! with like. Purely numeric values are left-padded with zeros to
//! [`CANONICAL_UPC_DIGITS`]; anything else is kept verbatim after trimming.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width numeric UPCs are zero-padded to (UPC-A).
pub const CANONICAL_UPC_DIGITS: usize = 12;

/// A canonical UPC lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Upc(String);

impl Upc {
    /// Canonicalise a textual UPC. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Some(Self(format!(
                "{trimmed:0>width$}",
                width = CANONICAL_UPC_DIGITS
            )));
        }
        Some(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Upc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Upc {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalise a UPC of unknown JSON shape.
///
/// Strings and numbers are accepted. Integral floats (`12345.0`, common in
/// spreadsheet exports) are written without the fraction. `null`, booleans,
/// arrays and objects yield `None`.
#[must_use]
pub fn normalize_upc(raw: &Value) -> Option<Upc> {
    match raw {
        Value::String(s) => Upc::parse(s),
        Value::Number(n) => Upc::parse(&number_to_text(n)),
        _ => None,
    }
}

fn number_to_text(n: &serde_json::Number) -> String {
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        // 2^53: beyond this an f64 no longer holds every integer exactly.
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

/// Normalise a store's "available products" field into canonical UPCs.
///
/// Accepts `null`/absent, arrays of mixed scalars, comma-separated strings
/// and single scalars. Blank entries are dropped; nothing here fails.
#[must_use]
pub fn normalize_available_upcs(raw: &Value) -> Vec<Upc> {
    match raw {
        Value::Array(items) => items.iter().filter_map(normalize_upc).collect(),
        Value::String(s) => s.split(',').filter_map(Upc::parse).collect(),
        Value::Number(_) => normalize_upc(raw).into_iter().collect(),
        Value::Null | Value::Bool(_) | Value::Object(_) => Vec::new(),
    }
}

#[cfg(test)]
#[path = "upc_test.rs"]
mod tests;
