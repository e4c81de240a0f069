//! Data-source variants.
//!
//! Each variant pairs a store-list document with a product-catalog document.
//! The four storefronts ship as built-ins; a YAML file can replace them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DATA_BASE_URL: &str = "https://raw.githubusercontent.com/cookie8monster/GranolaQuest/main";
const CATALOG_DOCUMENT: &str = "UPC%20June%202025%20v2.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Short identifier used on the command line and in API paths.
    pub slug: String,
    /// Human-readable label, e.g. `"Costco"`.
    pub label: String,
    pub stores_url: String,
    pub catalog_url: String,
    /// Append a `v=<millis>` query parameter so CDN caches are bypassed.
    #[serde(default)]
    pub cache_bust: bool,
}

#[derive(Debug, Deserialize)]
pub struct VariantsFile {
    pub variants: Vec<VariantConfig>,
}

impl VariantsFile {
    /// Look up a variant by slug, case-insensitively.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&VariantConfig> {
        let wanted = slug.trim();
        self.variants
            .iter()
            .find(|v| v.slug.eq_ignore_ascii_case(wanted))
    }

    /// Like [`VariantsFile::find`] but reports unknown slugs as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownVariant`] when no variant matches.
    pub fn require(&self, slug: &str) -> Result<&VariantConfig, ConfigError> {
        self.find(slug)
            .ok_or_else(|| ConfigError::UnknownVariant(slug.trim().to_string()))
    }
}

fn builtin(slug: &str, label: &str, stores_document: &str, cache_bust: bool) -> VariantConfig {
    VariantConfig {
        slug: slug.to_string(),
        label: label.to_string(),
        stores_url: format!("{DATA_BASE_URL}/{stores_document}"),
        catalog_url: format!("{DATA_BASE_URL}/{CATALOG_DOCUMENT}"),
        cache_bust,
    }
}

/// The storefront variants that ship with the locator.
#[must_use]
pub fn builtin_variants() -> VariantsFile {
    VariantsFile {
        variants: vec![
            builtin(
                "generic",
                "All retailers",
                "June%202025%20Store%20List%20v4.json",
                false,
            ),
            builtin("chacha", "ChaCha", "ChaCha.json", false),
            builtin("costco", "Costco", "CostcoJan26.json", true),
            builtin("target", "Target", "TargetJan26.json", false),
        ],
    }
}

/// Load and validate variants from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_variants(path: &Path) -> Result<VariantsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VariantsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let variants_file: VariantsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::VariantsFileParse)?;

    validate_variants(&variants_file)?;

    Ok(variants_file)
}

/// Variants from `path` when configured, otherwise the built-ins.
///
/// # Errors
///
/// Propagates [`load_variants`] failures.
pub fn resolve_variants(path: Option<&Path>) -> Result<VariantsFile, ConfigError> {
    match path {
        Some(path) => load_variants(path),
        None => Ok(builtin_variants()),
    }
}

fn validate_variants(variants_file: &VariantsFile) -> Result<(), ConfigError> {
    if variants_file.variants.is_empty() {
        return Err(ConfigError::Validation(
            "at least one variant must be defined".to_string(),
        ));
    }

    let mut seen_slugs = HashSet::new();

    for variant in &variants_file.variants {
        let slug = variant.slug.trim();
        if slug.is_empty() {
            return Err(ConfigError::Validation(
                "variant slug must be non-empty".to_string(),
            ));
        }

        if variant.stores_url.trim().is_empty() || variant.catalog_url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "variant '{slug}' must define both stores_url and catalog_url"
            )));
        }

        if !seen_slugs.insert(slug.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate variant slug: '{slug}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> VariantsFile {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn builtin_variants_pass_validation() {
        let variants = builtin_variants();
        validate_variants(&variants).expect("built-ins must validate");
        assert_eq!(variants.variants.len(), 4);
    }

    #[test]
    fn builtin_costco_busts_cache() {
        let variants = builtin_variants();
        let costco = variants.require("costco").unwrap();
        assert!(costco.cache_bust);
        assert!(costco.stores_url.ends_with("/CostcoJan26.json"));
    }

    #[test]
    fn builtin_urls_have_no_raw_spaces() {
        for v in builtin_variants().variants {
            assert!(!v.stores_url.contains(' '), "{}", v.stores_url);
            assert!(!v.catalog_url.contains(' '), "{}", v.catalog_url);
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let variants = builtin_variants();
        assert_eq!(variants.find(" Target ").map(|v| v.slug.as_str()), Some("target"));
    }

    #[test]
    fn require_reports_unknown_slug() {
        let err = builtin_variants().require("walmart").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant(ref s) if s == "walmart"));
    }

    #[test]
    fn cache_bust_defaults_to_false() {
        let file = parse(
            "variants:\n  - slug: local\n    label: Local\n    stores_url: http://x/s.json\n    catalog_url: http://x/c.json\n",
        );
        assert!(!file.variants[0].cache_bust);
        validate_variants(&file).unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_slugs() {
        let file = parse(
            "variants:\n  - slug: a\n    label: A\n    stores_url: s\n    catalog_url: c\n  - slug: A\n    label: A2\n    stores_url: s\n    catalog_url: c\n",
        );
        let err = validate_variants(&file).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn validate_rejects_missing_urls() {
        let file = parse(
            "variants:\n  - slug: a\n    label: A\n    stores_url: ''\n    catalog_url: c\n",
        );
        assert!(validate_variants(&file).is_err());
    }

    #[test]
    fn validate_rejects_empty_list() {
        let file = parse("variants: []\n");
        assert!(validate_variants(&file).is_err());
    }

    #[test]
    fn load_variants_reports_missing_file() {
        let err = load_variants(Path::new("/nonexistent/variants.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::VariantsFileIo { .. }));
    }

    #[test]
    fn shipped_variants_file_matches_builtins() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/variants.yaml");
        let loaded = load_variants(&path).expect("config/variants.yaml must load");
        assert_eq!(loaded.variants, builtin_variants().variants);
    }

    #[test]
    fn resolve_variants_without_path_uses_builtins() {
        let variants = resolve_variants(None).unwrap();
        assert!(variants.find("generic").is_some());
    }
}
