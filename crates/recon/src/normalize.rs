//! Location label normalization.
//!
//! Free-text location labels from either export are folded into a small set
//! of canonical categories by an ordered list of substring rules. The first
//! rule whose keyword occurs in the upper-cased label wins; labels that match
//! no rule pass through upper-cased.

use serde::{Deserialize, Serialize};

/// Built-in rule table, in precedence order.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("TRIAGE", "Triage"),
    ("RETAIL", "Retail"),
    ("SUB", "Sub-Wip"),
    ("QUAR", "Quar"),
    ("REPAIR", "Repair"),
];

/// One (keyword, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub keyword: String,
    pub category: String,
}

impl LocationRule {
    /// Keywords are stored upper-cased so matching is case-insensitive.
    pub fn new(keyword: impl AsRef<str>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.as_ref().to_uppercase(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNormalizer {
    rules: Vec<LocationRule>,
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(keyword, category)| LocationRule::new(keyword, *category)),
        )
    }
}

impl LocationNormalizer {
    pub fn new(rules: impl IntoIterator<Item = LocationRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| LocationRule::new(&r.keyword, r.category))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[LocationRule] {
        &self.rules
    }

    /// Map a raw label to its canonical category. Empty in, empty out.
    pub fn normalize(&self, label: &str) -> String {
        if label.is_empty() {
            return String::new();
        }
        let upper = label.to_uppercase();
        self.rules
            .iter()
            .find(|rule| upper.contains(rule.keyword.as_str()))
            .map(|rule| rule.category.clone())
            .unwrap_or(upper)
    }
}

/// Normalize with the built-in rule table.
pub fn normalize_location(label: &str) -> String {
    LocationNormalizer::default().normalize(label)
}
