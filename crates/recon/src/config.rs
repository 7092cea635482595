use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::Source;
use crate::normalize::{LocationNormalizer, LocationRule};

pub const DEFAULT_ERP_FILE: &str = "ERP.xlsx";
pub const DEFAULT_WMS_FILE: &str = "WMS.xlsx";
pub const DEFAULT_OUTPUT_FILE: &str = "Serial_Report.xlsx";
pub const DEFAULT_OUTPUT_SHEET: &str = "Serial Report";

/// Excel's sheet-name length limit.
const MAX_SHEET_NAME: usize = 31;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Keyed by source name: `erp` and `wms`.
    pub sources: BTreeMap<String, SourceConfig>,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "serialsync".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            sources: BTreeMap::from([
                ("erp".to_string(), SourceConfig::new(DEFAULT_ERP_FILE)),
                ("wms".to_string(), SourceConfig::new(DEFAULT_WMS_FILE)),
            ]),
            policy: PolicyConfig::default(),
            normalize: NormalizeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    /// Worksheet name for workbook inputs. Defaults to the first sheet.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Keep at most this many data rows (counted after blank serials are dropped).
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl SourceConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: None,
            limit: None,
            columns: ColumnMapping::default(),
        }
    }
}

/// Zero-based column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_serial_col")]
    pub serial: usize,
    #[serde(default = "default_location_col")]
    pub location: usize,
    #[serde(default = "default_device_col")]
    pub device: usize,
}

fn default_serial_col() -> usize {
    0
}

fn default_location_col() -> usize {
    1
}

fn default_device_col() -> usize {
    2
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            serial: default_serial_col(),
            location: default_location_col(),
            device: default_device_col(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How a serial missing from one source is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsencePolicy {
    /// The missing side counts as an empty location and is compared normally.
    #[default]
    MatchEmpty,
    /// A serial missing from either source is always not synced.
    NotSynced,
}

impl std::fmt::Display for AbsencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchEmpty => write!(f, "match_empty"),
            Self::NotSynced => write!(f, "not_synced"),
        }
    }
}

/// Which source's device label is reported when both carry the serial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePrecedence {
    #[default]
    Erp,
    Wms,
}

impl DevicePrecedence {
    pub fn preferred(&self) -> Source {
        match self {
            Self::Erp => Source::Erp,
            Self::Wms => Source::Wms,
        }
    }
}

impl std::fmt::Display for DevicePrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.preferred().as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub absent: AbsencePolicy,
    #[serde(default)]
    pub device: DevicePrecedence,
}

// ---------------------------------------------------------------------------
// Normalize + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizeConfig {
    /// Replaces the built-in table when present.
    #[serde(default)]
    pub rules: Option<Vec<LocationRule>>,
}

impl NormalizeConfig {
    pub fn normalizer(&self) -> LocationNormalizer {
        match &self.rules {
            Some(rules) => LocationNormalizer::new(rules.iter().cloned()),
            None => LocationNormalizer::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: String,
    #[serde(default = "default_output_sheet")]
    pub sheet: String,
    /// Optional JSON dump of the full result.
    #[serde(default)]
    pub json: Option<String>,
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.into()
}

fn default_output_sheet() -> String {
    DEFAULT_OUTPUT_SHEET.into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            sheet: default_output_sheet(),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn source(&self, source: Source) -> Result<&SourceConfig, ReconError> {
        self.sources.get(source.as_str()).ok_or_else(|| {
            ReconError::ConfigValidation(format!("missing [sources.{}]", source.as_str()))
        })
    }

    pub fn source_mut(&mut self, source: Source) -> Result<&mut SourceConfig, ReconError> {
        self.sources.get_mut(source.as_str()).ok_or_else(|| {
            ReconError::ConfigValidation(format!("missing [sources.{}]", source.as_str()))
        })
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for name in self.sources.keys() {
            if name != Source::Erp.as_str() && name != Source::Wms.as_str() {
                return Err(ReconError::UnknownSource(name.clone()));
            }
        }

        for source in [Source::Erp, Source::Wms] {
            let sc = self.source(source)?;
            let name = source.as_str();

            if sc.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{name}': file must not be empty"
                )));
            }
            if sc.limit == Some(0) {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{name}': limit must be at least 1 (omit it for no limit)"
                )));
            }
            if let Some(sheet) = &sc.sheet {
                if sheet.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "source '{name}': sheet must not be empty"
                    )));
                }
            }

            let cols = sc.columns;
            let named = [
                ("serial", cols.serial),
                ("location", cols.location),
                ("device", cols.device),
            ];
            for (i, (first, a)) in named.iter().enumerate() {
                for (second, b) in &named[i + 1..] {
                    if a == b {
                        return Err(ReconError::ColumnClash {
                            source_name: name.into(),
                            index: *a,
                            first: *first,
                            second: *second,
                        });
                    }
                }
            }
        }

        if let Some(rules) = &self.normalize.rules {
            for (i, rule) in rules.iter().enumerate() {
                if rule.keyword.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "normalize rule #{}: keyword must not be empty",
                        i + 1
                    )));
                }
            }
        }

        if self.output.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output file must not be empty".into(),
            ));
        }
        let sheet_len = self.output.sheet.chars().count();
        if sheet_len == 0 || sheet_len > MAX_SHEET_NAME {
            return Err(ReconError::ConfigValidation(format!(
                "output sheet name must be 1-{MAX_SHEET_NAME} characters, got {sheet_len}"
            )));
        }

        Ok(())
    }
}

/// Commented starter config written by `serialsync init`.
pub const STARTER_CONFIG: &str = r#"# serialsync reconciliation config
name = "ERP vs WMS"

[sources.erp]
file = "ERP.xlsx"
# sheet = "Export"
# limit = 500

[sources.erp.columns]
serial = 0
location = 1
device = 2

[sources.wms]
file = "WMS.xlsx"

[policy]
# "match_empty": a serial missing from one system compares as an empty location
# "not_synced":  a serial missing from either system is always Not Synced
absent = "match_empty"
# device label shown when both systems know the serial: "erp" or "wms"
device = "erp"

# Uncomment to replace the built-in location rules (first match wins).
# [[normalize.rules]]
# keyword = "TRIAGE"
# category = "Triage"

[output]
file = "Serial_Report.xlsx"
sheet = "Serial Report"
# json = "serial_report.json"
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[sources.erp]
file = "erp.csv"

[sources.wms]
file = "wms.csv"
"#;

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = ReconConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "serialsync");
        let erp = config.source(Source::Erp).unwrap();
        assert_eq!(erp.file, "erp.csv");
        assert_eq!(erp.columns, ColumnMapping::default());
        assert!(erp.limit.is_none());
        assert_eq!(config.policy.absent, AbsencePolicy::MatchEmpty);
        assert_eq!(config.policy.device, DevicePrecedence::Erp);
        assert_eq!(config.output.file, DEFAULT_OUTPUT_FILE);
        assert_eq!(config.output.sheet, DEFAULT_OUTPUT_SHEET);
        assert!(config.normalize.rules.is_none());
    }

    #[test]
    fn parse_full() {
        let input = r#"
name = "Nightly"

[sources.erp]
file = "ERP.xlsx"
sheet = "Export"
limit = 10

[sources.erp.columns]
serial = 2
location = 0
device = 1

[sources.wms]
file = "WMS.xlsx"

[policy]
absent = "not_synced"
device = "wms"

[[normalize.rules]]
keyword = "dock"
category = "Receiving"

[output]
file = "out.csv"
sheet = "Report"
json = "out.json"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.name, "Nightly");
        let erp = config.source(Source::Erp).unwrap();
        assert_eq!(erp.sheet.as_deref(), Some("Export"));
        assert_eq!(erp.limit, Some(10));
        assert_eq!(erp.columns.serial, 2);
        assert_eq!(config.policy.absent, AbsencePolicy::NotSynced);
        assert_eq!(config.policy.device, DevicePrecedence::Wms);
        let normalizer = config.normalize.normalizer();
        assert_eq!(normalizer.rules().len(), 1);
        assert_eq!(normalizer.normalize("Dock 3"), "Receiving");
        assert_eq!(config.output.json.as_deref(), Some("out.json"));
    }

    #[test]
    fn default_config_is_valid() {
        let config = ReconConfig::default();
        config.validate().unwrap();
        assert_eq!(config.source(Source::Wms).unwrap().file, DEFAULT_WMS_FILE);
    }

    #[test]
    fn starter_config_parses() {
        let config = ReconConfig::from_toml(STARTER_CONFIG).unwrap();
        assert_eq!(config.name, "ERP vs WMS");
    }

    #[test]
    fn reject_missing_source() {
        let input = r#"
[sources.erp]
file = "erp.csv"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("sources.wms"));
    }

    #[test]
    fn reject_unknown_source() {
        let input = format!("{MINIMAL}\n[sources.mes]\nfile = \"mes.csv\"\n");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::UnknownSource(ref s) if s == "mes"));
    }

    #[test]
    fn reject_column_clash() {
        let input = r#"
[sources.erp]
file = "erp.csv"
[sources.erp.columns]
serial = 1

[sources.wms]
file = "wms.csv"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("serial and location"));
    }

    #[test]
    fn reject_zero_limit() {
        let input = r#"
[sources.erp]
file = "erp.csv"
limit = 0

[sources.wms]
file = "wms.csv"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn reject_empty_rule_keyword() {
        let input = format!("{MINIMAL}\n[[normalize.rules]]\nkeyword = \" \"\ncategory = \"X\"\n");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("rule #1"));
    }

    #[test]
    fn reject_long_sheet_name() {
        let input = format!("{MINIMAL}\n[output]\nsheet = \"{}\"\n", "x".repeat(32));
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("sheet name"));
    }

    #[test]
    fn reject_invalid_policy() {
        let input = format!("{MINIMAL}\n[policy]\nabsent = \"sometimes\"\n");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
