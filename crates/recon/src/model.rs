use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{AbsencePolicy, DevicePrecedence};
use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which system a row was exported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Erp,
    Wms,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Erp => "erp",
            Self::Wms => "wms",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erp => write!(f, "ERP"),
            Self::Wms => write!(f, "WMS"),
        }
    }
}

/// A single data row from either source export.
///
/// `serial` is never empty: readers drop blank-serial rows before building
/// these. `location` and `device` are raw labels and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub serial: String,
    pub location: String,
    pub device: String,
}

impl SourceRow {
    pub fn new(serial: impl Into<String>, location: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            location: location.into(),
            device: device.into(),
        }
    }
}

/// Pre-loaded rows for both sources.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub erp: Vec<SourceRow>,
    pub wms: Vec<SourceRow>,
}

impl ReconInput {
    pub fn rows(&self, source: Source) -> &[SourceRow] {
        match source {
            Source::Erp => &self.erp,
            Source::Wms => &self.wms,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    NotSynced,
}

impl SyncStatus {
    /// Report wording for the status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "Synced",
            Self::NotSynced => "Not Synced",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "synced" => Ok(Self::Synced),
            "notsynced" => Ok(Self::NotSynced),
            _ => Err(ReconError::StatusParse(s.to_string())),
        }
    }
}

/// Which sources contained a serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Both,
    ErpOnly,
    WmsOnly,
}

impl Presence {
    pub fn from_flags(in_erp: bool, in_wms: bool) -> Option<Self> {
        match (in_erp, in_wms) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::ErpOnly),
            (false, true) => Some(Self::WmsOnly),
            (false, false) => None,
        }
    }
}

/// One reconciled serial. Built once from both source lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledSerial {
    pub serial: String,
    pub device: String,
    pub erp_location: String,
    pub wms_location: String,
    pub status: SyncStatus,
    pub presence: Presence,
}

impl std::fmt::Display for ReconciledSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Device: {} | Serial: {} | ERP: {} | WMS: {} | Status: {}",
            self.device, self.serial, self.erp_location, self.wms_location, self.status
        )
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub synced: usize,
    pub not_synced: usize,
    pub in_both: usize,
    pub erp_only: usize,
    pub wms_only: usize,
    pub erp_rows: usize,
    pub wms_rows: usize,
    /// Rows ignored because an earlier ERP row had the same serial.
    pub erp_duplicates: usize,
    /// Rows ignored because an earlier WMS row had the same serial.
    pub wms_duplicates: usize,
}

impl ReconSummary {
    pub fn is_clean(&self) -> bool {
        self.not_synced == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub absent_policy: AbsencePolicy,
    pub device_precedence: DevicePrecedence,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    /// Sorted by serial.
    pub records: Vec<ReconciledSerial>,
}
