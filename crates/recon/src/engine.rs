use std::collections::BTreeSet;

use crate::config::{AbsencePolicy, DevicePrecedence, PolicyConfig, ReconConfig};
use crate::index::SourceIndex;
use crate::model::{Presence, ReconInput, ReconMeta, ReconResult, ReconciledSerial, Source, SourceRow, SyncStatus};
use crate::normalize::LocationNormalizer;
use crate::summary::compute_summary;

/// Run reconciliation per config. Returns one record per distinct serial,
/// sorted by serial, plus a summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    run_with_progress(config, input, |_, _| {})
}

/// Same as [`run`], calling `on_progress(done, total)` after each serial.
pub fn run_with_progress<F>(config: &ReconConfig, input: &ReconInput, mut on_progress: F) -> ReconResult
where
    F: FnMut(usize, usize),
{
    let normalizer = config.normalize.normalizer();
    let erp = SourceIndex::build(Source::Erp, &input.erp);
    let wms = SourceIndex::build(Source::Wms, &input.wms);

    let serials: BTreeSet<&str> = erp.serials().chain(wms.serials()).collect();
    let total = serials.len();
    tracing::info!(
        serials = total,
        erp_rows = erp.row_count(),
        wms_rows = wms.row_count(),
        "matching serials"
    );

    let mut records = Vec::with_capacity(total);
    for (done, serial) in serials.into_iter().enumerate() {
        let erp_row = erp.get(serial);
        let wms_row = wms.get(serial);
        if let Some(record) = reconcile_serial(serial, erp_row, wms_row, &normalizer, &config.policy) {
            records.push(record);
        }
        on_progress(done + 1, total);
    }

    let summary = compute_summary(&records, &erp, &wms);
    tracing::info!(
        total = summary.total,
        synced = summary.synced,
        not_synced = summary.not_synced,
        "reconciliation complete"
    );

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            absent_policy: config.policy.absent,
            device_precedence: config.policy.device,
        },
        summary,
        records,
    }
}

/// Build the record for one serial from its first row in each source.
///
/// Returns `None` only when neither source has the serial.
pub fn reconcile_serial(
    serial: &str,
    erp_row: Option<&SourceRow>,
    wms_row: Option<&SourceRow>,
    normalizer: &LocationNormalizer,
    policy: &PolicyConfig,
) -> Option<ReconciledSerial> {
    let presence = Presence::from_flags(erp_row.is_some(), wms_row.is_some())?;

    let locate = |row: Option<&SourceRow>| {
        row.map(|r| normalizer.normalize(&r.location))
            .unwrap_or_default()
    };
    let erp_location = locate(erp_row);
    let wms_location = locate(wms_row);

    let device_row = match policy.device {
        DevicePrecedence::Erp => erp_row.or(wms_row),
        DevicePrecedence::Wms => wms_row.or(erp_row),
    };
    let device = device_row.map(|r| r.device.clone()).unwrap_or_default();

    let status = sync_status(&erp_location, &wms_location, presence, policy.absent);

    Some(ReconciledSerial {
        serial: serial.to_string(),
        device,
        erp_location,
        wms_location,
        status,
        presence,
    })
}

pub fn sync_status(
    erp_location: &str,
    wms_location: &str,
    presence: Presence,
    absent: AbsencePolicy,
) -> SyncStatus {
    if absent == AbsencePolicy::NotSynced && presence != Presence::Both {
        return SyncStatus::NotSynced;
    }
    if erp_location == wms_location {
        SyncStatus::Synced
    } else {
        SyncStatus::NotSynced
    }
}
