use crate::index::SourceIndex;
use crate::model::{Presence, ReconSummary, ReconciledSerial, SyncStatus};

/// Count statuses and presence across reconciled records.
pub fn compute_summary(
    records: &[ReconciledSerial],
    erp: &SourceIndex<'_>,
    wms: &SourceIndex<'_>,
) -> ReconSummary {
    let mut summary = ReconSummary {
        total: records.len(),
        erp_rows: erp.row_count(),
        wms_rows: wms.row_count(),
        erp_duplicates: erp.duplicates(),
        wms_duplicates: wms.duplicates(),
        ..Default::default()
    };

    for r in records {
        match r.status {
            SyncStatus::Synced => summary.synced += 1,
            SyncStatus::NotSynced => summary.not_synced += 1,
        }
        match r.presence {
            Presence::Both => summary.in_both += 1,
            Presence::ErpOnly => summary.erp_only += 1,
            Presence::WmsOnly => summary.wms_only += 1,
        }
    }

    summary
}
