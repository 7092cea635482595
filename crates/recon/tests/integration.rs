use std::collections::BTreeSet;

use proptest::prelude::*;
use serialsync_recon::config::{AbsencePolicy, ReconConfig};
use serialsync_recon::model::{Presence, ReconInput, SourceRow, SyncStatus};
use serialsync_recon::run;

fn rows(v: &[(&str, &str, &str)]) -> Vec<SourceRow> {
    v.iter().map(|(s, l, d)| SourceRow::new(*s, *l, *d)).collect()
}

// -------------------------------------------------------------------------
// Mixed scenario
// -------------------------------------------------------------------------

#[test]
fn mixed_inventory_snapshot() {
    let input = ReconInput {
        erp: rows(&[
            ("SN-001", "Retail Floor", "Handheld X1"),
            ("SN-002", "QUAR-BIN-3", "Handheld X1"),
            ("SN-003", "Repair Center", "Printer P4"),
            ("SN-004", "Dock 4", "Printer P4"),
            ("SN-006", "sub wip rack", "Tablet T2"),
        ]),
        wms: rows(&[
            ("SN-001", "retail", "HH-X1"),
            ("SN-002", "Quarantine Area", "HH-X1"),
            ("SN-003", "Triage", "PR-P4"),
            ("SN-004", "dock 4", "PR-P4"),
            ("SN-005", "", "Tablet T2"),
        ]),
    };

    let result = run(&ReconConfig::default(), &input);
    let table: Vec<(&str, &str, &str, &str, SyncStatus)> = result
        .records
        .iter()
        .map(|r| {
            (
                r.serial.as_str(),
                r.device.as_str(),
                r.erp_location.as_str(),
                r.wms_location.as_str(),
                r.status,
            )
        })
        .collect();

    assert_eq!(
        table,
        vec![
            ("SN-001", "Handheld X1", "Retail", "Retail", SyncStatus::Synced),
            ("SN-002", "Handheld X1", "Quar", "Quar", SyncStatus::Synced),
            ("SN-003", "Printer P4", "Repair", "Triage", SyncStatus::NotSynced),
            ("SN-004", "Printer P4", "DOCK 4", "DOCK 4", SyncStatus::Synced),
            ("SN-005", "Tablet T2", "", "", SyncStatus::Synced),
            ("SN-006", "Tablet T2", "Sub-Wip", "", SyncStatus::NotSynced),
        ]
    );

    let s = &result.summary;
    assert_eq!(s.total, 6);
    assert_eq!(s.synced, 4);
    assert_eq!(s.not_synced, 2);
    assert_eq!(s.in_both, 4);
    assert_eq!(s.erp_only, 1);
    assert_eq!(s.wms_only, 1);
}

#[test]
fn result_serializes_to_json() {
    let input = ReconInput {
        erp: rows(&[("A", "Retail", "dev")]),
        wms: vec![],
    };
    let result = run(&ReconConfig::default(), &input);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["meta"]["absent_policy"], "match_empty");
    assert_eq!(json["meta"]["device_precedence"], "erp");
    assert_eq!(json["summary"]["not_synced"], 1);
    assert_eq!(json["records"][0]["serial"], "A");
    assert_eq!(json["records"][0]["status"], "not_synced");
    assert_eq!(json["records"][0]["presence"], "erp_only");
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

fn row_strategy() -> impl Strategy<Value = SourceRow> {
    (
        "[A-D][0-9]{1,2}",
        prop::sample::select(vec!["", "Retail", "retail floor", "TRIAGE", "Quar 2", "Dock"]),
        "[a-z]{0,4}",
    )
        .prop_map(|(s, l, d)| SourceRow::new(s, l, d))
}

proptest! {
    #[test]
    fn output_is_union_without_duplicates(
        erp in prop::collection::vec(row_strategy(), 0..40),
        wms in prop::collection::vec(row_strategy(), 0..40),
    ) {
        let expected: BTreeSet<String> = erp.iter().chain(wms.iter()).map(|r| r.serial.clone()).collect();
        let result = run(&ReconConfig::default(), &ReconInput { erp, wms });

        let serials: Vec<String> = result.records.iter().map(|r| r.serial.clone()).collect();
        let unique: BTreeSet<String> = serials.iter().cloned().collect();

        prop_assert_eq!(serials.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn status_tracks_location_equality(
        erp in prop::collection::vec(row_strategy(), 0..30),
        wms in prop::collection::vec(row_strategy(), 0..30),
    ) {
        let result = run(&ReconConfig::default(), &ReconInput { erp, wms });
        for r in &result.records {
            let expected = if r.erp_location == r.wms_location {
                SyncStatus::Synced
            } else {
                SyncStatus::NotSynced
            };
            prop_assert_eq!(r.status, expected);
        }
    }

    #[test]
    fn strict_policy_never_syncs_single_source(
        erp in prop::collection::vec(row_strategy(), 0..30),
        wms in prop::collection::vec(row_strategy(), 0..30),
    ) {
        let mut config = ReconConfig::default();
        config.policy.absent = AbsencePolicy::NotSynced;
        let result = run(&config, &ReconInput { erp, wms });
        for r in &result.records {
            if r.presence != Presence::Both {
                prop_assert_eq!(r.status, SyncStatus::NotSynced);
            }
        }
    }
}
