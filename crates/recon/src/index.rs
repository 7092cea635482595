use std::collections::BTreeMap;

use crate::model::{Source, SourceRow};

/// Serial → first row carrying that serial, for one source.
///
/// Later rows repeating a serial are not indexed; they are only counted.
#[derive(Debug)]
pub struct SourceIndex<'a> {
    pub source: Source,
    rows: BTreeMap<&'a str, &'a SourceRow>,
    row_count: usize,
    duplicates: usize,
}

impl<'a> SourceIndex<'a> {
    pub fn build(source: Source, rows: &'a [SourceRow]) -> Self {
        let mut map: BTreeMap<&'a str, &'a SourceRow> = BTreeMap::new();
        let mut duplicates = 0;

        for row in rows {
            if map.contains_key(row.serial.as_str()) {
                duplicates += 1;
                tracing::debug!(source = %source, serial = %row.serial, "duplicate serial ignored");
                continue;
            }
            map.insert(row.serial.as_str(), row);
        }

        if duplicates > 0 {
            tracing::warn!(source = %source, duplicates, "rows with repeated serials ignored (first row wins)");
        }

        Self {
            source,
            rows: map,
            row_count: rows.len(),
            duplicates,
        }
    }

    pub fn get(&self, serial: &str) -> Option<&'a SourceRow> {
        self.rows.get(serial).copied()
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.rows.contains_key(serial)
    }

    /// Distinct serials in ascending order.
    pub fn serials(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
