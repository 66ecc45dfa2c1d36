//! Organizes a flat, mixed-type table into per-data-type tables.

use std::collections::BTreeMap;

use crate::logging::{self, Component};
use crate::model::TimeSeriesTable;

/// Partitions `table` into one sub-table per distinct `data_type`.
///
/// Record order within each group follows the input. Records without a
/// data type belong to no group. An empty table, or one in which no record
/// has a type, yields an empty map.
pub fn group_by_type(table: &TimeSeriesTable) -> BTreeMap<String, TimeSeriesTable> {
    let mut groups: BTreeMap<String, TimeSeriesTable> = BTreeMap::new();

    for record in table.iter() {
        if let Some(data_type) = &record.data_type {
            groups
                .entry(data_type.clone())
                .or_default()
                .records
                .push(record.clone());
        }
    }

    let untyped = table.iter().filter(|r| r.data_type.is_none()).count();
    if untyped > 0 {
        logging::debug(
            Component::Transform,
            None,
            &format!("group_by_type skipped {} untyped records", untyped),
        );
    }

    groups
}

/// Returns only the records whose `data_type` equals `data_type`.
pub fn filter_by_type(table: &TimeSeriesTable, data_type: &str) -> TimeSeriesTable {
    table
        .iter()
        .filter(|r| r.data_type.as_deref() == Some(data_type))
        .cloned()
        .collect()
}
