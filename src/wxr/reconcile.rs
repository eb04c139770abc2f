use indexmap::IndexSet;

use super::record::Record;

/// Rewrites every record to the union of all columns.
///
/// Columns are ordered by first appearance across the records. Columns a
/// record lacks are set to the null marker.
pub fn reconcile(records: &[Record]) -> Vec<Record> {
    let columns: IndexSet<&str> = records.iter().flat_map(Record::keys).collect();

    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|&column| (column, record.get(column).cloned().flatten()))
                .collect::<Record>()
        })
        .collect()
}
