//! Categorical frequency breakdowns for the charting layer.

use std::collections::HashMap;

use crate::data::RecordTable;

/// Dimension columns the KPI dashboard breaks down, in display order.
pub const KPI_DIMENSIONS: [&str; 2] = ["Region", "Stage"];

/// Count rows per distinct value of `column`.
///
/// Ordered by descending count; equal counts keep first-seen order. Missing
/// cells are counted under their rendered form (`NaN`) so the counts always
/// sum to the row count. Returns `None` when the column is absent; callers
/// treat that as "skip this breakdown".
pub fn aggregate(table: &RecordTable, column: &str) -> Option<Vec<(String, usize)>> {
    let values = table.column(column)?;

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for v in values {
        let key = v.to_string();
        match index.get(&key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Some(counts)
}
