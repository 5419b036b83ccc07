//! Canonical table construction
//!
//! Reshapes an arbitrary classified input table into the canonical
//! 3-column form (name, understanding, comment), merging rows that share
//! a name.

use std::collections::HashMap;

use crate::core::classify::Classification;
use crate::core::table::Table;

/// Header of the canonical table: name, understanding, comment.
pub const CANONICAL_HEADER: [&str; 3] = ["名前", "理解度", "コメント"];

/// Per-student data aggregated across input rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    /// First non-empty ID seen for this name.
    pub id: String,
    /// First non-empty understanding score seen for this name.
    pub understanding: String,
    /// Comment cells in row order, trimmed, empties skipped.
    pub comments: Vec<String>,
}

impl StudentRecord {
    fn new(name: String) -> Self {
        StudentRecord {
            name,
            ..Default::default()
        }
    }
}

/// Group data rows by exact name-cell equality, preserving first-seen
/// order. Rows with an empty or missing name cell are skipped.
pub fn collect_records(table: &Table, cls: &Classification) -> Vec<StudentRecord> {
    let mut records: Vec<StudentRecord> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for row in table.data_rows() {
        let Some(name) = row.get(cls.name_column).filter(|n| !n.is_empty()) else {
            continue;
        };

        let pos = *by_name.entry(name.clone()).or_insert_with(|| {
            records.push(StudentRecord::new(name.clone()));
            records.len() - 1
        });
        let record = &mut records[pos];

        if record.id.is_empty() {
            if let Some(id) = cls.id_column.and_then(|c| row.get(c)) {
                record.id = id.clone();
            }
        }

        if record.understanding.is_empty() {
            if let Some(score) = cls.understanding_column.and_then(|c| row.get(c)) {
                record.understanding = score.clone();
            }
        }

        for &col in &cls.comment_columns {
            if cls.exclude_columns.contains(&col) {
                continue;
            }
            if let Some(comment) = row.get(col) {
                let trimmed = comment.trim();
                if !trimmed.is_empty() {
                    record.comments.push(trimmed.to_string());
                }
            }
        }
    }

    records
}

/// Produce the canonical `[名前, 理解度, コメント]` table.
///
/// Comments are space-joined in row order. A table with fewer than two
/// rows normalizes to the header-only canonical table.
pub fn normalize(table: &Table, cls: &Classification) -> Table {
    let mut rows: Vec<Vec<String>> =
        vec![CANONICAL_HEADER.iter().map(|s| s.to_string()).collect()];

    if table.len() >= 2 {
        for record in collect_records(table, cls) {
            rows.push(vec![
                record.name,
                record.understanding,
                record.comments.join(" "),
            ]);
        }
    }

    Table { rows }
}
