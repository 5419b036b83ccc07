//! Column classification heuristics
//!
//! Header-keyword matching with content-based fallbacks. The keyword lists
//! below are the union of two lists that had drifted apart across earlier
//! revisions of this tool; they are the single source of truth now, and
//! the union is documented by a test.
//!
//! Classification is deterministic and never fails: when no confident
//! match exists each lookup falls back to a documented default.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::table::Table;

/// Header keywords that identify the name column.
pub const NAME_KEYWORDS: &[&str] = &[
    "名前", "氏名", "受講生名", "生徒名", "学生名", "受講生", "生徒", "Name", "name",
];

/// Header keywords that identify an ID column.
pub const ID_KEYWORDS: &[&str] = &["ID", "番号", "学籍番号", "受講生ID", "顧客番号"];

/// Header keywords that identify comment columns.
pub const COMMENT_KEYWORDS: &[&str] = &["コメント", "質問", "メモ", "Comment", "comment"];

/// Header keywords that identify the understanding-score column.
pub const UNDERSTANDING_KEYWORDS: &[&str] =
    &["理解度", "達成度", "スコア", "score", "Understanding"];

/// Header keywords for columns excluded from comment aggregation.
pub const EXCLUDE_KEYWORDS: &[&str] = &["削除", "消す", "除外", "ID", "番号"];

/// How many leading columns the name-content fallback inspects.
const NAME_SCAN_COLUMNS: usize = 5;

/// How many data rows the content fallbacks sample.
const SAMPLE_ROWS: usize = 10;

/// Which role each column of an input table plays.
///
/// The lookups are independent: a column may appear both as a comment
/// column and an excluded column, in which case the normalizer skips it
/// when aggregating comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Column holding student names (always resolved; defaults to 0).
    pub name_column: usize,
    /// Column holding an ID, when a header names one.
    pub id_column: Option<usize>,
    /// Columns holding free-text comments.
    pub comment_columns: Vec<usize>,
    /// Column holding a numeric understanding score.
    pub understanding_column: Option<usize>,
    /// Columns left out of comment aggregation.
    pub exclude_columns: Vec<usize>,
}

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // CJK ideographs, kana, Latin letters, whitespace (incl. U+3000),
    // roman numerals, and a little punctuation
    Regex::new(r"^[\p{Han}\p{Hiragana}\p{Katakana}a-zA-Z\s\u{3000}\u{2160}-\u{2188}.\-]+$")
        .unwrap()
});

static ID_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$|^\d{3,}").unwrap());

/// Whether a cell value looks like a personal name.
///
/// Trimmed length 2-30 characters, composed only of CJK/kana/Latin
/// letters, whitespace, roman numerals, `.` or `-`, and not ID-shaped
/// (digits only, or starting with three or more digits).
pub fn looks_like_personal_name(text: &str) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if !(2..=30).contains(&len) {
        return false;
    }
    NAME_PATTERN.is_match(trimmed) && !ID_LIKE.is_match(trimmed)
}

/// Classify every column of a table in one pass.
pub fn classify(table: &Table) -> Classification {
    Classification {
        name_column: name_column(table),
        id_column: id_column(table),
        comment_columns: comment_columns(table),
        understanding_column: understanding_column(table),
        exclude_columns: exclude_columns(table),
    }
}

/// Find the name column: header keywords first, then a content scan over
/// the first few columns scoring name-looking cells. Ties keep the lowest
/// index because the comparison is strict.
fn name_column(table: &Table) -> usize {
    if table.len() < 2 {
        return 0;
    }
    let headers = &table.rows[0];
    for (idx, header) in headers.iter().enumerate() {
        if NAME_KEYWORDS.iter().any(|kw| header.contains(kw)) {
            return idx;
        }
    }

    let mut best = 0;
    let mut best_count = 0;
    for col in 0..headers.len().min(NAME_SCAN_COLUMNS) {
        let count = table
            .data_rows()
            .iter()
            .take(SAMPLE_ROWS)
            .filter(|row| row.get(col).is_some_and(|v| looks_like_personal_name(v)))
            .count();
        if count > best_count {
            best_count = count;
            best = col;
        }
    }
    best
}

/// Find an ID column by header keyword only; no content fallback.
fn id_column(table: &Table) -> Option<usize> {
    if table.len() < 2 {
        return None;
    }
    table.rows[0]
        .iter()
        .position(|header| ID_KEYWORDS.iter().any(|kw| header.contains(kw)))
}

/// Find the comment columns; defaults to column 1 when nothing matches
/// and the table is wide enough.
fn comment_columns(table: &Table) -> Vec<usize> {
    let Some(headers) = table.header() else {
        return Vec::new();
    };
    let matched: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| COMMENT_KEYWORDS.iter().any(|kw| header.contains(kw)))
        .map(|(idx, _)| idx)
        .collect();
    if matched.is_empty() && headers.len() > 1 {
        return vec![1];
    }
    matched
}

/// Find the understanding column: header keywords first, then the first
/// column whose sampled cell parses as a number in [0, 100].
fn understanding_column(table: &Table) -> Option<usize> {
    let headers = table.header()?;
    if let Some(idx) = headers
        .iter()
        .position(|header| UNDERSTANDING_KEYWORDS.iter().any(|kw| header.contains(kw)))
    {
        return Some(idx);
    }

    for row in table.data_rows().iter().take(SAMPLE_ROWS) {
        for (col, cell) in row.iter().enumerate() {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Ok(n) = trimmed.parse::<f64>() {
                if (0.0..=100.0).contains(&n) {
                    return Some(col);
                }
            }
        }
    }
    None
}

/// Find columns to leave out of comment aggregation, by header keyword.
fn exclude_columns(table: &Table) -> Vec<usize> {
    let Some(headers) = table.header() else {
        return Vec::new();
    };
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| EXCLUDE_KEYWORDS.iter().any(|kw| header.contains(kw)))
        .map(|(idx, _)| idx)
        .collect()
}
