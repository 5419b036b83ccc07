//! CSV table representation and codec
//!
//! The parser is a permissive character-level state machine: unbalanced
//! quotes and other malformed input are absorbed according to the quote
//! state rather than rejected. Spreadsheet exports in the wild are messy
//! and the pipeline downstream treats every cell as opaque text, so a
//! best-effort parse is the contract here, not an error.

use serde::{Deserialize, Serialize};

/// An in-memory CSV table. Row 0 is the header row.
///
/// Rows may be ragged; a missing cell reads as the empty string via
/// [`Table::cell`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from pre-split rows. Mostly useful in tests.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = &'static str>,
    {
        Table {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Parse CSV text into a table.
    ///
    /// CRLF and bare CR are normalized to LF first. A `"` toggles quote
    /// state unless immediately followed by another `"`, which is an
    /// escaped literal quote. Unquoted `,` ends a field and unquoted LF
    /// ends a row. A trailing partial field/row is flushed if the field is
    /// non-empty or the row already has cells. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut chars = normalized.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                }
                ',' if !in_quotes => {
                    row.push(std::mem::take(&mut field));
                }
                '\n' if !in_quotes => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(ch),
            }
        }

        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }

        Table { rows }
    }

    /// Serialize the table back to CSV text.
    ///
    /// Cells are joined with `,` and rows with `\n`. A cell is wrapped in
    /// quotes, with internal quotes doubled, iff it contains a newline,
    /// comma, or quote.
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| escape_cell(cell))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The header row, if the table has one.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows (everything after the header).
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Read a cell; out-of-range positions read as the empty string.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Quote a cell for CSV output per RFC 4180.
fn escape_cell(cell: &str) -> String {
    if cell.contains('\n') || cell.contains(',') || cell.contains('"') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let table = Table::parse("name,score\n田中太郎,85\n");
        assert_eq!(
            table,
            Table::from_rows([["name", "score"], ["田中太郎", "85"]])
        );
    }

    #[test]
    fn test_parse_quoted_fields() {
        let table = Table::parse("a,\"b,c\",\"d\"\"e\"\n");
        assert_eq!(table.rows, vec![vec!["a", "b,c", "d\"e"]]);
    }

    #[test]
    fn test_parse_embedded_newline() {
        let table = Table::parse("a,\"line1\nline2\"\nb,c\n");
        assert_eq!(table.rows, vec![vec!["a", "line1\nline2"], vec!["b", "c"]]);
    }

    #[test]
    fn test_parse_normalizes_line_endings() {
        let crlf = Table::parse("a,b\r\nc,d\r\n");
        let cr = Table::parse("a,b\rc,d\r");
        let lf = Table::parse("a,b\nc,d\n");
        assert_eq!(crlf, lf);
        assert_eq!(cr, lf);
    }

    #[test]
    fn test_parse_trailing_partial_row() {
        // No trailing newline: the last field is still flushed
        let table = Table::parse("a,b\nc");
        assert_eq!(table.rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_parse_trailing_comma_yields_empty_cell() {
        let table = Table::parse("a,");
        assert_eq!(table.rows, vec![vec!["a", ""]]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(Table::parse("").is_empty());
        // A lone newline still delimits one empty-celled row
        assert_eq!(Table::parse("\n").rows, vec![vec![""]]);
    }

    #[test]
    fn test_parse_unbalanced_quote_is_absorbed() {
        // The open quote swallows the rest of the input into one field
        let table = Table::parse("a,\"bc\nd,e");
        assert_eq!(table.rows, vec![vec!["a", "bc\nd,e"]]);
    }

    #[test]
    fn test_serialize_quotes_when_needed() {
        let table = Table {
            rows: vec![vec![
                "plain".to_string(),
                "Hello, \"World\"\nLine2".to_string(),
            ]],
        };
        assert_eq!(table.to_csv(), "plain,\"Hello, \"\"World\"\"\nLine2\"");
    }

    #[test]
    fn test_round_trip() {
        let table = Table {
            rows: vec![
                vec!["名前".to_string(), "コメント".to_string()],
                vec!["田中太郎".to_string(), "quote \" and, comma\nline".to_string()],
                vec!["".to_string(), "x".to_string()],
            ],
        };
        assert_eq!(Table::parse(&table.to_csv()), table);
    }

    #[test]
    fn test_cell_out_of_range_reads_empty() {
        let table = Table::parse("a,b\nc\n");
        assert_eq!(table.cell(1, 0), "c");
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(9, 9), "");
    }
}
