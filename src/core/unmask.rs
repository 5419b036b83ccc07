//! Unmasking engine
//!
//! Reverses the token substitution recorded in a [`MaskingSession`].
//! Fails soft throughout: an empty map or an unknown token leaves the
//! input as-is.

use regex::Regex;

use crate::core::mask::MaskingSession;
use crate::core::table::Table;

/// A (token, name) pair with its compiled whole-word pattern.
struct TokenPattern {
    token: String,
    name: String,
    pattern: Regex,
}

/// Build patterns sorted by token length descending.
///
/// The ordering guarantees `Person_10` is substituted before `Person_1`,
/// so a short token can never match as a prefix of a longer one; it is
/// kept even though whole-word matching already prevents that.
fn token_patterns(session: &MaskingSession) -> Vec<TokenPattern> {
    let mut patterns: Vec<TokenPattern> = session
        .pairs()
        .iter()
        .filter(|p| !p.token.is_empty() && !p.name.is_empty())
        .map(|p| {
            // Tokens are ASCII; match them with ASCII word boundaries so
            // "Person_1は" still unmasks when the LLM omits spaces
            let raw = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(&p.token));
            TokenPattern {
                token: p.token.clone(),
                name: p.name.clone(),
                pattern: Regex::new(&raw).expect("escaped literal pattern"),
            }
        })
        .collect();
    patterns.sort_by(|a, b| b.token.len().cmp(&a.token.len()));
    patterns
}

/// Replace tokens with their original names across a table.
///
/// The header row passes through unmodified. A cell equal to a token is
/// replaced wholesale; otherwise every whole-word occurrence inside the
/// cell is replaced.
pub fn unmask_table(table: &Table, session: &MaskingSession) -> Table {
    if table.is_empty() {
        return table.clone();
    }

    let patterns = token_patterns(session);
    let mut rows = Vec::with_capacity(table.len());
    rows.push(table.rows[0].clone());

    for row in table.data_rows() {
        rows.push(row.iter().map(|cell| unmask_cell(cell, &patterns)).collect());
    }

    Table { rows }
}

/// Replace tokens with their original names in freeform text.
///
/// The fallback path for output that does not parse as a table.
pub fn unmask_text(text: &str, session: &MaskingSession) -> String {
    let mut out = text.to_string();
    for tp in token_patterns(session) {
        out = tp
            .pattern
            .replace_all(&out, regex::NoExpand(&tp.name))
            .into_owned();
    }
    out
}

fn unmask_cell(cell: &str, patterns: &[TokenPattern]) -> String {
    let mut out = cell.to_string();
    for tp in patterns {
        if out == tp.token {
            out = tp.name.clone();
        } else {
            out = tp
                .pattern
                .replace_all(&out, regex::NoExpand(&tp.name))
                .into_owned();
        }
    }
    out
}
