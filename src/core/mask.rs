//! Masking engine and session state
//!
//! Replaces detected personal names with sequential `Person_<N>` tokens
//! and records the token↔name map. The map is an explicit session object
//! owned by the caller: one session covers one mask → generate → unmask
//! cycle, and independent sessions never collide.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::classify::looks_like_personal_name;
use crate::core::table::Table;

/// Prefix of every pseudonymous token.
pub const TOKEN_PREFIX: &str = "Person_";

/// One token↔name association recorded during a masking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskPair {
    pub token: String,
    pub name: String,
}

/// Session-scoped masking state: the token↔name map plus the token
/// counter. Cleared at the start of every masking pass; tokens are never
/// reused within one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingSession {
    pairs: Vec<MaskPair>,
    counter: u32,
}

impl Default for MaskingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskingSession {
    pub fn new() -> Self {
        MaskingSession {
            pairs: Vec::new(),
            counter: 1,
        }
    }

    /// Discard all pairs and restart the token counter at 1.
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.counter = 1;
    }

    /// Record a token↔name pair.
    pub fn set(&mut self, token: impl Into<String>, name: impl Into<String>) {
        self.pairs.push(MaskPair {
            token: token.into(),
            name: name.into(),
        });
    }

    /// Mint the next `Person_<N>` token, advancing the counter.
    pub fn next_token(&mut self) -> String {
        let token = format!("{}{}", TOKEN_PREFIX, self.counter);
        self.counter += 1;
        token
    }

    /// All recorded pairs, in assignment order.
    pub fn pairs(&self) -> &[MaskPair] {
        &self.pairs
    }

    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Look up the original name behind a token.
    pub fn name_for(&self, token: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.token == token)
            .map(|p| p.name.as_str())
    }

    /// Look up the token assigned to a name.
    pub fn token_for(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.token.as_str())
    }

    /// Load a session previously written with [`MaskingSession::save`].
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the session as JSON so a later process can unmask.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }
}

/// Mask a canonical table: column 0 holds names, column 2 the comment
/// text to scan. The session is reset first; the header row passes
/// through unmodified.
///
/// Name cells matching the personal-name predicate become the next token.
/// Comment cells get every *already-masked* name replaced by its token,
/// so a row's own name is substituted in its own comment.
pub fn mask(table: &Table, session: &mut MaskingSession) -> Table {
    session.reset();
    if table.len() < 2 {
        return table.clone();
    }

    let mut rows = Vec::with_capacity(table.len());
    rows.push(table.rows[0].clone());

    for row in table.data_rows() {
        let masked_row = row
            .iter()
            .enumerate()
            .map(|(col, cell)| match col {
                0 if looks_like_personal_name(cell) => {
                    let token = session.next_token();
                    session.set(token.clone(), cell.clone());
                    token
                }
                2 => mask_names_in_text(cell, session),
                _ => cell.clone(),
            })
            .collect();
        rows.push(masked_row);
    }

    Table { rows }
}

/// Replace every whole-word occurrence of each masked name with its token.
fn mask_names_in_text(text: &str, session: &MaskingSession) -> String {
    let mut masked = text.to_string();
    for pair in session.pairs() {
        if pair.name.is_empty() {
            continue;
        }
        masked = replace_name(&masked, &pair.name, &pair.token);
    }
    masked
}

static ASCII_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z_ .\-]+$").unwrap());

/// Substitute `name` with `replacement` throughout `text`.
///
/// JavaScript's `\b` is ASCII-only, and this port keeps that reading:
/// ASCII names are matched with ASCII word boundaries, while names
/// containing CJK or other non-ASCII characters are replaced by plain
/// substring matching. The lenient branch is what masks 田中太郎 inside
/// 「田中太郎は優秀」, where no engine places a word boundary.
pub(crate) fn replace_name(text: &str, name: &str, replacement: &str) -> String {
    if ASCII_WORD.is_match(name) {
        // (?-u:\b) is the ASCII word boundary; the name itself is escaped
        let pattern = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(name));
        let re = Regex::new(&pattern).expect("escaped literal pattern");
        re.replace_all(text, regex::NoExpand(replacement)).into_owned()
    } else {
        text.replace(name, replacement)
    }
}
