use std::collections::BTreeSet;

use anyhow::Result;
use regex::Regex;

/// Flattens raw license fields into sets of candidate license identifiers.
///
/// Boolean structure is discarded: `AND`, `OR` and `WITH` all act as plain
/// separators and parentheses become blanks, so `(A OR B) AND C` yields
/// `{A, B, C}`. Keywords are case-sensitive and only recognised when
/// delimited by whitespace, a comma, or the ends of the string, so
/// identifiers such as `ORACLE` or `GPL-2.0-OR-later` stay intact.
pub struct LicenseExtractor {
    keyword: Regex,
}

impl LicenseExtractor {
    pub fn new() -> Result<Self> {
        let keyword = Regex::new(r"(^|[\s,])(?:AND|OR|WITH)([\s,]|$)")?;
        Ok(Self { keyword })
    }

    /// Extract the candidate tokens of a raw license field.
    pub fn extract(&self, raw: &str) -> BTreeSet<String> {
        let unquoted = strip_quotes(raw.trim());
        // A parenthesis still delimits a keyword, as in `MIT AND(ISC)`.
        let flat: String = unquoted
            .chars()
            .map(|c| if c == '(' || c == ')' { ' ' } else { c })
            .collect();

        // Adjacent keywords share a delimiter, so one pass can leave the
        // second one behind; every pass removes at least one keyword.
        let mut separated = flat;
        loop {
            let next = self.keyword.replace_all(&separated, "${1},${2}");
            if next == separated {
                break;
            }
            separated = next.into_owned();
        }

        separated
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Remove exactly one pair of enclosing double quotes.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].trim()
    } else {
        s
    }
}

/// True when parentheses in `raw` do not pair up. Such strings are still
/// extracted and matched, but get counted in the run diagnostics.
pub fn has_unbalanced_parens(raw: &str) -> bool {
    let mut depth: i64 = 0;
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    depth != 0
}
