//! Tokenization and text normalization
//!
//! Every string the engine compares goes through [`tokenize`]: lowercase,
//! accent-folded, alphanumeric runs. Apostrophes inside words are dropped
//! rather than splitting the word; any other punctuation or whitespace is
//! a separator.

use smallvec::SmallVec;
use std::str::Chars;
use unicode_normalization::char::{decompose_compatible, is_combining_mark};

/// Token buffer sized for typical item names
pub type TokenVec = SmallVec<[String; 8]>;

#[inline]
fn is_elided(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '`')
}

/// Push the lowercase, accent-free form of `c` onto `out`.
#[inline]
fn fold_into(c: char, out: &mut String) {
    if c.is_ascii() {
        out.push(c.to_ascii_lowercase());
        return;
    }
    decompose_compatible(c, |d| {
        if !is_combining_mark(d) {
            out.extend(d.to_lowercase());
        }
    });
}

/// Lazy token sequence over a borrowed string.
///
/// Cheap to clone; a clone taken before iterating replays the sequence
/// from the start.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    chars: Chars<'a>,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut token = String::new();
        for c in self.chars.by_ref() {
            if c.is_alphanumeric() {
                fold_into(c, &mut token);
            } else if is_combining_mark(c) || (is_elided(c) && !token.is_empty()) {
                continue;
            } else if !token.is_empty() {
                return Some(token);
            }
        }
        (!token.is_empty()).then_some(token)
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

/// Split `text` into normalized tokens.
///
/// ```
/// use stocksearch::algorithms::normalize::tokenize;
///
/// let tokens: Vec<String> = tokenize("  Hex-Bolt, 3/8\" (Zinc) don't ").collect();
/// assert_eq!(tokens, ["hex", "bolt", "3", "8", "zinc", "dont"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { chars: text.chars() }
}

/// Collect tokens into a small vector.
#[must_use]
pub fn tokenize_vec(text: &str) -> TokenVec {
    tokenize(text).collect()
}

/// Canonical single-spaced form used for exact comparison.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    join_tokens(tokenize(text))
}

/// Join tokens with single spaces.
pub fn join_tokens<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token.as_ref());
    }
    out
}
