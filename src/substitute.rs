//! Escape-aware token substitution.
//!
//! Every token spelling in a [`TokenTable`] is replaced by its value, except where the token is
//! written with a leading backslash: `\$public_ipv4` comes out as the literal `$public_ipv4`.
//! All tokens are located in one left-to-right scan; where one spelling is a prefix of another
//! (`$iface_eth0_ipv4` / `$iface_eth0_ipv4_1`) the longest one wins. Inserted values are copied
//! verbatim and never scanned again.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::environment::TokenTable;

const ESCAPE: char = '\\';

/// A token table compiled for repeated substitution.
#[derive(Debug, Clone)]
pub struct Substituter {
    tokens: Vec<String>,
    values: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl Substituter {
    pub fn new(table: &TokenTable) -> Self {
        let (tokens, values): (Vec<String>, Vec<String>) = table
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .map(|(token, entry)| (token.clone(), entry.value.clone()))
            .unzip();
        let matcher = if tokens.is_empty() {
            None
        } else {
            Some(
                AhoCorasickBuilder::new()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(&tokens),
            )
        };
        Self {
            tokens,
            values,
            matcher,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return text.to_string();
        };

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        for m in matcher.find_iter(text) {
            // Only text between matches can carry an escape; the tail of a previous match cannot.
            let gap = &text[copied..m.start()];
            match gap.strip_suffix(ESCAPE) {
                Some(before) => {
                    out.push_str(before);
                    out.push_str(&self.tokens[m.pattern()]);
                }
                None => {
                    out.push_str(gap);
                    out.push_str(&self.values[m.pattern()]);
                }
            }
            copied = m.end();
        }
        out.push_str(&text[copied..]);
        out
    }
}

/// One-shot substitution over `text` with `table`.
pub fn apply(table: &TokenTable, text: &str) -> String {
    Substituter::new(table).apply(text)
}
