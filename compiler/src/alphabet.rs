//! Derives the range partition from a pattern's literal characters.
//!
//! Every single-character atom gets a unit range of its own so that a
//! character state needs exactly one outgoing edge; all other characters
//! share the leftover ranges between literals. Escapes and `[…]` classes
//! are excluded because their dedicated sub-matchers never consult the
//! partition. Non-capturing group interiors share the enclosing pattern's
//! automaton, so they are scanned recursively; capturing groups and
//! lookaround bodies compile to nested automata with partitions of their
//! own.

use std::collections::BTreeSet;

use rangex_runtime::{Encoding, RangePartition};

use crate::lexer::{classify, Cursor, TokenKind};

/// Builds the partition for a pattern under the given encoding.
pub fn literal_partition(pattern: &str, encoding: Encoding) -> RangePartition {
    let mut literals = BTreeSet::new();
    collect_literals(pattern, &mut literals);
    RangePartition::new(encoding, literals)
}

fn collect_literals(pattern: &str, literals: &mut BTreeSet<char>) {
    let mut cursor = Cursor::new(pattern);
    while let Some(token) = cursor.next_token() {
        match classify(token) {
            TokenKind::Char => {
                let mut chars = token.chars();
                if let (Some(literal), None) = (chars.next(), chars.next()) {
                    if literal != '.' {
                        literals.insert(literal);
                    }
                }
            }
            TokenKind::Group => {
                if let Some(interior) = token.strip_prefix("(?:") {
                    collect_literals(&interior[..interior.len() - 1], literals);
                }
            }
            _ => {}
        }
    }
}
