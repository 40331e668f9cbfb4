//! Parsing of `[…]` lexemes into class matchers.
//!
//! A class body holds literal ranges (`a-z`), bare characters (degenerate
//! ranges), embedded escape atoms, the `.` wildcard, and an optional leading
//! `^` negation. The body is parsed once at automaton construction;
//! malformed remnants are tolerated and simply dropped, matching the
//! degrade-to-no-match posture of the rest of the pipeline.

use parcel::parsers::character::expect_character;
use parcel::prelude::v1::*;

use rangex_runtime::{ClassMatcher, EscapeMatcher};

enum ClassItem {
    Range(char, char),
    Single(char),
    Escape(EscapeMatcher),
}

/// Parses a `[…]` token (brackets included) into its matcher.
///
/// # Example
///
/// ```
/// use rangex_compiler::class::parse_class;
///
/// let class = parse_class("[a-c\\d]");
/// let input: Vec<char> = "b7x".chars().collect();
///
/// assert_eq!(Some(1), class.advance(&input, 0, 3, &Vec::new()));
/// assert_eq!(Some(2), class.advance(&input, 1, 3, &Vec::new()));
/// assert_eq!(None, class.advance(&input, 2, 3, &Vec::new()));
/// ```
pub fn parse_class(token: &str) -> ClassMatcher {
    let body = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(token);

    let input: Vec<(usize, char)> = body.chars().enumerate().collect();
    match class_body().parse(&input) {
        Ok(MatchStatus::Match { inner, .. }) => inner,
        _ => ClassMatcher::new(Vec::new(), Vec::new(), false),
    }
}

fn class_body<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ClassMatcher> {
    parcel::join(
        parcel::optional(expect_character('^')).map(|negation| negation.is_some()),
        parcel::zero_or_more(class_item()),
    )
    .map(|(negated, items)| {
        let mut ranges = Vec::new();
        let mut escapes = Vec::new();
        for item in items {
            match item {
                ClassItem::Range(lo, hi) => ranges.push((lo, hi)),
                ClassItem::Single(single) => ranges.push((single, single)),
                ClassItem::Escape(matcher) => escapes.push(matcher),
            }
        }
        ClassMatcher::new(ranges, escapes, negated)
    })
}

fn class_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ClassItem> {
    parcel::or(escape_item(), || {
        parcel::or(wildcard_item(), || {
            parcel::or(character_range(), || class_char().map(ClassItem::Single))
        })
    })
}

fn wildcard_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ClassItem> {
    expect_character('.').map(|_| ClassItem::Escape(EscapeMatcher::AnyNonTerminator))
}

fn character_range<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ClassItem> {
    parcel::join(
        class_char(),
        parcel::right(parcel::join(expect_character('-'), class_char())),
    )
    .map(|(lo, hi)| ClassItem::Range(lo, hi))
}

/// Any character other than an escape introducer.
fn class_char<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(pos, current)) if current != '\\' => Ok(MatchStatus::Match {
            span: pos..pos + 1,
            remainder: &input[1..],
            inner: current,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

/// A backslash and its atom, sliced with the same widths the tokenizer
/// uses: all consecutive digits, `u`/`x`/`c` with their fixed trails, or a
/// single escaped character.
fn escape_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ClassItem> {
    move |input: &'a [(usize, char)]| {
        let Some(&(start, '\\')) = input.first() else {
            return Ok(MatchStatus::NoMatch(input));
        };

        let digits = input[1..]
            .iter()
            .take_while(|(_, c)| c.is_ascii_digit())
            .count();
        let consumed = if digits > 0 {
            1 + digits
        } else {
            match input.get(1) {
                None => return Ok(MatchStatus::NoMatch(input)),
                Some(&(_, designator)) => {
                    let trailing = match designator {
                        'u' => 4,
                        'x' => 2,
                        'c' => 1,
                        _ => 0,
                    };
                    if input.len() < 2 + trailing {
                        return Ok(MatchStatus::NoMatch(input));
                    }
                    2 + trailing
                }
            }
        };

        let text: String = input[..consumed].iter().map(|&(_, c)| c).collect();
        Ok(MatchStatus::Match {
            span: start..start + consumed,
            remainder: &input[consumed..],
            inner: ClassItem::Escape(EscapeMatcher::parse(&text)),
        })
    }
}
