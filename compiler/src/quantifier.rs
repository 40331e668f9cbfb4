//! Parsing of quantifier lexemes into repetition bounds.
//!
//! `*`, `+` and `?` map directly; `{…}` bodies go through a combinator
//! parser. A trailing non-greedy marker is recognised and stripped — the
//! simulator always reports the longest match, so the marker carries no
//! weight downstream.
//!
//! Bound faults are the one class of pattern error that does not degrade to
//! an empty automaton: a non-numeric body or inverted bounds is a structural
//! violation surfaced to the caller at compile time.

use parcel::parsers::character::{digit, expect_character};
use parcel::prelude::v1::*;
use thiserror::Error;

/// Repetition bounds of a quantifier; `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repetition {
    pub min: usize,
    pub max: Option<usize>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantifierError {
    #[error("malformed quantifier `{0}`")]
    Malformed(String),
    #[error("quantifier `{0}` has inverted bounds")]
    InvertedBounds(String),
}

/// Parses a quantifier lexeme into its `(min, max)` bounds.
///
/// # Example
///
/// ```
/// use rangex_compiler::quantifier::{parse_repetition, Repetition};
///
/// assert_eq!(
///     Ok(Repetition { min: 2, max: None }),
///     parse_repetition("{2,}")
/// );
/// assert_eq!(
///     Ok(Repetition { min: 0, max: None }),
///     parse_repetition("*?")
/// );
/// ```
pub fn parse_repetition(text: &str) -> Result<Repetition, QuantifierError> {
    let bare = text
        .strip_suffix('?')
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(text);

    match bare {
        "*" => Ok(Repetition { min: 0, max: None }),
        "+" => Ok(Repetition { min: 1, max: None }),
        "?" => Ok(Repetition {
            min: 0,
            max: Some(1),
        }),
        braced if braced.starts_with('{') => {
            let input: Vec<(usize, char)> = braced.chars().enumerate().collect();
            let repetition = match braced_repetition().parse(&input) {
                Ok(MatchStatus::Match {
                    remainder, inner, ..
                }) if remainder.is_empty() => inner,
                _ => return Err(QuantifierError::Malformed(text.to_string())),
            };

            match repetition.max {
                Some(max) if max < repetition.min => {
                    Err(QuantifierError::InvertedBounds(text.to_string()))
                }
                _ => Ok(repetition),
            }
        }
        _ => Err(QuantifierError::Malformed(text.to_string())),
    }
}

/// `{n}`, `{n,}` or `{n,m}`.
fn braced_repetition<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], Repetition> {
    parcel::left(parcel::join(
        parcel::right(parcel::join(
            expect_character('{'),
            parcel::join(
                integer(),
                parcel::optional(parcel::right(parcel::join(
                    expect_character(','),
                    parcel::optional(integer()),
                ))),
            ),
        )),
        expect_character('}'),
    ))
    .map(|(min, upper)| match upper {
        None => Repetition {
            min,
            max: Some(min),
        },
        Some(None) => Repetition { min, max: None },
        Some(Some(max)) => Repetition {
            min,
            max: Some(max),
        },
    })
}

fn integer<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], usize> {
    parcel::one_or_more(digit(10)).map(|digits| {
        digits
            .into_iter()
            .filter_map(|c| c.to_digit(10))
            .fold(0usize, |acc, digit| acc * 10 + digit as usize)
    })
}
