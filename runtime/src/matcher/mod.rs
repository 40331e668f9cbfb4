//! Evaluators for functional states: zero-width assertions, single escape
//! atoms (including back-references), and `[…]` character classes.
//!
//! Each evaluator is parsed once at automaton construction and consulted by
//! the simulator whenever a configuration sits on the owning state.

use crate::automaton::Automaton;
use crate::simulator::{CaptureTrace, StepLimit};

fn is_line_terminator(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The condition evaluated by an assertion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    LineBegin,
    LineEnd,
    WordBoundary,
    NotWordBoundary,
    PositiveLookahead,
    NegativeLookahead,
}

/// A zero-width matching condition. Lookahead variants own the automaton
/// compiled from their body and run it from the asserted position without
/// advancing the outer simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionMatcher {
    kind: AssertionKind,
    lookahead: Option<Box<Automaton>>,
}

impl AssertionMatcher {
    /// A position predicate with no nested automaton (`^`, `$`, `\b`, `\B`).
    pub fn positional(kind: AssertionKind) -> Self {
        Self {
            kind,
            lookahead: None,
        }
    }

    /// A lookahead assertion owning the automaton for its body.
    pub fn lookahead(kind: AssertionKind, body: Automaton) -> Self {
        Self {
            kind,
            lookahead: Some(Box::new(body)),
        }
    }

    pub fn kind(&self) -> AssertionKind {
        self.kind
    }

    /// Evaluates the assertion at `pos` within the simulated span
    /// `[begin, end)` of `input`. Word-boundary checks treat both endpoints
    /// as non-word.
    pub fn holds(
        &self,
        input: &[char],
        begin: usize,
        end: usize,
        pos: usize,
        limit: StepLimit,
    ) -> bool {
        match self.kind {
            AssertionKind::LineBegin => {
                pos == begin
                    || pos
                        .checked_sub(1)
                        .is_some_and(|previous| is_line_terminator(input[previous]))
            }
            AssertionKind::LineEnd => pos == end || is_line_terminator(input[pos]),
            AssertionKind::WordBoundary => word_boundary(input, begin, end, pos),
            AssertionKind::NotWordBoundary => !word_boundary(input, begin, end, pos),
            AssertionKind::PositiveLookahead => self.lookahead_matches(input, pos, end, limit),
            AssertionKind::NegativeLookahead => !self.lookahead_matches(input, pos, end, limit),
        }
    }

    fn lookahead_matches(&self, input: &[char], pos: usize, end: usize, limit: StepLimit) -> bool {
        self.lookahead
            .as_ref()
            .is_some_and(|body| body.next_match(input, pos, end, limit).is_some())
    }
}

fn word_boundary(input: &[char], begin: usize, end: usize, pos: usize) -> bool {
    if pos == begin {
        pos < end && is_word(input[pos])
    } else if pos == end {
        is_word(input[pos - 1])
    } else {
        is_word(input[pos]) != is_word(input[pos - 1])
    }
}

/// A single-atom matcher for escape sequences and the `.` wildcard.
///
/// Parsed from the raw lexeme once; evaluation answers whether the input at
/// a position begins with the atom and returns the advanced position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeMatcher {
    /// `.`: any character except `\n` and `\r`.
    AnyNonTerminator,
    /// `\d` / `\D`.
    Digit,
    NotDigit,
    /// `\s` / `\S`.
    Whitespace,
    NotWhitespace,
    /// `\w` / `\W`, where a word character is `[A-Za-z0-9_]`.
    Word,
    NotWord,
    /// A resolved control character (`\t`, `\n`, `\v`, `\f`, `\0`, `\cX`).
    Control(char),
    /// `\<digits>`: a 1-based reference to a completed capture.
    Backreference(usize),
    /// Any other escaped character matches itself.
    Literal(char),
}

impl EscapeMatcher {
    /// Parses an escape (or `.`) lexeme into its matcher. Unrecognised input
    /// degrades to a literal of the escaped character.
    pub fn parse(text: &str) -> Self {
        let mut chars = text.chars();
        let first = chars.next();

        if first == Some('.') && chars.clone().next().is_none() {
            return Self::AnyNonTerminator;
        }

        let Some('\\') = first else {
            return first.map_or(Self::Literal('\\'), Self::Literal);
        };

        let Some(designator) = chars.next() else {
            return Self::Literal('\\');
        };
        let rest = chars.as_str();

        match designator {
            'd' => Self::Digit,
            'D' => Self::NotDigit,
            's' => Self::Whitespace,
            'S' => Self::NotWhitespace,
            'w' => Self::Word,
            'W' => Self::NotWord,
            't' => Self::Control('\t'),
            'n' => Self::Control('\n'),
            'v' => Self::Control('\u{b}'),
            'f' => Self::Control('\u{c}'),
            '0' if rest.is_empty() => Self::Control('\0'),
            'x' | 'u' => u32::from_str_radix(rest, 16)
                .ok()
                .and_then(char::from_u32)
                .map_or(Self::Literal(designator), Self::Literal),
            'c' => rest
                .chars()
                .next()
                .and_then(|control| char::from_u32(control as u32 % 32))
                .map_or(Self::Literal(designator), Self::Control),
            digit if digit.is_ascii_digit() => {
                let digits: String = std::iter::once(digit).chain(rest.chars()).collect();
                digits
                    .parse()
                    .map_or(Self::Literal(designator), Self::Backreference)
            }
            other => Self::Literal(other),
        }
    }

    /// Attempts the atom at `pos`; `Some` carries the advanced position.
    /// Back-references compare the input against the referenced capture and
    /// fail when the group has not completed a capture yet.
    pub fn advance(
        &self,
        input: &[char],
        pos: usize,
        end: usize,
        trace: &CaptureTrace,
    ) -> Option<usize> {
        if pos >= end {
            return None;
        }
        let current = input[pos];

        let single = match self {
            Self::AnyNonTerminator => !is_line_terminator(current),
            Self::Digit => current.is_ascii_digit(),
            Self::NotDigit => !current.is_ascii_digit(),
            Self::Whitespace => current.is_whitespace(),
            Self::NotWhitespace => !current.is_whitespace(),
            Self::Word => is_word(current),
            Self::NotWord => !is_word(current),
            Self::Control(c) | Self::Literal(c) => current == *c,
            Self::Backreference(index) => {
                let &(capture_begin, capture_end) = trace.get(index.checked_sub(1)?)?;
                let length = capture_end - capture_begin;
                if pos + length > end
                    || input[pos..pos + length] != input[capture_begin..capture_end]
                {
                    return None;
                }
                return Some(pos + length);
            }
        };

        single.then_some(pos + 1)
    }
}

/// A `[…]` character-class matcher: literal ranges, embedded escape atoms,
/// and an optional `[^` negation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatcher {
    ranges: Vec<(char, char)>,
    escapes: Vec<EscapeMatcher>,
    negated: bool,
}

impl ClassMatcher {
    pub fn new(ranges: Vec<(char, char)>, escapes: Vec<EscapeMatcher>, negated: bool) -> Self {
        Self {
            ranges,
            escapes,
            negated,
        }
    }

    /// Attempts the class at `pos`, consuming exactly one character on
    /// success.
    pub fn advance(
        &self,
        input: &[char],
        pos: usize,
        end: usize,
        trace: &CaptureTrace,
    ) -> Option<usize> {
        if pos >= end {
            return None;
        }
        let current = input[pos];

        let hit = self
            .ranges
            .iter()
            .any(|&(lo, hi)| lo <= current && current <= hi)
            || self
                .escapes
                .iter()
                .any(|escape| escape.advance(input, pos, end, trace).is_some());

        (hit != self.negated).then_some(pos + 1)
    }
}
