//! The user-facing pattern handle: compile once, then match or search.

use std::ops::Range;

use rangex_runtime::{Automaton, Encoding, MatchState, StepLimit};

use crate::builder::{self, CompileError};

/// A match: the overall span and the capture spans in completion order, all
/// as char indices into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexMatch {
    pub span: Range<usize>,
    pub captures: Vec<Range<usize>>,
}

/// A compiled pattern.
///
/// Construction only fails on quantifier bound faults; any other malformed
/// pattern compiles to a handle whose automaton accepts nothing, observable
/// through [`Regex::is_empty`].
///
/// # Example
///
/// ```
/// use rangex_compiler::Regex;
///
/// let re = Regex::new(r"(a*)bc\1").unwrap();
/// let found = re.search("xaabcaaa").unwrap();
///
/// assert_eq!(1..7, found.span);
/// assert_eq!(vec![1..3], found.captures);
/// ```
#[derive(Debug, Clone)]
pub struct Regex {
    automaton: Automaton,
    limit: StepLimit,
}

impl Regex {
    /// Compiles a pattern under the UTF-8 encoding.
    pub fn new(pattern: &str) -> Result<Self, CompileError> {
        Self::with_encoding(pattern, Encoding::Utf8)
    }

    /// Compiles a pattern under an explicit input encoding.
    pub fn with_encoding(pattern: &str, encoding: Encoding) -> Result<Self, CompileError> {
        Ok(Self {
            automaton: builder::build(pattern, encoding)?,
            limit: StepLimit::UNBOUNDED,
        })
    }

    /// Bounds the number of simulation rounds per match attempt, including
    /// nested group and lookahead simulations. Unbounded by default.
    #[must_use]
    pub fn with_step_limit(mut self, limit: StepLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Returns `true` if the compiled automaton accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.automaton.is_empty()
    }

    /// The compiled automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Matches the whole input: succeeds iff a simulation from the start
    /// reaches the accept state exactly at the input's end.
    pub fn matches(&self, input: &str) -> Option<RegexMatch> {
        let chars: Vec<char> = input.chars().collect();
        let end = chars.len();

        let found = self.automaton.next_match(&chars, 0, end, self.limit)?;
        (found.end == end).then(|| to_regex_match(0, found))
    }

    /// Searches the input left to right, reporting the first start position
    /// from which a match exists (the longest match at that position).
    pub fn search(&self, input: &str) -> Option<RegexMatch> {
        let chars: Vec<char> = input.chars().collect();
        let end = chars.len();

        (0..end).find_map(|start| {
            self.automaton
                .next_match(&chars, start, end, self.limit)
                .map(|found| to_regex_match(start, found))
        })
    }

    /// The longest match anchored at `start` (a char index), or `None` when
    /// no trajectory from there reaches the accept state.
    pub fn next_match(&self, input: &str, start: usize) -> Option<RegexMatch> {
        let chars: Vec<char> = input.chars().collect();
        if start > chars.len() {
            return None;
        }

        self.automaton
            .next_match(&chars, start, chars.len(), self.limit)
            .map(|found| to_regex_match(start, found))
    }
}

fn to_regex_match(start: usize, found: MatchState) -> RegexMatch {
    RegexMatch {
        span: start..found.end,
        captures: found
            .captures
            .into_iter()
            .map(|(begin, end)| begin..end)
            .collect(),
    }
}
