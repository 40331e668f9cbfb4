//! Runtime half of the rangex engine: the range-partitioned automaton data
//! model and the set-at-a-time simulator that evaluates it against an input.
//!
//! The compiler crate lowers a pattern into an [`Automaton`]; this crate
//! owns everything needed to run one. States either consume a character
//! through their range-edge table or, when functional, consult an evaluator
//! from [`matcher`] — a zero-width assertion, a capturing group's nested
//! automaton, a `[…]` class, or a single escape atom.
//!
//! # Example
//!
//! ```
//! use rangex_runtime::{Automaton, Encoding, RangePartition, StepLimit};
//!
//! // A hand-assembled automaton for the literal `a`.
//! let partition = RangePartition::new(Encoding::Ascii, ['a']);
//! let label = partition.locate('a').unwrap();
//!
//! let mut automaton = Automaton::with_partition(partition);
//! let start = automaton.add_state();
//! let accept = automaton.add_state();
//! automaton.add_edge(start, label, accept);
//! automaton.set_endpoints(start, accept);
//!
//! let input: Vec<char> = "ab".chars().collect();
//! let found = automaton
//!     .next_match(&input, 0, input.len(), StepLimit::UNBOUNDED)
//!     .unwrap();
//! assert_eq!(1, found.end);
//! ```

pub mod automaton;
pub mod matcher;
pub mod simulator;

pub use automaton::{Automaton, Encoding, Endpoints, Functional, RangePartition, StateId};
pub use matcher::{AssertionKind, AssertionMatcher, ClassMatcher, EscapeMatcher};
pub use simulator::{CaptureTrace, MatchState, StepLimit};
