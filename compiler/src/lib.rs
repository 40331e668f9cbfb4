//! Compilation of a regex pattern into a runnable range-partitioned
//! automaton, plus the pattern handle wrapping it.
//!
//! The pipeline: the [`lexer`] segments the source into atomic lexemes, the
//! [`parser`] shunts them into a binary AST with implicit concatenation, the
//! [`alphabet`] pass partitions the code-point space around the pattern's
//! literals, and the [`builder`] lowers the AST into a
//! [`rangex_runtime::Automaton`] evaluated by the runtime crate's simulator.
//!
//! # Example
//!
//! ```rust
//! use rangex_compiler::Regex;
//!
//! let re = Regex::new("[a-c]{2,4}").unwrap();
//!
//! // `search` reports the first position admitting a match; the match at
//! // that position is the longest one.
//! let found = re.search("zzabcabd").unwrap();
//! assert_eq!(2..6, found.span);
//!
//! // `matches` requires the whole input to be consumed.
//! assert!(re.matches("abca").is_some());
//! assert!(re.matches("abcab").is_none());
//! ```

pub mod alphabet;
pub mod ast;
pub mod builder;
pub mod class;
pub mod lexer;
pub mod parser;
pub mod quantifier;
pub mod regex;

pub use builder::{build, CompileError};
pub use parser::parse;
pub use regex::{Regex, RegexMatch};
