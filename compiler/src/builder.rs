//! Lowers a parsed pattern into its automaton.
//!
//! Construction is a recursive walk of the AST with one constructor per node
//! category, all sharing the pattern's range partition. Composite
//! constructors absorb their operands, renaming the absorbed state ids into
//! the growing automaton's id space. Groups and lookaround assertions
//! compress into single functional states owning automata compiled from
//! their inner pattern text with partitions of their own.
//!
//! After the walk a fresh common state is appended behind the accept state
//! so that a functional state can never be the accept: configuration
//! finalisation only has to look for one ordinary state.

use log::debug;
use thiserror::Error;

use rangex_runtime::{
    AssertionKind, AssertionMatcher, Automaton, Encoding, EscapeMatcher, Functional,
    RangePartition, StateId,
};

use crate::alphabet;
use crate::ast::AstNode;
use crate::class;
use crate::lexer::TokenKind;
use crate::parser;
use crate::quantifier::{self, QuantifierError};

/// Faults surfaced from compilation. Everything else malformed degrades to
/// the automaton that accepts nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Quantifier(#[from] QuantifierError),
}

/// Compiles a pattern into an automaton under the given encoding.
///
/// # Example
///
/// ```
/// use rangex_compiler::build;
/// use rangex_runtime::{Encoding, StepLimit};
///
/// let automaton = build("a|b", Encoding::Ascii).unwrap();
/// let input: Vec<char> = "b".chars().collect();
///
/// let found = automaton
///     .next_match(&input, 0, 1, StepLimit::UNBOUNDED)
///     .unwrap();
/// assert_eq!(1, found.end);
/// ```
pub fn build(pattern: &str, encoding: Encoding) -> Result<Automaton, CompileError> {
    let partition = alphabet::literal_partition(pattern, encoding);

    let mut automaton = match parser::parse(pattern) {
        Some(ast) => from_ast(&ast, &partition, encoding)?,
        None => Automaton::with_partition(partition),
    };

    // guarantee a common accept state behind a trailing empty edge
    if let Some(endpoints) = automaton.endpoints() {
        let fresh = automaton.add_state();
        automaton.add_empty_edge(endpoints.accept, fresh);
        automaton.set_endpoints(endpoints.start, fresh);
    }

    debug!(
        "compiled `{}` into {} states over {} boundary points",
        pattern,
        automaton.state_count(),
        automaton.partition().bounds().len()
    );

    Ok(automaton)
}

fn from_ast(
    node: &AstNode,
    partition: &RangePartition,
    encoding: Encoding,
) -> Result<Automaton, CompileError> {
    match node.kind() {
        TokenKind::Char => Ok(character(node.text(), partition)),
        TokenKind::Concat => {
            let left = child(node.left(), partition, encoding)?;
            let right = child(node.right(), partition, encoding)?;
            Ok(concatenate(left, right, partition))
        }
        TokenKind::Alternation => {
            let left = child(node.left(), partition, encoding)?;
            let right = child(node.right(), partition, encoding)?;
            Ok(alternate(left, right))
        }
        TokenKind::Quantifier => quantified(node, partition, encoding),
        TokenKind::Group => group(node.text(), partition, encoding),
        TokenKind::Assertion => assertion(node.text(), partition, encoding),
        TokenKind::Error => Ok(Automaton::with_partition(partition.clone())),
    }
}

fn child(
    node: Option<&AstNode>,
    partition: &RangePartition,
    encoding: Encoding,
) -> Result<Automaton, CompileError> {
    match node {
        Some(inner) => from_ast(inner, partition, encoding),
        None => Ok(Automaton::with_partition(partition.clone())),
    }
}

/// A character atom: a range edge for a plain literal, a single functional
/// state for `.`, `[…]` and escapes.
fn character(text: &str, partition: &RangePartition) -> Automaton {
    let mut automaton = Automaton::with_partition(partition.clone());
    let mut chars = text.chars();
    let (first, second) = (chars.next(), chars.next());

    match (first, second) {
        (Some('.'), None) => {
            let state = automaton.add_state();
            automaton.attach(state, Functional::Escape(EscapeMatcher::AnyNonTerminator));
            automaton.set_endpoints(state, state);
        }
        (Some(literal), None) => {
            let start = automaton.add_state();
            let accept = automaton.add_state();
            if let Some(label) = partition.locate(literal) {
                automaton.add_edge(start, label, accept);
            }
            automaton.set_endpoints(start, accept);
        }
        (Some('['), Some(_)) => {
            let state = automaton.add_state();
            automaton.attach(state, Functional::Class(class::parse_class(text)));
            automaton.set_endpoints(state, state);
        }
        (Some(_), Some(_)) => {
            let state = automaton.add_state();
            automaton.attach(state, Functional::Escape(EscapeMatcher::parse(text)));
            automaton.set_endpoints(state, state);
        }
        (None, _) => {}
    }

    automaton
}

fn concatenate(mut left: Automaton, right: Automaton, partition: &RangePartition) -> Automaton {
    let (Some(left_ends), Some(right_ends)) = (left.endpoints(), right.endpoints()) else {
        return Automaton::with_partition(partition.clone());
    };

    let offset = left.absorb(right);
    left.add_empty_edge(left_ends.accept, right_ends.start + offset);
    left.set_endpoints(left_ends.start, right_ends.accept + offset);
    left
}

fn alternate(mut left: Automaton, right: Automaton) -> Automaton {
    let Some(left_ends) = left.endpoints() else {
        return right;
    };
    let Some(right_ends) = right.endpoints() else {
        return left;
    };

    let offset = left.absorb(right);

    let start = left.add_state();
    left.add_empty_edge(start, left_ends.start);
    left.add_empty_edge(start, right_ends.start + offset);

    let accept = left.add_state();
    left.add_empty_edge(left_ends.accept, accept);
    left.add_empty_edge(right_ends.accept + offset, accept);

    left.set_endpoints(start, accept);
    left
}

/// Quantifier expansion. The first `min - 1` copies are plain
/// concatenations; copies `min..=max` each reach a single final accept by an
/// empty edge. An unbounded upper bound appends one copy whose accept loops
/// back to its own start, keeping the graph finite. A zero minimum adds a
/// bypass edge from the overall start to the final accept.
fn quantified(
    node: &AstNode,
    partition: &RangePartition,
    encoding: Encoding,
) -> Result<Automaton, CompileError> {
    let repetition = quantifier::parse_repetition(node.text())?;
    let prototype = child(node.left(), partition, encoding)?;

    let mut automaton = Automaton::with_partition(partition.clone());
    let seed = automaton.add_state();
    automaton.set_endpoints(seed, seed);

    if prototype.is_empty() {
        return Ok(if repetition.min == 0 {
            automaton
        } else {
            Automaton::with_partition(partition.clone())
        });
    }

    let mut copies = 1;
    while copies < repetition.min {
        append_copy(&mut automaton, &prototype);
        copies += 1;
    }

    let final_accept = automaton.add_state();
    match repetition.max {
        None => {
            if let Some((copy_start, copy_accept)) = append_copy(&mut automaton, &prototype) {
                automaton.add_empty_edge(copy_accept, copy_start);
                automaton.add_empty_edge(copy_accept, final_accept);
            }
        }
        Some(max) => {
            while copies <= max {
                if let Some((_, copy_accept)) = append_copy(&mut automaton, &prototype) {
                    automaton.add_empty_edge(copy_accept, final_accept);
                }
                copies += 1;
            }
        }
    }

    let start = automaton.endpoints().map_or(seed, |ends| ends.start);
    automaton.set_endpoints(start, final_accept);
    if repetition.min == 0 {
        automaton.add_empty_edge(start, final_accept);
    }

    Ok(automaton)
}

/// Concatenates one fresh copy of the prototype onto the automaton's accept,
/// returning the copy's renamed endpoints.
fn append_copy(automaton: &mut Automaton, prototype: &Automaton) -> Option<(StateId, StateId)> {
    let current = automaton.endpoints()?;
    let proto_ends = prototype.endpoints()?;

    let offset = automaton.absorb(prototype.clone());
    automaton.add_empty_edge(current.accept, proto_ends.start + offset);
    automaton.set_endpoints(current.start, proto_ends.accept + offset);

    Some((proto_ends.start + offset, proto_ends.accept + offset))
}

/// A capturing group: one functional state owning the automaton compiled
/// from the inner pattern. The nested automaton builds its own partition
/// from its own text.
fn group(
    interior: &str,
    partition: &RangePartition,
    encoding: Encoding,
) -> Result<Automaton, CompileError> {
    let nested = build(interior, encoding)?;

    let mut automaton = Automaton::with_partition(partition.clone());
    let state = automaton.add_state();
    automaton.attach(state, Functional::Group(Box::new(nested)));
    automaton.set_endpoints(state, state);
    Ok(automaton)
}

/// An assertion: one functional state. Lookaheads own an automaton compiled
/// from their body; lookbehind carries no evaluator and compiles to the
/// automaton that accepts nothing.
fn assertion(
    text: &str,
    partition: &RangePartition,
    encoding: Encoding,
) -> Result<Automaton, CompileError> {
    let matcher = if let Some(interior) = text.strip_prefix("(?=") {
        AssertionMatcher::lookahead(
            AssertionKind::PositiveLookahead,
            build(&interior[..interior.len() - 1], encoding)?,
        )
    } else if let Some(interior) = text.strip_prefix("(?!") {
        AssertionMatcher::lookahead(
            AssertionKind::NegativeLookahead,
            build(&interior[..interior.len() - 1], encoding)?,
        )
    } else {
        let kind = match text {
            "^" => AssertionKind::LineBegin,
            "$" => AssertionKind::LineEnd,
            "\\b" => AssertionKind::WordBoundary,
            "\\B" => AssertionKind::NotWordBoundary,
            _ => return Ok(Automaton::with_partition(partition.clone())),
        };
        AssertionMatcher::positional(kind)
    };

    let mut automaton = Automaton::with_partition(partition.clone());
    let state = automaton.add_state();
    automaton.attach(state, Functional::Assertion(matcher));
    automaton.set_endpoints(state, state);
    Ok(automaton)
}
