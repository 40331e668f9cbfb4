//! The automaton data model: a range-partitioned alphabet, dense integer
//! states with per-range edge tables, and functional payloads for states
//! that evaluate an auxiliary rule instead of consuming a character through
//! an edge.

use std::collections::{BTreeMap, BTreeSet};

use crate::matcher::{AssertionMatcher, ClassMatcher, EscapeMatcher};

/// Identifies a state within a single automaton. Ids are dense and local to
/// their automaton; merging two automata renames the absorbed operand's ids.
pub type StateId = usize;

/// Input alphabets recognised by the engine.
///
/// The encoding determines the maximum code point covered by the range
/// partition. Characters beyond the maximum reach no edge and fail every
/// character atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Code points up to `0x7F`.
    Ascii,
    /// Code points up to `0xF7BF_BFBF`.
    Utf8,
}

impl Encoding {
    /// Returns the largest code point representable under the encoding.
    pub fn max_code_point(&self) -> u32 {
        match self {
            Encoding::Ascii => 0x7F,
            Encoding::Utf8 => 0xF7BF_BFBF,
        }
    }
}

/// A sorted, disjoint decomposition of the code-point space used as the
/// edge-label alphabet.
///
/// Boundaries `b0 < b1 < … < bn` define ranges `[b_i, b_i+1)` labelled by
/// their index. `b0 = 0` and range 0 is reserved as the empty-transition
/// label; it never matches an input character. Every literal collected from
/// the pattern occupies a unit range of its own.
///
/// # Example
///
/// ```
/// use rangex_runtime::{Encoding, RangePartition};
///
/// let partition = RangePartition::new(Encoding::Ascii, ['a']);
/// let a = partition.locate('a').unwrap();
/// let b = partition.locate('b').unwrap();
///
/// assert_ne!(a, b);
/// assert_eq!(partition.locate('b'), partition.locate('c'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePartition {
    bounds: Vec<u32>,
}

impl RangePartition {
    /// The edge-label index reserved for empty transitions.
    pub const EMPTY_LABEL: usize = 0;

    /// Builds a partition from the literal characters of a pattern. The two
    /// reserved boundary pairs (the empty-transition range and the encoding
    /// maximum) are always present.
    pub fn new(encoding: Encoding, literals: impl IntoIterator<Item = char>) -> Self {
        let max = encoding.max_code_point();

        let mut bounds = BTreeSet::new();
        bounds.insert(0);
        bounds.insert(1);
        bounds.insert(max);
        bounds.insert(max + 1);

        for literal in literals {
            let code = literal as u32;
            if code > 0 && code <= max {
                bounds.insert(code);
                bounds.insert(code + 1);
            }
        }

        Self {
            bounds: bounds.into_iter().collect(),
        }
    }

    /// A partition carrying only the reserved boundaries: every non-reserved
    /// character shares one range.
    pub fn default_for(encoding: Encoding) -> Self {
        Self::new(encoding, std::iter::empty())
    }

    /// The number of edge-table cells a state requires under this partition.
    pub fn cells(&self) -> usize {
        self.bounds.len()
    }

    /// The sorted boundary points.
    pub fn bounds(&self) -> &[u32] {
        &self.bounds
    }

    /// Maps an input character to the label of the range containing it.
    /// Returns `None` for characters in the reserved empty-transition range
    /// or beyond the encoding maximum.
    pub fn locate(&self, c: char) -> Option<usize> {
        let code = c as u32;
        let following = self.bounds.partition_point(|&bound| bound <= code);
        let label = following.checked_sub(1)?;

        if label == Self::EMPTY_LABEL || label + 1 >= self.bounds.len() {
            None
        } else {
            Some(label)
        }
    }
}

/// The payload of a functional state: an auxiliary evaluator consulted by
/// the simulator instead of the state's edge table.
#[derive(Debug, Clone, PartialEq)]
pub enum Functional {
    /// A zero-width condition, possibly owning a lookahead automaton.
    Assertion(AssertionMatcher),
    /// A capturing sub-pattern owning its own automaton.
    Group(Box<Automaton>),
    /// A `[…]` character-class matcher.
    Class(ClassMatcher),
    /// A single escape atom, including back-references and `.`.
    Escape(EscapeMatcher),
}

/// The designated start and accept states of a non-empty automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub start: StateId,
    pub accept: StateId,
}

type EdgeRow = Vec<BTreeSet<StateId>>;

/// A nondeterministic finite automaton over a range-partitioned alphabet.
///
/// States are dense integers indexing per-range edge tables; cell 0 of every
/// row holds empty-edge successors. Functional states carry their evaluator
/// in a side table. An automaton with no endpoints is *empty*: it accepts
/// nothing, which is how malformed patterns degrade.
#[derive(Debug, Clone, PartialEq)]
pub struct Automaton {
    partition: RangePartition,
    edges: Vec<EdgeRow>,
    functional: BTreeMap<StateId, Functional>,
    endpoints: Option<Endpoints>,
}

impl Automaton {
    /// Creates an automaton with no states over the given partition. Until
    /// endpoints are assigned the automaton is empty.
    pub fn with_partition(partition: RangePartition) -> Self {
        Self {
            partition,
            edges: Vec::new(),
            functional: BTreeMap::new(),
            endpoints: None,
        }
    }

    /// An automaton that accepts nothing under the default partition.
    pub fn empty(encoding: Encoding) -> Self {
        Self::with_partition(RangePartition::default_for(encoding))
    }

    /// Returns `true` if the automaton accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_none()
    }

    pub fn endpoints(&self) -> Option<Endpoints> {
        self.endpoints
    }

    pub fn set_endpoints(&mut self, start: StateId, accept: StateId) {
        self.endpoints = Some(Endpoints { start, accept });
    }

    pub fn partition(&self) -> &RangePartition {
        &self.partition
    }

    /// The number of allocated states.
    pub fn state_count(&self) -> usize {
        self.edges.len()
    }

    /// Allocates a fresh state with an empty edge row and returns its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.edges.len();
        self.edges.push(vec![BTreeSet::new(); self.partition.cells()]);
        id
    }

    /// Adds an edge under the given range label. Out-of-range operands are
    /// ignored.
    pub fn add_edge(&mut self, from: StateId, label: usize, to: StateId) {
        if let Some(cell) = self.edges.get_mut(from).and_then(|row| row.get_mut(label)) {
            cell.insert(to);
        }
    }

    /// Adds an empty (non-consuming) edge.
    pub fn add_empty_edge(&mut self, from: StateId, to: StateId) {
        self.add_edge(from, RangePartition::EMPTY_LABEL, to);
    }

    /// Attaches a functional payload to a state, making it a functional
    /// state.
    pub fn attach(&mut self, state: StateId, payload: Functional) {
        self.functional.insert(state, payload);
    }

    /// The functional payload of a state, or `None` for common states.
    pub fn functional(&self, state: StateId) -> Option<&Functional> {
        self.functional.get(&state)
    }

    /// Successors of a state under a range label.
    pub fn successors(&self, state: StateId, label: usize) -> impl Iterator<Item = StateId> + '_ {
        self.edges
            .get(state)
            .and_then(|row| row.get(label))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns `true` if the state has at least one outgoing edge under a
    /// non-empty range label.
    pub fn has_consuming_edges(&self, state: StateId) -> bool {
        self.edges.get(state).is_some_and(|row| {
            row.iter()
                .skip(RangePartition::EMPTY_LABEL + 1)
                .any(|cell| !cell.is_empty())
        })
    }

    /// Absorbs another automaton built over the same partition, renaming its
    /// state ids into this automaton's id space. Returns the offset added to
    /// every absorbed id; the caller re-derives the operand's endpoints from
    /// it. The absorbed endpoints themselves are discarded.
    pub fn absorb(&mut self, other: Automaton) -> usize {
        debug_assert_eq!(self.partition, other.partition);

        let offset = self.edges.len();

        for row in other.edges {
            let remapped = row
                .into_iter()
                .map(|cell| cell.into_iter().map(|succ| succ + offset).collect())
                .collect();
            self.edges.push(remapped);
        }

        for (state, payload) in other.functional {
            self.functional.insert(state + offset, payload);
        }

        offset
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(Endpoints { start, accept }) = self.endpoints else {
            return writeln!(f, "(accepts nothing)");
        };

        writeln!(f, "start: {:04}, accept: {:04}", start, accept)?;
        for (id, row) in self.edges.iter().enumerate() {
            let category = match self.functional.get(&id) {
                Some(Functional::Assertion(_)) => "assertion",
                Some(Functional::Group(_)) => "group",
                Some(Functional::Class(_)) => "class",
                Some(Functional::Escape(_)) => "escape",
                None => "common",
            };
            write!(f, "{:04} [{}]", id, category)?;
            for (label, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    let targets = cell
                        .iter()
                        .map(|succ| format!("{:04}", succ))
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, " {}->{{{}}}", label, targets)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
