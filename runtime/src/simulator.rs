//! Set-at-a-time simulation of a range-partitioned automaton.
//!
//! The engine tracks a map of configurations keyed by `(state, position)`
//! carrying the capture trace of the trajectory that reached them. Each
//! round advances every live configuration one step (or evaluates its
//! functional payload), closes over empty edges, and records the resulting
//! set in a history list. The longest match is the accept-state
//! configuration with the maximum position anywhere in that history.

use std::collections::{BTreeMap, BTreeSet};

use collections_ext::set::sparse::SparseSet;
use log::trace;

use crate::automaton::{Automaton, Functional, RangePartition, StateId};

/// The ordered sequence of sub-match spans accumulated along a trajectory.
/// Spans are half-open `(begin, end)` char-index pairs in completion order.
pub type CaptureTrace = Vec<(usize, usize)>;

type ConfigKey = (StateId, usize);
type ReachableStates = BTreeMap<ConfigKey, CaptureTrace>;

/// An optional bound on the number of simulation rounds per route.
///
/// Unbounded by default. Patterns that thread empty-width functional cycles
/// (for example a quantified bare assertion) can revisit the same
/// configuration forever; a round limit turns that into a bounded miss. The
/// limit is threaded into nested group and lookahead simulations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepLimit(Option<usize>);

impl StepLimit {
    /// No bound on simulation rounds.
    pub const UNBOUNDED: StepLimit = StepLimit(None);

    /// Bounds every route to at most `rounds` rounds.
    pub fn rounds(rounds: usize) -> Self {
        Self(Some(rounds))
    }

    fn reached(&self, round: usize) -> bool {
        self.0.is_some_and(|bound| round >= bound)
    }
}

/// An accepting configuration: the end position of the match and the capture
/// trace of the trajectory that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub end: usize,
    pub captures: CaptureTrace,
}

impl Automaton {
    /// Simulates the automaton over `input[begin..end)` anchored at `begin`
    /// and returns the longest match, or `None` when no trajectory reaches
    /// the accept state. An empty automaton never matches.
    pub fn next_match(
        &self,
        input: &[char],
        begin: usize,
        end: usize,
        limit: StepLimit,
    ) -> Option<MatchState> {
        let endpoints = self.endpoints()?;
        let history = self.route(input, begin, end, limit);

        let mut best: Option<(usize, &CaptureTrace)> = None;
        for states in &history {
            for (&(state, pos), captures) in states {
                if state == endpoints.accept && best.map_or(true, |(at, _)| pos >= at) {
                    best = Some((pos, captures));
                }
            }
        }

        best.map(|(pos, captures)| MatchState {
            end: pos,
            captures: captures.clone(),
        })
    }

    /// Group-mode simulation: every position at which an accepting
    /// configuration exists, not merely the longest.
    pub fn accepting_positions(
        &self,
        input: &[char],
        begin: usize,
        end: usize,
        limit: StepLimit,
    ) -> BTreeSet<usize> {
        let mut ends = BTreeSet::new();
        let Some(endpoints) = self.endpoints() else {
            return ends;
        };

        for states in &self.route(input, begin, end, limit) {
            for &(state, pos) in states.keys() {
                if state == endpoints.accept {
                    ends.insert(pos);
                }
            }
        }

        ends
    }

    /// Advances the reachable set round by round until it empties, returning
    /// the whole history. The initial set is the start configuration plus,
    /// when the start state is common, its empty-edge closure.
    fn route(
        &self,
        input: &[char],
        begin: usize,
        end: usize,
        limit: StepLimit,
    ) -> Vec<ReachableStates> {
        let Some(endpoints) = self.endpoints() else {
            return Vec::new();
        };

        let seed = (endpoints.start, begin);
        let mut current = ReachableStates::new();
        if self.functional(endpoints.start).is_none() {
            current = self.closure(seed, &CaptureTrace::new());
        }
        current.entry(seed).or_default();

        let mut history = vec![current];
        loop {
            let last = match history.last() {
                Some(states) if !states.is_empty() => states,
                _ => break,
            };
            if limit.reached(history.len()) {
                trace!("route stopped at the {}-round limit", history.len());
                break;
            }

            let mut next = ReachableStates::new();
            for (&key, captures) in last {
                for (produced_key, produced_captures) in
                    self.step(key, captures, input, begin, end, limit)
                {
                    next.entry(produced_key).or_insert(produced_captures);
                }
            }
            trace!(
                "round {}: {} live configurations",
                history.len(),
                next.len()
            );
            history.push(next);
        }

        if history.last().is_some_and(ReachableStates::is_empty) {
            history.pop();
        }
        history
    }

    /// Computes the successors of one configuration, dispatching on its
    /// state category, then closes over empty edges. The originating key is
    /// removed afterwards so functional states hand their position to their
    /// empty-edge successors rather than re-processing themselves; a group
    /// state is the exception in that its advanced copies survive and
    /// re-match on later rounds.
    fn step(
        &self,
        key: ConfigKey,
        captures: &CaptureTrace,
        input: &[char],
        begin: usize,
        end: usize,
        limit: StepLimit,
    ) -> ReachableStates {
        let (state, pos) = key;
        let mut produced = ReachableStates::new();
        let mut origin = key;

        match self.functional(state) {
            Some(Functional::Assertion(assertion)) => {
                if !assertion.holds(input, begin, end, pos, limit) {
                    return produced;
                }
                produced.insert(key, captures.clone());
            }
            Some(Functional::Group(nested)) => {
                for group_end in nested.accepting_positions(input, pos, end, limit) {
                    let mut extended = captures.clone();
                    extended.push((pos, group_end));
                    produced.entry((state, group_end)).or_insert(extended);
                }
            }
            Some(Functional::Class(class)) => {
                if let Some(advanced) = class.advance(input, pos, end, captures) {
                    origin = (state, advanced);
                    produced.insert(origin, captures.clone());
                }
            }
            Some(Functional::Escape(escape)) => {
                if let Some(advanced) = escape.advance(input, pos, end, captures) {
                    origin = (state, advanced);
                    produced.insert(origin, captures.clone());
                }
            }
            None => {
                if pos < end {
                    if let Some(label) = self.partition().locate(input[pos]) {
                        for successor in self.successors(state, label) {
                            produced.insert((successor, pos + 1), captures.clone());
                        }
                    }
                }
            }
        }

        let mut from_empty = ReachableStates::new();
        for (&produced_key, produced_captures) in &produced {
            for (closure_key, closure_captures) in self.closure(produced_key, produced_captures) {
                from_empty.entry(closure_key).or_insert(closure_captures);
            }
        }

        produced.remove(&origin);
        for (closure_key, closure_captures) in from_empty {
            produced.entry(closure_key).or_insert(closure_captures);
        }

        produced
    }

    /// Every configuration reachable from `key` through empty edges alone,
    /// excluding `key` itself. Common states are expanded transitively;
    /// functional states are collected as sinks to be evaluated next round.
    fn closure(&self, key: ConfigKey, captures: &CaptureTrace) -> ReachableStates {
        let (state, pos) = key;

        let mut common = vec![state];
        let mut visited = SparseSet::new(self.state_count());
        visited.insert(state);
        let mut functional = BTreeSet::new();

        let mut index = 0;
        while index < common.len() {
            for successor in self.successors(common[index], RangePartition::EMPTY_LABEL) {
                if self.functional(successor).is_some() {
                    functional.insert(successor);
                } else if !visited.contains(&successor) {
                    visited.insert(successor);
                    common.push(successor);
                }
            }
            index += 1;
        }

        let mut reachable = ReachableStates::new();
        for &reached in common.iter().skip(1) {
            reachable.insert((reached, pos), captures.clone());
        }
        for &sink in &functional {
            reachable
                .entry((sink, pos))
                .or_insert_with(|| captures.clone());
        }

        reachable
    }
}
