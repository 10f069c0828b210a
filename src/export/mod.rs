//! Transport-neutral export of the automata.
//!
//! Every automaton exports to an ordered map: `"startingState"` names the start state, and each
//! remaining key is a state identifier mapping to `{"isTerminatingState": bool, <symbol>: ...}`.
//! NFA symbols (including `"epsilon"`) map to lists of identifiers, DFA symbols to a single one.
//! Identifiers are sequential integers in breadth-first discovery order from the start state.

use crate::error_handling::Error::{JsonSerializationError, StructuralInvariantViolation};
use crate::error_handling::Result;
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

pub type ExportMap = IndexMap<String, serde_json::Value>;

pub const STARTING_STATE_KEY: &str = "startingState";
pub const IS_TERMINATING_STATE_KEY: &str = "isTerminatingState";
pub const EPSILON_KEY: &str = "epsilon";

pub fn to_json_string(export: &ExportMap) -> Result<String> {
    serde_json::to_string_pretty(export).map_err(JsonSerializationError)
}

// Assigns export identifiers in discovery order. `successors` must list a state's targets in
// the order they should be discovered. States never reached from `start` are numbered after
// the reachable ones, in the order given by `all_states`.
pub(crate) struct StateNumbering<S> {
    ids: HashMap<S, usize>,
    order: Vec<S>,
}

impl<S: Copy + Eq + Hash> StateNumbering<S> {
    pub(crate) fn discover<F>(start: S, all_states: &[S], mut successors: F) -> Result<Self>
    where
        F: FnMut(S) -> Result<Vec<S>>,
    {
        let mut numbering = StateNumbering {
            ids: HashMap::new(),
            order: Vec::new(),
        };
        let mut worklist = VecDeque::new();
        let mut leftovers = all_states.iter();

        numbering.number(start);
        worklist.push_back(start);
        loop {
            while let Some(state) = worklist.pop_front() {
                for next in successors(state)? {
                    if numbering.number(next) {
                        worklist.push_back(next);
                    }
                }
            }
            match leftovers.find(|s| false == numbering.ids.contains_key(*s)) {
                Some(state) => {
                    numbering.number(*state);
                    worklist.push_back(*state);
                }
                None => break,
            }
        }
        Ok(numbering)
    }

    // Returns true if the state had not been numbered yet.
    fn number(&mut self, state: S) -> bool {
        if self.ids.contains_key(&state) {
            return false;
        }
        self.ids.insert(state, self.order.len());
        self.order.push(state);
        true
    }

    pub(crate) fn id_of(&self, state: &S) -> Result<String> {
        self.ids
            .get(state)
            .map(|id| id.to_string())
            .ok_or(StructuralInvariantViolation(
                "exported transition targets an unknown state",
            ))
    }

    pub(crate) fn states(&self) -> &[S] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_order() -> Result<()> {
        // 0 -> 2 -> 1, 3 unreachable
        let edges: HashMap<u32, Vec<u32>> =
            [(0, vec![2]), (2, vec![1, 0]), (1, vec![]), (3, vec![1])]
                .into_iter()
                .collect();
        let numbering =
            StateNumbering::discover(0u32, &[0, 1, 2, 3], |s| Ok(edges[&s].clone()))?;

        assert_eq!(numbering.states(), &[0, 2, 1, 3]);
        assert_eq!(numbering.id_of(&2)?, "1");
        assert_eq!(numbering.id_of(&3)?, "3");
        assert!(numbering.id_of(&9).is_err());
        Ok(())
    }

    #[test]
    fn test_json_rendering() -> Result<()> {
        let mut export = ExportMap::new();
        export.insert(STARTING_STATE_KEY.to_string(), "0".into());
        export.insert(
            "0".to_string(),
            serde_json::json!({ "isTerminatingState": true }),
        );
        let json = to_json_string(&export)?;
        assert_eq!(
            json,
            "{\n  \"startingState\": \"0\",\n  \"0\": {\n    \"isTerminatingState\": true\n  }\n}"
        );
        Ok(())
    }
}
