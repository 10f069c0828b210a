use crate::error_handling::Error::StructuralInvariantViolation;
use crate::error_handling::Result;
use crate::export::{ExportMap, StateNumbering, IS_TERMINATING_STATE_KEY, STARTING_STATE_KEY};
use crate::nfa::Nfa;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::Debug;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State(pub(crate) usize);

impl State {
    pub fn get_id(&self) -> usize {
        self.0
    }
}

// The transition function is partial: a symbol with no entry has no successor.
pub struct Dfa {
    start: State,
    alphabet: BTreeSet<char>,
    accept: Vec<bool>,
    transitions: Vec<BTreeMap<char, State>>, // from_state -> symbol -> to_state
    nfa_subsets: Vec<BTreeSet<crate::nfa::State>>, // NFA states each DFA state stands for
}

impl Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accept: Vec<State> = self
            .get_states()
            .into_iter()
            .filter(|s| self.is_accept_state(*s))
            .collect();
        write!(
            f,
            "DFA( start: {:?}, accept: {:?}, num_states: {}, transitions: {{\n",
            self.start,
            accept,
            self.transitions.len()
        )?;

        for (state_idx, transitions) in self.transitions.iter().enumerate() {
            if transitions.is_empty() {
                continue;
            }
            write!(f, "\t{:?}:\n", State(state_idx))?;
            for (symbol, to_state) in transitions {
                write!(f, "\t\t{:?} -> {:?}\n", symbol, to_state)?;
            }
        }

        write!(f, "}} )")
    }
}

impl Dfa {
    pub(crate) fn new(alphabet: BTreeSet<char>) -> Self {
        Dfa {
            start: State(0),
            alphabet,
            accept: Vec::new(),
            transitions: Vec::new(),
            nfa_subsets: Vec::new(),
        }
    }

    pub(crate) fn add_state(&mut self, nfa_subset: BTreeSet<crate::nfa::State>, is_accept: bool) -> State {
        let state = State(self.transitions.len());
        self.accept.push(is_accept);
        self.transitions.push(BTreeMap::new());
        self.nfa_subsets.push(nfa_subset);
        state
    }

    pub(crate) fn set_start(&mut self, start: State) {
        self.start = start;
    }

    pub(crate) fn add_transition(&mut self, from_state: State, symbol: char, to_state: State) {
        assert!(self.transitions.len() > from_state.0);
        assert!(self.transitions.len() > to_state.0);
        self.transitions[from_state.0].insert(symbol, to_state);
    }

    pub fn get_root(&self) -> State {
        self.start
    }

    pub fn get_alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn get_num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn get_states(&self) -> Vec<State> {
        (0..self.transitions.len()).map(State).collect()
    }

    pub fn is_accept_state(&self, state: State) -> bool {
        self.accept.get(state.0).copied().unwrap_or(false)
    }

    pub fn get_nfa_subset(&self, state: State) -> Option<&BTreeSet<crate::nfa::State>> {
        self.nfa_subsets.get(state.0)
    }

    pub fn get_next_state(&self, state: State, c: char) -> Option<State> {
        self.transitions.get(state.0)?.get(&c).copied()
    }

    pub fn get_transitions_from_state(&self, state: State) -> Result<&BTreeMap<char, State>> {
        self.transitions
            .get(state.0)
            .ok_or(StructuralInvariantViolation("DFA state has no transition table"))
    }

    pub fn get_num_transitions(&self) -> usize {
        self.transitions.iter().map(|t| t.len()).sum()
    }

    pub fn simulate(&self, input: &str) -> bool {
        let mut current_state = self.start;
        for symbol in input.chars() {
            match self.get_next_state(current_state, symbol) {
                Some(next_state) => current_state = next_state,
                // No successor: implicit reject
                None => return false,
            }
        }
        self.is_accept_state(current_state)
    }

    pub fn to_export(&self) -> Result<ExportMap> {
        let numbering = StateNumbering::discover(self.start, &self.get_states(), |state| {
            Ok(self
                .get_transitions_from_state(state)?
                .values()
                .copied()
                .collect())
        })?;

        let mut export = ExportMap::new();
        export.insert(
            STARTING_STATE_KEY.to_string(),
            numbering.id_of(&self.start)?.into(),
        );
        for state in numbering.states() {
            let mut entry = serde_json::Map::new();
            entry.insert(
                IS_TERMINATING_STATE_KEY.to_string(),
                self.is_accept_state(*state).into(),
            );
            for (symbol, to_state) in self.get_transitions_from_state(*state)? {
                entry.insert(symbol.to_string(), numbering.id_of(to_state)?.into());
            }
            export.insert(numbering.id_of(state)?, serde_json::Value::Object(entry));
        }
        Ok(export)
    }
}

impl Dfa {
    // Subset construction. DFA states are discovered breadth-first, so the start state is 0
    // and indices follow discovery order. An empty target subset produces no transition rather
    // than a sink state.
    pub fn from_nfa(nfa: &Nfa) -> Result<Dfa> {
        let alphabet = nfa.alphabet();
        let mut dfa = Dfa::new(alphabet.clone());

        let mut l_worklist: VecDeque<State> = VecDeque::new();
        let mut l_nfa_states_to_dfa_mapping: HashMap<BTreeSet<crate::nfa::State>, State> =
            HashMap::new();

        let start_epi_closure = nfa.epsilon_closure(&BTreeSet::from([nfa.get_start()]))?;
        let start_is_accept = start_epi_closure.contains(&nfa.get_accept());
        let start = dfa.add_state(start_epi_closure.clone(), start_is_accept);
        dfa.set_start(start);
        l_nfa_states_to_dfa_mapping.insert(start_epi_closure, start);
        l_worklist.push_back(start);

        while let Some(dfa_state) = l_worklist.pop_front() {
            let nfa_states = dfa
                .get_nfa_subset(dfa_state)
                .ok_or(StructuralInvariantViolation("DFA state has no NFA subset"))?
                .clone();

            for symbol in alphabet.iter() {
                let destination_nfa_states =
                    nfa.epsilon_closure(&nfa.move_on(&nfa_states, *symbol)?)?;
                if destination_nfa_states.is_empty() {
                    continue;
                }

                let destination_dfa_state =
                    match l_nfa_states_to_dfa_mapping.get(&destination_nfa_states) {
                        Some(state) => *state,
                        None => {
                            let is_accept = destination_nfa_states.contains(&nfa.get_accept());
                            let state = dfa.add_state(destination_nfa_states.clone(), is_accept);
                            l_nfa_states_to_dfa_mapping.insert(destination_nfa_states, state);
                            l_worklist.push_back(state);
                            state
                        }
                    };

                dfa.add_transition(dfa_state, *symbol, destination_dfa_state);
            }
        }

        Ok(dfa)
    }
}

pub struct DfaSimulator {
    dfa: Rc<Dfa>,
    current_state: Option<State>,
}

impl DfaSimulator {
    pub fn new(dfa: Rc<Dfa>) -> Self {
        DfaSimulator {
            current_state: Some(dfa.get_root()),
            dfa,
        }
    }

    pub fn reset_simulation(&mut self) {
        self.current_state = Some(self.dfa.get_root());
    }

    // Simulate the DFA with a single character.
    // Returns whether the new state is accepting and whether it is a valid state;
    // an invalid state means the DFA has reached a dead end and stays there until reset.
    pub fn simulate_single_char(&mut self, input: char) -> (bool, bool) {
        let next_state = match self.current_state {
            Some(state) => self.dfa.get_next_state(state, input),
            None => None,
        };
        self.current_state = next_state;

        match next_state {
            Some(state) => (self.dfa.is_accept_state(state), true),
            None => (false, false),
        }
    }
}
