use crate::error_handling::Error::StructuralInvariantViolation;
use crate::error_handling::Result;
use crate::export::{
    ExportMap, StateNumbering, EPSILON_KEY, IS_TERMINATING_STATE_KEY, STARTING_STATE_KEY,
};
use crate::parser::AstNode;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State(usize);

impl State {
    pub fn get_id(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    from: State,
    to: State,
    symbol: Option<char>, // None for epsilon
}

impl Transition {
    pub fn get_from_state(&self) -> State {
        self.from
    }

    pub fn get_to_state(&self) -> State {
        self.to
    }

    pub fn get_symbol(&self) -> Option<char> {
        self.symbol
    }
}

impl Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.symbol {
            None => write!(f, "{:?} -> {:?}, symbol: epsilon", self.from, self.to),
            Some(c) => write!(f, "{:?} -> {:?}, symbol: {:?}", self.from, self.to, c),
        }
    }
}

// symbol (None = epsilon) -> destination states
pub type TransitionTable = BTreeMap<Option<char>, BTreeSet<State>>;

// Start and accept of a partially built automaton
#[derive(Clone, Copy)]
struct Fragment {
    start: State,
    accept: State,
}

pub struct Nfa {
    start: State,
    accept: State,
    transitions: Vec<TransitionTable>, // indexed by state id
}

impl Nfa {
    // Thompson construction. State ids come from the table length, so every fragment gets ids
    // no other fragment of this automaton uses.
    pub fn from_ast(ast: &AstNode) -> Self {
        let mut nfa = Nfa {
            start: State(0),
            accept: State(0),
            transitions: Vec::new(),
        };
        let fragment = nfa.add_ast_to_nfa(ast);
        nfa.start = fragment.start;
        nfa.accept = fragment.accept;
        nfa
    }

    fn add_ast_to_nfa(&mut self, ast: &AstNode) -> Fragment {
        match ast {
            AstNode::Literal(c) => {
                let fragment = self.new_fragment();
                self.add_transition(Transition {
                    from: fragment.start,
                    to: fragment.accept,
                    symbol: Some(*c),
                });
                fragment
            }
            AstNode::CharClass(chars) => {
                let fragment = self.new_fragment();
                for c in chars {
                    self.add_transition(Transition {
                        from: fragment.start,
                        to: fragment.accept,
                        symbol: Some(*c),
                    });
                }
                fragment
            }
            AstNode::Concatenation(left, right) => {
                let left = self.add_ast_to_nfa(left);
                let right = self.add_ast_to_nfa(right);
                self.add_epsilon_transition(left.accept, right.start);
                Fragment {
                    start: left.start,
                    accept: right.accept,
                }
            }
            AstNode::Alternation(left, right) => {
                let left = self.add_ast_to_nfa(left);
                let right = self.add_ast_to_nfa(right);
                let fragment = self.new_fragment();
                self.add_epsilon_transition(fragment.start, left.start);
                self.add_epsilon_transition(fragment.start, right.start);
                self.add_epsilon_transition(left.accept, fragment.accept);
                self.add_epsilon_transition(right.accept, fragment.accept);
                fragment
            }
            AstNode::Star(inner) => {
                let inner = self.add_ast_to_nfa(inner);
                let fragment = self.new_fragment();
                self.add_epsilon_transition(fragment.start, inner.start);
                self.add_epsilon_transition(fragment.start, fragment.accept);
                self.add_epsilon_transition(inner.accept, inner.start);
                self.add_epsilon_transition(inner.accept, fragment.accept);
                fragment
            }
            AstNode::Plus(inner) => {
                let inner = self.add_ast_to_nfa(inner);
                let fragment = self.new_fragment();
                self.add_epsilon_transition(fragment.start, inner.start);
                self.add_epsilon_transition(inner.accept, inner.start);
                self.add_epsilon_transition(inner.accept, fragment.accept);
                fragment
            }
            AstNode::Optional(inner) => {
                let inner = self.add_ast_to_nfa(inner);
                let fragment = self.new_fragment();
                self.add_epsilon_transition(fragment.start, inner.start);
                self.add_epsilon_transition(fragment.start, fragment.accept);
                self.add_epsilon_transition(inner.accept, fragment.accept);
                fragment
            }
        }
    }

    fn new_state(&mut self) -> State {
        let state = State(self.transitions.len());
        self.transitions.push(TransitionTable::new());
        state
    }

    fn new_fragment(&mut self) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        Fragment { start, accept }
    }

    fn add_transition(&mut self, transition: Transition) {
        assert!(self.transitions.len() > transition.from.0);
        assert!(self.transitions.len() > transition.to.0);
        self.transitions[transition.from.0]
            .entry(transition.symbol)
            .or_default()
            .insert(transition.to);
    }

    fn add_epsilon_transition(&mut self, from: State, to: State) {
        self.add_transition(Transition {
            from,
            to,
            symbol: None,
        });
    }
}

impl Nfa {
    pub fn get_start(&self) -> State {
        self.start
    }

    pub fn get_accept(&self) -> State {
        self.accept
    }

    pub fn is_accept_state(&self, state: State) -> bool {
        self.accept == state
    }

    pub fn get_num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn get_states(&self) -> Vec<State> {
        (0..self.transitions.len()).map(State).collect()
    }

    pub fn get_transitions_from_state(&self, state: &State) -> Result<&TransitionTable> {
        self.transitions
            .get(state.0)
            .ok_or(StructuralInvariantViolation("NFA state has no transition table"))
    }

    pub fn get_transitions(&self) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for (idx, table) in self.transitions.iter().enumerate() {
            for (symbol, targets) in table {
                for to in targets {
                    transitions.push(Transition {
                        from: State(idx),
                        to: *to,
                        symbol: *symbol,
                    });
                }
            }
        }
        transitions
    }

    // Every non-epsilon symbol on any edge
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .flat_map(|table| table.keys())
            .filter_map(|symbol| *symbol)
            .collect()
    }

    pub fn epsilon_closure(&self, states: &BTreeSet<State>) -> Result<BTreeSet<State>> {
        let mut closure = states.clone();
        let mut stack: Vec<State> = states.iter().copied().collect();

        while let Some(state) = stack.pop() {
            if let Some(targets) = self.get_transitions_from_state(&state)?.get(&None) {
                for target in targets {
                    if closure.insert(*target) {
                        stack.push(*target);
                    }
                }
            }
        }

        Ok(closure)
    }

    pub fn move_on(&self, states: &BTreeSet<State>, symbol: char) -> Result<BTreeSet<State>> {
        let mut destinations = BTreeSet::new();
        for state in states {
            if let Some(targets) = self.get_transitions_from_state(state)?.get(&Some(symbol)) {
                destinations.extend(targets.iter().copied());
            }
        }
        Ok(destinations)
    }

    pub fn simulate(&self, input: &str) -> Result<bool> {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.start]))?;
        for symbol in input.chars() {
            if current.is_empty() {
                return Ok(false);
            }
            current = self.epsilon_closure(&self.move_on(&current, symbol)?)?;
        }
        Ok(current.contains(&self.accept))
    }

    pub fn to_export(&self) -> Result<ExportMap> {
        let numbering = StateNumbering::discover(self.start, &self.get_states(), |state| {
            Ok(self
                .get_transitions_from_state(&state)?
                .values()
                .flatten()
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
            for (symbol, targets) in self.get_transitions_from_state(state)? {
                if targets.is_empty() {
                    continue;
                }
                let key = match symbol {
                    None => EPSILON_KEY.to_string(),
                    Some(c) => c.to_string(),
                };
                let ids = targets
                    .iter()
                    .map(|target| numbering.id_of(target))
                    .collect::<Result<Vec<String>>>()?;
                entry.insert(key, ids.into());
            }
            export.insert(numbering.id_of(state)?, serde_json::Value::Object(entry));
        }
        Ok(export)
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NFA( start: {:?}, accept: {:?}, num_states: {}, transitions: {{\n",
            self.start,
            self.accept,
            self.transitions.len()
        )?;
        for transition in self.get_transitions() {
            write!(f, "\t{:?}\n", transition)?;
        }
        write!(f, "}} )")
    }
}
