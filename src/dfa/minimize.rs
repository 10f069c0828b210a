use crate::dfa::dfa::{Dfa, State};
use crate::error_handling::Error::StructuralInvariantViolation;
use crate::error_handling::Result;
use indexmap::IndexMap;
use std::collections::BTreeSet;

type Partition = Vec<BTreeSet<State>>;

// Per alphabet symbol: the group index reached, or None when the transition is missing.
type Signature = Vec<Option<usize>>;

impl Dfa {
    // Moore partition refinement. Groups of the final partition become the new states, indexed
    // in creation order; the start state is whichever group holds the old start.
    pub fn minimize(&self) -> Result<Dfa> {
        let alphabet: Vec<char> = self.get_alphabet().iter().copied().collect();

        let (accepting, rejecting): (BTreeSet<State>, BTreeSet<State>) = self
            .get_states()
            .into_iter()
            .partition(|state| self.is_accept_state(*state));
        let mut partition: Partition = [accepting, rejecting]
            .into_iter()
            .filter(|group| false == group.is_empty())
            .collect();

        loop {
            let group_of = self.index_groups(&partition)?;
            let mut refined: Partition = Vec::with_capacity(partition.len());
            for group in &partition {
                let mut buckets: IndexMap<Signature, BTreeSet<State>> = IndexMap::new();
                for state in group {
                    let signature = self.signature(*state, &alphabet, &group_of)?;
                    buckets.entry(signature).or_default().insert(*state);
                }
                refined.extend(buckets.into_values());
            }

            // Refinement only ever splits groups, so an unchanged partition is the fixpoint
            if refined == partition {
                break;
            }
            partition = refined;
        }

        self.build_from_partition(&partition)
    }

    fn index_groups(&self, partition: &Partition) -> Result<Vec<usize>> {
        let mut group_of = vec![None; self.get_num_states()];
        for (idx, group) in partition.iter().enumerate() {
            for state in group {
                let slot = group_of
                    .get_mut(state.0)
                    .ok_or(StructuralInvariantViolation("partition holds an unknown DFA state"))?;
                *slot = Some(idx);
            }
        }
        group_of
            .into_iter()
            .map(|idx| idx.ok_or(StructuralInvariantViolation("DFA state missing from partition")))
            .collect()
    }

    fn signature(&self, state: State, alphabet: &[char], group_of: &[usize]) -> Result<Signature> {
        let transitions = self.get_transitions_from_state(state)?;
        alphabet
            .iter()
            .map(|symbol| match transitions.get(symbol) {
                Some(to_state) => group_of
                    .get(to_state.0)
                    .copied()
                    .map(Some)
                    .ok_or(StructuralInvariantViolation("transition targets an unknown DFA state")),
                None => Ok(None),
            })
            .collect()
    }

    fn build_from_partition(&self, partition: &Partition) -> Result<Dfa> {
        let group_of = self.index_groups(partition)?;
        let mut minimized = Dfa::new(self.get_alphabet().clone());

        // All members of a group agree on acceptance and on target groups, so the first
        // member speaks for the group.
        let mut representatives = Vec::with_capacity(partition.len());
        for group in partition {
            let representative = group
                .first()
                .copied()
                .ok_or(StructuralInvariantViolation("empty group in partition"))?;
            let mut nfa_subset = BTreeSet::new();
            for member in group {
                if let Some(subset) = self.get_nfa_subset(*member) {
                    nfa_subset.extend(subset.iter().copied());
                }
            }
            minimized.add_state(nfa_subset, self.is_accept_state(representative));
            representatives.push(representative);
        }

        for (idx, representative) in representatives.iter().enumerate() {
            for (symbol, to_state) in self.get_transitions_from_state(*representative)? {
                minimized.add_transition(State(idx), *symbol, State(group_of[to_state.0]));
            }
        }

        minimized.set_start(State(group_of[self.get_root().0]));
        Ok(minimized)
    }
}
