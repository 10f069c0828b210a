pub(crate) mod nfa;

pub use crate::nfa::nfa::Nfa;
pub use crate::nfa::nfa::State;
pub use crate::nfa::nfa::Transition;
pub use crate::nfa::nfa::TransitionTable;
