pub(crate) mod dfa;
mod minimize;

pub use dfa::Dfa;
pub use dfa::DfaSimulator;
pub use dfa::State;
