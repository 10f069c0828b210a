pub mod config;
pub mod converter;
pub mod dfa;
pub mod error_handling;
pub mod export;
pub mod lexer;
pub mod nfa;
pub mod parser;

pub use converter::{build_nfa, determinize, lex_and_parse, lex_and_parse_with_config, minimize};

const VERSION: &str = "0.0.1";

pub fn version() -> &'static str {
    VERSION
}
