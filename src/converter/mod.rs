mod converter;

pub use converter::build_nfa;
pub use converter::determinize;
pub use converter::lex_and_parse;
pub use converter::lex_and_parse_with_config;
pub use converter::minimize;
pub use converter::Conversion;
pub use converter::Converter;
