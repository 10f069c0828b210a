pub(crate) mod ast_node;
pub(crate) mod regex_parser;

pub use ast_node::AstNode;
pub use regex_parser::parser::RegexParser;
