use crate::config::ConversionConfig;
use crate::error_handling::Error::{InputTooLong, StructuralInvariantViolation, SyntaxError};
use crate::error_handling::{Result, SyntaxErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::ast_node::AstNode;
use std::collections::BTreeSet;

// Recursive-descent parser over the token stream produced by `Token::tokenize`.
//
// Alternation   := Concatenation ('|' Alternation)?
// Concatenation := Atom Concatenation?
// Atom          := (Literal | '(' Alternation ')' | '[' CharClassBody ']') ('*' | '+' | '?')?
//
// Both binary operators nest to the right. The chains are collected in a loop and folded, so
// only group nesting consumes stack, and that is bounded by `max_nesting_depth`.
pub struct RegexParser {
    max_input_length: usize,
    max_nesting_depth: usize,
    max_class_size: usize,
}

struct ParserStream<'a> {
    tokens: &'a [Token],
    pos: usize, // Current position in the token stream
    depth: usize,
    max_depth: usize,
    max_class_size: usize,
}

impl RegexParser {
    pub fn new() -> RegexParser {
        Self::with_config(&ConversionConfig::default())
    }

    pub fn with_config(config: &ConversionConfig) -> RegexParser {
        Self {
            max_input_length: config.get_max_input_length(),
            max_nesting_depth: config.get_max_nesting_depth(),
            max_class_size: config.get_max_class_size(),
        }
    }

    pub fn parse_into_ast(&self, pattern: &str) -> Result<AstNode> {
        let len = pattern.chars().count();
        if len > self.max_input_length {
            return Err(InputTooLong(len, self.max_input_length));
        }
        self.parse_tokens(&Token::tokenize(pattern))
    }

    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<AstNode> {
        let mut stream = ParserStream {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: self.max_nesting_depth,
            max_class_size: self.max_class_size,
        };
        let ast = stream.parse_alternation()?;
        if let Some(token) = stream.peek() {
            return Err(SyntaxError(
                stream.pos,
                SyntaxErrorKind::TrailingToken(token.get_text()),
            ));
        }
        Ok(ast)
    }
}

impl Default for RegexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ParserStream<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn get_token(&self, pos: usize) -> Option<Token> {
        self.tokens.get(pos).copied()
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some(token) if token.get_kind() == kind => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokenKind, closing: char) -> Result<()> {
        if self.match_kind(kind) {
            return Ok(());
        }
        Err(SyntaxError(
            self.pos,
            SyntaxErrorKind::MissingClosing(closing),
        ))
    }

    fn fold_right(nodes: Vec<AstNode>, combine: fn(AstNode, AstNode) -> AstNode) -> Result<AstNode> {
        nodes
            .into_iter()
            .rev()
            .reduce(|right, left| combine(left, right))
            .ok_or(StructuralInvariantViolation("empty operand list while parsing"))
    }

    fn parse_alternation(&mut self) -> Result<AstNode> {
        let mut branches = vec![self.parse_concatenation()?];
        while self.match_kind(TokenKind::Or) {
            branches.push(self.parse_concatenation()?);
        }
        Self::fold_right(branches, AstNode::alternation)
    }

    fn parse_concatenation(&mut self) -> Result<AstNode> {
        let mut atoms = vec![self.parse_atom()?];
        while let Some(token) = self.peek() {
            if false == token.get_kind().starts_atom() {
                break;
            }
            atoms.push(self.parse_atom()?);
        }
        Self::fold_right(atoms, AstNode::concatenation)
    }

    fn parse_atom(&mut self) -> Result<AstNode> {
        let pos = self.pos;
        let token = match self.next() {
            Some(token) => token,
            None => return Err(SyntaxError(pos, SyntaxErrorKind::UnexpectedEnd)),
        };

        let atom = match token.get_kind() {
            TokenKind::Literal => AstNode::Literal(token.get_text()),
            TokenKind::OpenParen => {
                if self.depth >= self.max_depth {
                    return Err(SyntaxError(
                        pos,
                        SyntaxErrorKind::TooDeeplyNested(self.max_depth),
                    ));
                }
                self.depth += 1;
                let inner = self.parse_alternation()?;
                self.expect(TokenKind::CloseParen, ')')?;
                self.depth -= 1;
                inner
            }
            TokenKind::OpenBracket => {
                let class = self.parse_char_class_body()?;
                self.expect(TokenKind::CloseBracket, ']')?;
                AstNode::CharClass(class)
            }
            _ => {
                return Err(SyntaxError(
                    pos,
                    SyntaxErrorKind::UnexpectedToken(token.get_text()),
                ))
            }
        };

        // At most one quantifier per atom
        let quantified = match self.peek().map(|t| t.get_kind()) {
            Some(TokenKind::Star) => AstNode::star(atom),
            Some(TokenKind::Plus) => AstNode::plus(atom),
            Some(TokenKind::Question) => AstNode::optional(atom),
            _ => return Ok(atom),
        };
        self.pos += 1;
        Ok(quantified)
    }

    // Consumes tokens up to, but not including, the closing `]`.
    fn parse_char_class_body(&mut self) -> Result<BTreeSet<char>> {
        let mut class = BTreeSet::new();
        // Literals read so far; a range pops its start from here
        let mut literals: Vec<char> = Vec::new();

        while let Some(token) = self.peek() {
            match token.get_kind() {
                TokenKind::CloseBracket => break,
                TokenKind::Literal => {
                    class.insert(token.get_text());
                    literals.push(token.get_text());
                }
                TokenKind::Dash => match (literals.last().copied(), self.get_token(self.pos + 1)) {
                    (Some(start), Some(end)) if end.get_kind() != TokenKind::CloseBracket => {
                        literals.pop();
                        self.add_range(&mut class, start, end.get_text())?;
                        self.pos += 1;
                    }
                    // Boundary dash, or no unused literal left to start a range
                    _ => {
                        class.insert('-');
                    }
                },
                // Other operators carry no meaning inside brackets
                _ => {}
            }
            self.pos += 1;
        }
        if class.len() > self.max_class_size {
            return Err(SyntaxError(
                self.pos,
                SyntaxErrorKind::ClassTooLarge(self.max_class_size),
            ));
        }
        Ok(class)
    }

    // Inclusive code-point range; empty when start > end. Wide ranges are rejected before they
    // are expanded.
    fn add_range(&self, class: &mut BTreeSet<char>, start: char, end: char) -> Result<()> {
        let (start, end) = (start as u32, end as u32);
        let width = if start > end { 0 } else { (end - start) as usize + 1 };
        if width > self.max_class_size {
            return Err(SyntaxError(
                self.pos,
                SyntaxErrorKind::ClassTooLarge(self.max_class_size),
            ));
        }
        class.extend((start..=end).filter_map(char::from_u32));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::Error;
    use rstest::rstest;

    fn parse(pattern: &str) -> Result<AstNode> {
        RegexParser::new().parse_into_ast(pattern)
    }

    fn lit(c: char) -> AstNode {
        AstNode::Literal(c)
    }

    #[test]
    fn test_basic_parsing() -> Result<()> {
        let ast = parse("[a-c](e|f)g")?;
        let expected = AstNode::concatenation(
            AstNode::char_class(['a', 'b', 'c']),
            AstNode::concatenation(AstNode::alternation(lit('e'), lit('f')), lit('g')),
        );
        assert_eq!(ast, expected);
        Ok(())
    }

    #[test]
    fn test_right_nesting() -> Result<()> {
        assert_eq!(
            parse("abc")?,
            AstNode::concatenation(lit('a'), AstNode::concatenation(lit('b'), lit('c')))
        );
        assert_eq!(
            parse("a|b|c")?,
            AstNode::alternation(lit('a'), AstNode::alternation(lit('b'), lit('c')))
        );
        Ok(())
    }

    #[test]
    fn test_quantifier_precedence() -> Result<()> {
        assert_eq!(
            parse("ab*|c+")?,
            AstNode::alternation(
                AstNode::concatenation(lit('a'), AstNode::star(lit('b'))),
                AstNode::plus(lit('c')),
            )
        );
        assert_eq!(
            parse("(ab)?")?,
            AstNode::optional(AstNode::concatenation(lit('a'), lit('b')))
        );
        Ok(())
    }

    #[rstest]
    #[case("[a-c]", &['a', 'b', 'c'])]
    #[case("[-ac]", &['-', 'a', 'c'])]
    #[case("[ac-]", &['-', 'a', 'c'])]
    #[case("[a-c-e]", &['-', 'a', 'b', 'c', 'e'])]
    #[case("[ab-c-e]", &['a', 'b', 'c', 'd', 'e'])]
    #[case("[xa-c-e]", &['a', 'b', 'c', 'd', 'e', 'x'])]
    #[case("[--a]", &['-', 'a'])]
    #[case("[c-a]", &['c'])]
    #[case("[0-2x]", &['0', '1', '2', 'x'])]
    #[case("[a(]", &['a'])]
    #[case("[]", &[])]
    fn test_char_class(#[case] pattern: &str, #[case] expected: &[char]) -> Result<()> {
        assert_eq!(parse(pattern)?, AstNode::char_class(expected.iter().copied()));
        Ok(())
    }

    #[rstest]
    #[case("(", 1, SyntaxErrorKind::UnexpectedEnd)]
    #[case(")", 0, SyntaxErrorKind::UnexpectedToken(')'))]
    #[case("*", 0, SyntaxErrorKind::UnexpectedToken('*'))]
    #[case("[a-", 3, SyntaxErrorKind::MissingClosing(']'))]
    #[case("(ab", 3, SyntaxErrorKind::MissingClosing(')'))]
    #[case("a)", 1, SyntaxErrorKind::TrailingToken(')'))]
    #[case("a**", 2, SyntaxErrorKind::TrailingToken('*'))]
    #[case("a-b", 1, SyntaxErrorKind::TrailingToken('-'))]
    #[case("a|", 2, SyntaxErrorKind::UnexpectedEnd)]
    #[case("", 0, SyntaxErrorKind::UnexpectedEnd)]
    #[case("()", 1, SyntaxErrorKind::UnexpectedToken(')'))]
    fn test_syntax_errors(
        #[case] pattern: &str,
        #[case] expected_pos: usize,
        #[case] expected_kind: SyntaxErrorKind,
    ) {
        match parse(pattern) {
            Err(Error::SyntaxError(pos, kind)) => {
                assert_eq!(pos, expected_pos);
                assert_eq!(kind, expected_kind);
            }
            other => panic!("expected a syntax error for {:?}, got {:?}", pattern, other),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let config = ConversionConfig::new(1024, 3);
        let parser = RegexParser::with_config(&config);
        assert!(parser.parse_into_ast("(((a)))").is_ok());

        match parser.parse_into_ast("((((a))))") {
            Err(Error::SyntaxError(3, SyntaxErrorKind::TooDeeplyNested(3))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_class_size_limit() -> Result<()> {
        let config = ConversionConfig::new(1024, 8).with_max_class_size(26);
        let parser = RegexParser::with_config(&config);
        assert_eq!(parser.parse_into_ast("[a-z]")?, AstNode::char_class('a'..='z'));

        // The range fits, the finished class does not
        match parser.parse_into_ast("[0a-z]") {
            Err(Error::SyntaxError(5, SyntaxErrorKind::ClassTooLarge(26))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // Rejected at the dash, before expansion
        match parser.parse_into_ast("[a-~]") {
            Err(Error::SyntaxError(2, SyntaxErrorKind::ClassTooLarge(26))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match parser.parse_into_ast("x[\u{0}-\u{10FFFF}]") {
            Err(Error::SyntaxError(_, SyntaxErrorKind::ClassTooLarge(26))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match RegexParser::new().parse_into_ast("[\u{0}-\u{10FFFF}]") {
            Err(Error::SyntaxError(_, SyntaxErrorKind::ClassTooLarge(limit))) => {
                assert_eq!(limit, ConversionConfig::DEFAULT_MAX_CLASS_SIZE)
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_input_length_limit() {
        let config = ConversionConfig::new(4, 8);
        let parser = RegexParser::with_config(&config);
        assert!(parser.parse_into_ast("abcd").is_ok());
        assert!(matches!(
            parser.parse_into_ast("abcde"),
            Err(Error::InputTooLong(5, 4))
        ));
    }

    #[test]
    fn test_long_flat_input() -> Result<()> {
        let pattern = "ab".repeat(500);
        let ast = parse(&pattern)?;
        let AstNode::Concatenation(first, _) = &ast else {
            panic!("Type mismatched")
        };
        assert_eq!(**first, lit('a'));
        Ok(())
    }
}
