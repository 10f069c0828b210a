#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Or,           // |
    Star,         // *
    Plus,         // +
    Question,     // ?
    OpenParen,    // (
    CloseParen,   // )
    OpenBracket,  // [
    CloseBracket, // ]
    Dash,         // -
    Literal,      // Everything else
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: char,
}

impl TokenKind {
    pub fn from_char(ch: char) -> TokenKind {
        match ch {
            '|' => TokenKind::Or,
            '*' => TokenKind::Star,
            '+' => TokenKind::Plus,
            '?' => TokenKind::Question,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '-' => TokenKind::Dash,
            _ => TokenKind::Literal,
        }
    }

    // Whether a token of this kind can begin an atom, i.e. continue a concatenation.
    pub fn starts_atom(&self) -> bool {
        matches!(
            self,
            TokenKind::Literal | TokenKind::OpenParen | TokenKind::OpenBracket
        )
    }
}

impl Token {
    pub fn new(text: char) -> Token {
        Token {
            kind: TokenKind::from_char(text),
            text,
        }
    }

    pub fn get_kind(&self) -> TokenKind {
        self.kind
    }

    pub fn get_text(&self) -> char {
        self.text
    }

    pub fn tokenize(regex: &str) -> Vec<Token> {
        regex.chars().map(Token::new).collect()
    }
}
