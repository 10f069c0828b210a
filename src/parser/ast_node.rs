use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Clone, PartialEq, Eq)]
pub enum AstNode {
    Alternation(Box<AstNode>, Box<AstNode>),   // a|b
    Concatenation(Box<AstNode>, Box<AstNode>), // ab
    Star(Box<AstNode>),                        // Kleene Star (zero or more)
    Plus(Box<AstNode>),                        // One or more
    Optional(Box<AstNode>),                    // Zero or one
    Literal(char),                             // Single character literal
    CharClass(BTreeSet<char>),                 // [...]
}

impl AstNode {
    pub fn alternation(left: AstNode, right: AstNode) -> AstNode {
        AstNode::Alternation(Box::new(left), Box::new(right))
    }

    pub fn concatenation(left: AstNode, right: AstNode) -> AstNode {
        AstNode::Concatenation(Box::new(left), Box::new(right))
    }

    pub fn star(inner: AstNode) -> AstNode {
        AstNode::Star(Box::new(inner))
    }

    pub fn plus(inner: AstNode) -> AstNode {
        AstNode::Plus(Box::new(inner))
    }

    pub fn optional(inner: AstNode) -> AstNode {
        AstNode::Optional(Box::new(inner))
    }

    pub fn char_class<I: IntoIterator<Item = char>>(chars: I) -> AstNode {
        AstNode::CharClass(chars.into_iter().collect())
    }

    fn fmt_tree(&self, f: &mut Formatter<'_>, indent: usize) -> std::fmt::Result {
        let pad = " ".repeat(indent);
        match self {
            AstNode::Alternation(l, r) => {
                writeln!(f, "{}OR", pad)?;
                l.fmt_tree(f, indent + 2)?;
                r.fmt_tree(f, indent + 2)
            }
            AstNode::Concatenation(l, r) => {
                writeln!(f, "{}SEQ", pad)?;
                l.fmt_tree(f, indent + 2)?;
                r.fmt_tree(f, indent + 2)
            }
            AstNode::Star(x) => {
                writeln!(f, "{}STAR", pad)?;
                x.fmt_tree(f, indent + 2)
            }
            AstNode::Plus(x) => {
                writeln!(f, "{}PLUS", pad)?;
                x.fmt_tree(f, indent + 2)
            }
            AstNode::Optional(x) => {
                writeln!(f, "{}QUESTION_MARK", pad)?;
                x.fmt_tree(f, indent + 2)
            }
            AstNode::Literal(c) => writeln!(f, "{}LITERAL: {}", pad, c),
            AstNode::CharClass(chars) => {
                writeln!(f, "{}SQUARE_BRACKET", pad)?;
                for c in chars {
                    writeln!(f, "{}  CHARACTER: {}", pad, c)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AstNode::Alternation(left, right) => write!(f, "Or({:?}, {:?})", left, right),
            AstNode::Concatenation(left, right) => write!(f, "Seq({:?}, {:?})", left, right),
            AstNode::Star(node) => write!(f, "Star({:?})", node),
            AstNode::Plus(node) => write!(f, "Plus({:?})", node),
            AstNode::Optional(node) => write!(f, "Optional({:?})", node),
            AstNode::Literal(c) => write!(f, "Literal({})", c),
            AstNode::CharClass(chars) => {
                let chars: String = chars.iter().collect();
                write!(f, "CharClass({})", chars)
            }
        }
    }
}

// Indented tree, one node per line
impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}
