use std::iter::Peekable;

use super::{
    lexer::{Token, TokenIter},
    SExpr,
};

/// Recursive-descent parser over the token stream.
///
/// The parser is tolerant by construction: a closer that never arrives ends
/// its list at EOF, and a stray closer or bare atom at the top level is
/// skipped. Damaged documents degrade to partial trees instead of errors,
/// which matches how the extraction layer treats absent data.
pub(super) struct Parser<'a> {
    iter: Peekable<TokenIter<'a>>,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            iter: TokenIter::new(input).peekable(),
        }
    }

    /// Parse every top-level form in document order.
    pub(super) fn parse_document(&mut self) -> Vec<SExpr<'a>> {
        let mut forms = Vec::new();
        while let Some(token) = self.iter.next() {
            if token == Token::LParen {
                forms.push(self.parse_list());
            }
        }
        forms
    }

    // Called just after the opening paren has been consumed.
    fn parse_list(&mut self) -> SExpr<'a> {
        let label = match self.iter.peek() {
            Some(Token::Atom(label)) => {
                let label = *label;
                self.iter.next();
                label
            }
            _ => "",
        };
        let mut children = Vec::new();
        loop {
            match self.iter.next() {
                Some(Token::RParen) | None => break,
                Some(Token::LParen) => children.push(self.parse_list()),
                Some(Token::Atom(s)) => children.push(SExpr::Atom(s)),
            }
        }
        SExpr::List(label, children.into_boxed_slice())
    }
}
