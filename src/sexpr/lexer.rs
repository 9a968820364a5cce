use logos::{Logos, SpannedIter};

/// A lexed token with quoting already resolved: a quoted string and a bare
/// word both come out as [`Token::Atom`] carrying the text itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Token<'a> {
    LParen,
    RParen,
    Atom(&'a str),
}

pub(super) struct TokenIter<'a> {
    input: &'a str,
    iter: SpannedIter<'a, RawToken>,
}

impl<'a> TokenIter<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            iter: RawToken::lexer(input).spanned(),
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, span) = self.iter.next()?;
        Some(match kind {
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::Quoted) => Token::Atom(&self.input[span.start + 1..span.end - 1]),
            Ok(RawToken::Bare) => Token::Atom(&self.input[span]),
            Ok(RawToken::Ws) => unreachable!(),
            // anything unlexable (an unterminated quote, mostly) is still
            // text as far as the extraction layer is concerned
            Err(()) => Token::Atom(&self.input[span]),
        })
    }
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
enum RawToken {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r#""([^"\\]|\\["\\bnfrt]|u[a-fA-F0-9]{4})*""#)]
    Quoted,
    #[regex(r#"[^"() \t\r\f\n]+"#)]
    Bare,
    #[regex(r"[ \t\r\f\n]+", logos::skip)]
    Ws,
}
