use crate::ast::Range;
use bstr::{BStr, ByteSlice};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

impl Token {
    /// The exact source bytes this token was lexed from. Empty for [`TokenKind::Eof`].
    pub fn lexeme<'a>(&self, source: &'a [u8]) -> &'a BStr {
        source[self.range.0..self.range.1].as_bstr()
    }

    /// Whether this is a punctuator spelled exactly `op`.
    pub(crate) fn is_reserved(&self, source: &[u8], op: &str) -> bool {
        self.kind == TokenKind::Reserved && self.lexeme(source) == op.as_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Punctuator: `+ - * / ( ) < > == != <= >=`
    Reserved,
    /// A single lowercase letter. Lexed, but never accepted by the grammar.
    Ident,
    /// Decimal integer literal
    Number(i64),
    Eof,
}
