use crate::ast::Range;
use crate::parser_diagnostics::ParseError;
use crate::token::{Token, TokenKind};
use crate::util::{CharExt, OptionPredExt};
use bstr::{BStr, ByteSlice};
use once_cell::sync::Lazy;

/// Punctuators, longest first so that `<=` is never split into `<` and `=`.
static PUNCTUATORS: Lazy<Vec<&'static BStr>> = Lazy::new(|| {
    let mut punctuators = vec![
        "+", "-", "*", "/", "(", ")", "<", ">", "==", "!=", "<=", ">=",
    ]
    .into_iter()
    .map(|p| p.as_bytes().as_bstr())
    .collect::<Vec<_>>();
    punctuators.sort_by_key(|p| std::cmp::Reverse(p.len()));
    punctuators
});

/// Splits `source` into tokens, ending with exactly one [`TokenKind::Eof`].
///
/// Lexing stops at the end of `source` or at the first NUL byte, whichever comes first.
/// The first character that starts no token aborts the whole run.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer { source, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token()?;
        tracing::trace!(kind = ?token.kind, range = ?token.range, "token");
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if eof {
            break;
        }
    }
    tracing::debug!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

#[derive(Debug)]
struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn lex_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let first = match self.next() {
            None | Some(b'\0') => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    range: Range(start, start),
                });
            }
            Some(first) => first,
        };
        let kind = if first.islower() {
            self.pos += 1;
            TokenKind::Ident
        } else if let Some(punct) = PUNCTUATORS
            .iter()
            .find(|p| self.source[start..].starts_with(p.as_bytes()))
        {
            self.pos += punct.len();
            TokenKind::Reserved
        } else if first.is_ascii_digit() {
            self.lex_numeric()
        } else {
            let (ch, len) = bstr::decode_utf8(&self.source[start..]);
            return Err(ParseError::InvalidCharacter {
                ch: ch.unwrap_or('\u{FFFD}'),
                range: Range(start, start + len.max(1)),
            });
        };
        Ok(Token {
            kind,
            range: Range(start, self.pos),
        })
    }

    fn lex_numeric(&mut self) -> TokenKind {
        let mut numval: i64 = 0;
        while let Some(ch) = self.next().filter(u8::is_ascii_digit) {
            // Overflow wraps silently.
            numval = numval.wrapping_mul(10).wrapping_add((ch - b'0') as i64);
            self.pos += 1;
        }
        TokenKind::Number(numval)
    }

    fn next(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.next().is_some_and_(|ch| ch.isspace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source.as_bytes())
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_simple() {
        use TokenKind::*;
        assert_eq!(kinds(""), vec![Eof]);
        assert_eq!(kinds("  \t\n"), vec![Eof]);
        assert_eq!(kinds("42"), vec![Number(42), Eof]);
        assert_eq!(
            kinds("1 + 23*(4)"),
            vec![
                Number(1),
                Reserved,
                Number(23),
                Reserved,
                Reserved,
                Number(4),
                Reserved,
                Eof
            ]
        );
        assert_eq!(kinds("a b"), vec![Ident, Ident, Eof]);
        assert_eq!(kinds("ab"), vec![Ident, Ident, Eof]);
    }

    #[test]
    fn test_maximal_munch() {
        let source = b"1<=2>=3==4!=5<6>7";
        let tokens = tokenize(source).unwrap();
        let lexemes = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Reserved)
            .map(|token| token.lexeme(source).to_string())
            .collect::<Vec<_>>();
        assert_eq!(lexemes, vec!["<=", ">=", "==", "!=", "<", ">"]);
    }

    #[test]
    fn test_lexemes_reproduce_input() {
        let testcases = vec![
            "1+2",
            " 12 * ( 3 - 4 ) / 5 ",
            "a<=b>=c\t==\nd != 0",
            "((((7))))",
            "-1--2",
            "x y z",
            "1 2 3",
        ];
        for source in testcases {
            let tokens = tokenize(source.as_bytes()).unwrap();
            assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
            let joined = tokens
                .iter()
                .map(|token| token.lexeme(source.as_bytes()).to_string())
                .collect::<String>();
            let expected = source
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<String>();
            assert_eq!(joined, expected, "source = {:?}", source);
        }
    }

    #[test]
    fn test_number_ranges() {
        let tokens = tokenize(b"  123 4").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token {
                    kind: TokenKind::Number(123),
                    range: Range(2, 5),
                },
                Token {
                    kind: TokenKind::Number(4),
                    range: Range(6, 7),
                },
                Token {
                    kind: TokenKind::Eof,
                    range: Range(7, 7),
                },
            ]
        );
    }

    #[test]
    fn test_number_overflow_wraps() {
        assert_eq!(
            kinds("9223372036854775808"),
            vec![TokenKind::Number(i64::MIN), TokenKind::Eof]
        );
    }

    #[test]
    fn test_invalid_character() {
        let testcases: Vec<(&str, char, usize)> = vec![
            ("1&2", '&', 1),
            ("=", '=', 0),
            ("1 ! 2", '!', 2),
            ("A", 'A', 0),
            ("1 + \u{3042}", '\u{3042}', 4),
        ];
        for (source, ch, offset) in testcases {
            let e = tokenize(source.as_bytes()).unwrap_err();
            assert_eq!(
                e,
                ParseError::InvalidCharacter {
                    ch,
                    range: Range(offset, offset + ch.len_utf8()),
                },
                "source = {:?}",
                source
            );
        }
    }

    #[test]
    fn test_invalid_utf8_covers_one_byte() {
        assert_eq!(
            tokenize(b"1\xff2").unwrap_err(),
            ParseError::InvalidCharacter {
                ch: '\u{FFFD}',
                range: Range(1, 2),
            }
        );
    }

    #[test]
    fn test_nul_terminates() {
        let tokens = tokenize(b"1+2\0&").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].range, Range(3, 3));
    }
}
