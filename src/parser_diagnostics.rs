use std::fmt::Display;

use bstr::ByteSlice;
use thiserror::Error;

use crate::ast::Range;
use crate::pos::SourceLocator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character {ch:?}")]
    InvalidCharacter { ch: char, range: Range },
    #[error("expected `{expected}`")]
    ExpectedSymbol {
        expected: &'static str,
        range: Range,
    },
    #[error("not a number")]
    ExpectedNumber { range: Range },
    #[error("unexpected token after expression")]
    TrailingInput { range: Range },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input contains a character no token starts with.
    Lex,
    /// A token, symbol, or number is missing where the grammar needs one.
    Syntax,
}

impl ParseError {
    pub fn range(&self) -> Range {
        use ParseError::*;
        match self {
            InvalidCharacter { range, .. } => *range,
            ExpectedSymbol { range, .. } => *range,
            ExpectedNumber { range } => *range,
            TrailingInput { range } => *range,
        }
    }

    pub fn offset(&self) -> usize {
        self.range().0
    }

    pub fn kind(&self) -> ErrorKind {
        use ParseError::*;
        match self {
            InvalidCharacter { .. } => ErrorKind::Lex,
            ExpectedSymbol { .. } | ExpectedNumber { .. } | TrailingInput { .. } => {
                ErrorKind::Syntax
            }
        }
    }

    pub fn render(&self, source: &[u8]) -> String {
        render_at(source, self.offset(), self)
    }
}

/// Formats a diagnostic pointing at byte `offset` of `source`:
///
/// ```text
/// 1 & 2
///   ^ unexpected character '&'
/// ```
///
/// The line containing `offset` is printed whole, then a caret under the offending column.
pub fn render_at(source: &[u8], offset: usize, message: impl Display) -> String {
    let locator = SourceLocator::new(source);
    let mut pos = locator.position_chars(source, offset);
    let mut line = locator.line_range(source, pos.line);
    if offset == source.len() {
        // Input ended with line breaks; point just past the last line with text.
        while line.is_empty() && pos.line > 0 {
            line = locator.line_range(source, pos.line - 1);
            pos = locator.position_chars(source, line.1);
        }
    }
    format!(
        "{}\n{:width$}^ {}\n",
        source[line.0..line.1].as_bstr(),
        "",
        message,
        width = pos.character as usize
    )
}

/// Formats a diagnostic that has no source position.
pub fn render(message: impl Display) -> String {
    format!("{}\n", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_at() {
        let testcases: Vec<(&str, usize, &str, &str)> = vec![
            ("1&2", 1, "oops", "1&2\n ^ oops\n"),
            ("(1+2", 4, "expected `)`", "(1+2\n    ^ expected `)`\n"),
            ("1\n2 $", 4, "bad", "2 $\n  ^ bad\n"),
            ("1+\n", 3, "not a number", "1+\n  ^ not a number\n"),
            ("1+\n\n", 4, "not a number", "1+\n  ^ not a number\n"),
            ("1\n+\r\n\r\n\n", 8, "not a number", "+\n ^ not a number\n"),
            ("", 0, "not a number", "\n^ not a number\n"),
        ];
        for (source, offset, message, expected) in testcases {
            let result = render_at(source.as_bytes(), offset, message);
            assert_eq!(result, expected, "source = {:?}", source);
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(render("no input"), "no input\n");
    }

    #[test]
    fn test_error_kind() {
        let e = ParseError::InvalidCharacter {
            ch: '&',
            range: Range(1, 2),
        };
        assert_eq!(e.kind(), ErrorKind::Lex);
        assert_eq!(e.offset(), 1);
        assert_eq!(e.to_string(), "unexpected character '&'");

        let e = ParseError::ExpectedSymbol {
            expected: ")",
            range: Range(4, 4),
        };
        assert_eq!(e.kind(), ErrorKind::Syntax);
        assert_eq!(e.to_string(), "expected `)`");
        assert_eq!(e.render(b"(1+2"), "(1+2\n    ^ expected `)`\n");
    }

    #[test]
    fn test_render_after_blank_lines() {
        let source = b"1+\n\n";
        let e = crate::parse(source).unwrap_err();
        assert_eq!(e.render(source), "1+\n  ^ not a number\n");
    }
}
