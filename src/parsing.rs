use crate::ast::{BinaryOp, Node};
use crate::lexing::tokenize;
use crate::parser_diagnostics::ParseError;
use crate::token::{Token, TokenKind};

/// Parses one expression.
///
/// Tokens left over after the expression are ignored; use [`parse_complete`] to reject them.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse(source: &[u8]) -> Result<Node, ParseError> {
    let mut parser = Parser::new(source, tokenize(source)?);
    parser.parse_expr()
}

/// Like [`parse`], but fails with [`ParseError::TrailingInput`] unless the
/// expression spans the whole input.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_complete(source: &[u8]) -> Result<Node, ParseError> {
    let mut parser = Parser::new(source, tokenize(source)?);
    let node = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(node)
}

/// Recursive-descent parser over a fully lexed token vector.
///
/// The cursor only moves forward. Each precedence level is one method and
/// folds its operands to the left:
///
/// ```text
/// expr       := equality
/// equality   := relational ("==" relational | "!=" relational)*
/// relational := add ("<" add | "<=" add | ">" add | ">=" add)*
/// add        := mul ("+" mul | "-" mul)*
/// mul        := unary ("*" unary | "/" unary)*
/// unary      := ("+" | "-")? primary
/// primary    := "(" expr ")" | num
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a [u8],
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with a [`TokenKind::Eof`], as [`tokenize`] guarantees.
    pub fn new(source: &'a [u8], tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::Eof,
                ..
            })
        ));
        Parser {
            source,
            tokens,
            pos: 0,
        }
    }

    pub fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_relational()?;
        loop {
            if self.consume("==") {
                node = Node::binary(BinaryOp::Eq, node, self.parse_relational()?);
            } else if self.consume("!=") {
                node = Node::binary(BinaryOp::Ne, node, self.parse_relational()?);
            } else {
                return Ok(node);
            }
        }
    }

    // `a > b` and `a >= b` are built as `b < a` and `b <= a`, so later
    // stages never see a greater-than node.
    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_add()?;
        loop {
            if self.consume("<") {
                node = Node::binary(BinaryOp::Lt, node, self.parse_add()?);
            } else if self.consume("<=") {
                node = Node::binary(BinaryOp::Le, node, self.parse_add()?);
            } else if self.consume(">") {
                node = Node::binary(BinaryOp::Lt, self.parse_add()?, node);
            } else if self.consume(">=") {
                node = Node::binary(BinaryOp::Le, self.parse_add()?, node);
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_add(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_mul()?;
        loop {
            if self.consume("+") {
                node = Node::binary(BinaryOp::Add, node, self.parse_mul()?);
            } else if self.consume("-") {
                node = Node::binary(BinaryOp::Sub, node, self.parse_mul()?);
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_mul(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_unary()?;
        loop {
            if self.consume("*") {
                node = Node::binary(BinaryOp::Mul, node, self.parse_unary()?);
            } else if self.consume("/") {
                node = Node::binary(BinaryOp::Div, node, self.parse_unary()?);
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if self.consume("+") {
            return self.parse_primary();
        }
        if self.consume("-") {
            let operand = self.parse_primary()?;
            return Ok(Node::binary(BinaryOp::Sub, Node::number(0), operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        if self.consume("(") {
            let node = self.parse_expr()?;
            self.expect(")")?;
            return Ok(node);
        }
        Ok(Node::number(self.expect_number()?))
    }

    fn current(&self) -> &Token {
        // Never moves past the final Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Advances past the current token if it is the punctuator `op`.
    pub fn consume(&mut self, op: &str) -> bool {
        if self.current().is_reserved(self.source, op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, op: &'static str) -> Result<(), ParseError> {
        if self.consume(op) {
            Ok(())
        } else {
            Err(ParseError::ExpectedSymbol {
                expected: op,
                range: self.current().range,
            })
        }
    }

    pub fn expect_number(&mut self) -> Result<i64, ParseError> {
        match self.current().kind {
            TokenKind::Number(numval) => {
                self.advance();
                Ok(numval)
            }
            _ => Err(ParseError::ExpectedNumber {
                range: self.current().range,
            }),
        }
    }

    pub fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.at_eof() {
            return Ok(());
        }
        let first = self.current().range;
        let last = self.tokens[self.tokens.len() - 1].range;
        Err(ParseError::TrailingInput {
            range: first | last,
        })
    }
}
