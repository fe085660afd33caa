//! Recursive-descent parser for waveform expressions.

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{LabSimError, Result};

/// Nesting limit, keeps hostile input from exhausting the stack.
const MAX_DEPTH: usize = 64;

/// Parser for expressions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: TokenKind,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous: TokenKind::Eof,
            depth: 0,
        })
    }

    /// Parse the whole input as one expression.
    pub fn parse(&mut self) -> Result<Expr> {
        if self.current.kind == TokenKind::Eof {
            return Err(LabSimError::parse(self.current.column, "empty expression"));
        }

        let expr = self.parse_sum()?;

        if self.current.kind != TokenKind::Eof {
            return Err(LabSimError::parse(
                self.current.column,
                format!("unexpected token '{}'", self.current.text),
            ));
        }

        Ok(expr)
    }

    fn advance(&mut self) -> Result<()> {
        self.previous = self.current.kind;
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(LabSimError::parse(
                self.current.column,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(LabSimError::parse(self.current.column, "expression nested too deeply"));
        }
        Ok(())
    }

    // sum = product { ('+' | '-') product }
    fn parse_sum(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let rhs = self.parse_product()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // product = unary { ('*' | '/' | '%') unary | implicit }
    fn parse_product(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                // A number written directly before a name or '(' multiplies it
                TokenKind::Identifier | TokenKind::OpenParen
                    if self.previous == TokenKind::Number =>
                {
                    let rhs = self.parse_unary()?;
                    lhs = binary(BinaryOp::Mul, lhs, rhs);
                    continue;
                }
                _ => break,
            };
            self.advance()?;
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // unary = ('-' | '+') unary | power
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.enter()?;
        self.advance()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    // power = primary [ '^' unary ]   (right associative)
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.current.kind == TokenKind::Caret {
            self.enter()?;
            self.advance()?;
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    // primary = number | identifier [ '(' args ')' ] | '(' sum ')'
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Number => {
                let tok = self.current.clone();
                self.advance()?;
                let value = parse_value(&tok.text).ok_or_else(|| {
                    LabSimError::parse(tok.column, format!("invalid number '{}'", tok.text))
                })?;
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier => {
                let tok = self.current.clone();
                self.advance()?;
                if self.current.kind == TokenKind::OpenParen {
                    self.parse_call(tok)
                } else {
                    Ok(Expr::Variable(tok.text))
                }
            }
            TokenKind::OpenParen => {
                self.enter()?;
                self.advance()?;
                let inner = self.parse_sum()?;
                self.expect(TokenKind::CloseParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => Err(LabSimError::parse(
                self.current.column,
                format!("unexpected token '{}'", self.current.text),
            )),
        }
    }

    fn parse_call(&mut self, name: Token) -> Result<Expr> {
        let function = Function::from_name(&name.text).ok_or_else(|| {
            LabSimError::UnknownFunction {
                name: name.text.clone(),
            }
        })?;

        self.enter()?;
        self.expect(TokenKind::OpenParen)?;
        let mut args = Vec::new();
        if self.current.kind != TokenKind::CloseParen {
            args.push(self.parse_sum()?);
            while self.current.kind == TokenKind::Comma {
                self.advance()?;
                args.push(self.parse_sum()?);
            }
        }
        self.expect(TokenKind::CloseParen)?;
        self.depth -= 1;

        function.check_arity(&name.text, args.len())?;
        Ok(Expr::Call { function, args })
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
