//! Expression language for custom waveforms.
//!
//! The waveform generator's "custom" shape evaluates a user-supplied
//! formula once per tick. Formulas are ordinary infix arithmetic over
//! numbers, variables and built-in functions.
//!
//! # Grammar Overview
//!
//! ```text
//! expr     = sum
//! sum      = product { ('+' | '-') product }
//! product  = unary { ('*' | '/' | '%') unary | implicit }
//! implicit = unary            (only right after a number: 2pi, 3(t+1))
//! unary    = ('-' | '+') unary | power
//! power    = primary [ '^' unary ]
//! primary  = number | identifier [ '(' args ')' ] | '(' expr ')'
//! args     = expr { ',' expr }
//!
//! number      = digit+ ['.' digit*] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Variables
//!
//! | Name | Meaning |
//! |------|---------|
//! | `t` | model time (s) |
//! | `f` | frequency parameter (Hz) |
//! | `A` | amplitude parameter |
//! | `w` | angular frequency `2 pi f` |
//! | `pi`, `e` | constants |
//!
//! Every scenario parameter is also visible under its own key.
//!
//! # Example
//!
//! ```text
//! A * sin(w*t) + 0.3 * A * sin(3*w*t)
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr, Function, UnaryOp};
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse an expression string.
pub fn parse(input: &str) -> Result<Expr> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}
