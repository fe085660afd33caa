//! Lexer (tokenizer) for waveform expressions.

use crate::error::{LabSimError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A variable or function name
    Identifier,
    /// A number (integer or floating point, possibly with unit suffix)
    Number,
    /// '+'
    Plus,
    /// '-'
    Minus,
    /// '*'
    Star,
    /// '/'
    Slash,
    /// '%'
    Percent,
    /// '^'
    Caret,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// ','
    Comma,
    /// End of input
    Eof,
}

/// Lexer for tokenizing expression input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    column: self.column,
                });
            }
        };

        let column = self.column;

        let single = match ch {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '%' => Some(TokenKind::Percent),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };

        if let Some(kind) = single {
            self.advance();
            return Ok(Token {
                kind,
                text: ch.to_string(),
                column,
            });
        }

        if ch.is_ascii_digit() || ch == '.' {
            let text = self.read_number();
            if parse_value(&text).is_none() {
                return Err(LabSimError::lexer(column, format!("malformed number '{}'", text)));
            }
            return Ok(Token {
                kind: TokenKind::Number,
                text,
                column,
            });
        }

        if ch.is_alphabetic() || ch == '_' {
            let text = self.read_identifier();
            return Ok(Token {
                kind: TokenKind::Identifier,
                text,
                column,
            });
        }

        Err(LabSimError::lexer(column, format!("unexpected character '{}'", ch)))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        self.read_digits(&mut text);

        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        // Exponent, only when digits follow ("2e" is 2 times e)
        if let Some(&e) = self.chars.peek() {
            if e == 'e' || e == 'E' {
                let mut ahead = self.chars.clone();
                ahead.next();
                let next = ahead.next();
                let after_sign = ahead.next();
                let is_exponent = match next {
                    Some(d) if d.is_ascii_digit() => true,
                    Some('+') | Some('-') => after_sign.map_or(false, |d| d.is_ascii_digit()),
                    _ => false,
                };
                if is_exponent {
                    text.push(e);
                    self.advance();
                    if let Some(&sign) = self.chars.peek() {
                        if sign == '+' || sign == '-' {
                            text.push(sign);
                            self.advance();
                        }
                    }
                    self.read_digits(&mut text);
                }
            }
        }

        // Unit suffix, only when it is not the start of an identifier ("2pi")
        if let Some(&suffix) = self.chars.peek() {
            if is_unit_suffix(suffix) {
                let mut ahead = self.chars.clone();
                ahead.next();
                let continues = ahead
                    .peek()
                    .map_or(false, |c| c.is_alphanumeric() || *c == '_');
                if !continues {
                    text.push(suffix);
                    self.advance();
                }
            }
        }

        text
    }
}

fn is_unit_suffix(ch: char) -> bool {
    matches!(ch, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G')
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(last) = text.chars().last() {
        let mult = match last {
            'p' => 1e-12,
            'n' => 1e-9,
            'u' | 'µ' => 1e-6,
            'm' => 1e-3,
            'k' | 'K' => 1e3,
            'M' => 1e6,
            'G' => 1e9,
            _ => 1.0,
        };
        if mult != 1.0 {
            (&text[..text.len() - last.len_utf8()], mult)
        } else {
            (text, 1.0)
        }
    } else {
        (text, 1.0)
    };

    num_str
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
}
