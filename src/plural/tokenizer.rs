//! Tokenizer for the `plural=` expression of a `Plural-Forms` header
//!
//! Converts a formula like `n%10==1 && n%100!=11 ? 0 : 1` into a token
//! stream terminated by [`Token::Eof`].

use crate::error::FormulaError;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// The only variable a plural formula may reference
pub const VARIABLE_N: &str = "n";

/// A token in a plural formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A non-negative integer literal
    Integer(i64),
    /// A variable reference (always `n` once lexed)
    Variable(String),
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    LParen,
    RParen,
    CmpEq,
    CmpNeq,
    CmpLt,
    CmpLte,
    CmpGt,
    CmpGte,
    And,
    Or,
    Not,
    /// `?`
    Tern,
    /// `:`
    TernElse,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Token::Integer(value) => return write!(f, "integer {}", value),
            Token::Variable(name) => return write!(f, "variable '{}'", name),
            Token::Eof => return write!(f, "end of formula"),
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Div => "/",
            Token::Mod => "%",
            Token::Pow => "^",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::CmpEq => "==",
            Token::CmpNeq => "!=",
            Token::CmpLt => "<",
            Token::CmpLte => "<=",
            Token::CmpGt => ">",
            Token::CmpGte => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Not => "!",
            Token::Tern => "?",
            Token::TernElse => ":",
        };
        write!(f, "'{}'", symbol)
    }
}

/// A token together with the character offset it started at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Tokenizer for plural formulas
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(formula: &'a str) -> Self {
        Self {
            chars: formula.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenize the whole formula. The last token is always [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, FormulaError> {
        let mut tokens = Vec::new();

        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Spanned, FormulaError> {
        self.skip_whitespace();
        let position = self.position;

        let Some(c) = self.peek() else {
            return Ok(Spanned {
                token: Token::Eof,
                position,
            });
        };

        let token = match c {
            c if c.is_ascii_digit() => self.read_integer()?,
            c if c.is_alphabetic() => self.read_variable()?,
            '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')' | '?' | ':' => {
                self.advance();
                match c {
                    '+' => Token::Add,
                    '-' => Token::Sub,
                    '*' => Token::Mul,
                    '/' => Token::Div,
                    '%' => Token::Mod,
                    '^' => Token::Pow,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '?' => Token::Tern,
                    _ => Token::TernElse,
                }
            }
            '<' | '>' | '=' | '!' | '&' | '|' => self.read_operator(c)?,
            c => return Err(FormulaError::InvalidCharacter { ch: c, position }),
        };

        Ok(Spanned { token, position })
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_integer(&mut self) -> Result<Token, FormulaError> {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }

        digits
            .parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| FormulaError::Overflow)
    }

    /// Read an alphabetic run; anything but `n` is rejected at its first character.
    fn read_variable(&mut self) -> Result<Token, FormulaError> {
        let start = self.position;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphabetic() {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if name != VARIABLE_N {
            let ch = name.chars().next().unwrap_or_default();
            return Err(FormulaError::InvalidCharacter {
                ch,
                position: start,
            });
        }

        Ok(Token::Variable(name))
    }

    /// Comparison and logical operators. `&` and `|` must be doubled, `=` too.
    fn read_operator(&mut self, first: char) -> Result<Token, FormulaError> {
        self.advance();
        let followed_by_eq = self.peek() == Some('=');

        let token = match first {
            '=' if followed_by_eq => Token::CmpEq,
            '!' if followed_by_eq => Token::CmpNeq,
            '<' if followed_by_eq => Token::CmpLte,
            '>' if followed_by_eq => Token::CmpGte,
            '!' => return Ok(Token::Not),
            '<' => return Ok(Token::CmpLt),
            '>' => return Ok(Token::CmpGt),
            '&' | '|' => {
                if self.peek() != Some(first) {
                    return Err(self.invalid_here());
                }
                if first == '&' {
                    Token::And
                } else {
                    Token::Or
                }
            }
            _ => return Err(self.invalid_here()),
        };

        self.advance();
        Ok(token)
    }

    /// Error for whatever sits at the current position (end of input reads as a space).
    fn invalid_here(&mut self) -> FormulaError {
        FormulaError::InvalidCharacter {
            ch: self.peek().unwrap_or(' '),
            position: self.position,
        }
    }
}

/// Convenience function to tokenize a formula
pub fn tokenize(formula: &str) -> Result<Vec<Spanned>, FormulaError> {
    Tokenizer::new(formula).tokenize()
}
