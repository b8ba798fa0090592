//! Recursive descent parser for plural formulas
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! ternary     := logical ( "?" ternary ":" ternary )?
//! logical     := comparison ( ( "&&" | "||" ) comparison )*
//! comparison  := unary ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" ) unary )?
//! unary       := "!" ternary | additive
//! additive    := term ( ( "+" | "-" ) term )*
//! term        := factor ( ( "*" | "/" | "%" | "^" ) factor )*
//! factor      := INTEGER | VARIABLE | "(" ternary ")"
//! ```
//!
//! Comparisons do not chain and the ternary is right-associative. A leading
//! `!` negates everything to its right, so `!n == 1` is `!(n == 1)`.

use super::tokenizer::{tokenize, Spanned, Token};
use crate::error::FormulaError;

/// Arithmetic operators (all left-associative)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Abstract syntax tree of a plural formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Integer(i64),
    Variable(String),
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
}

/// Parser over a tokenized formula
pub struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
}

impl Parser {
    /// Create a parser. `tokens` must end with [`Token::Eof`], as produced by the tokenizer.
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the whole token stream. Trailing tokens are a syntax error.
    pub fn parse(mut self) -> Result<Expr, FormulaError> {
        let expr = self.ternary()?;
        self.expect(&Token::Eof)?;
        Ok(expr)
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.position)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn error(&self) -> FormulaError {
        let position = self
            .tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|s| s.position)
            .unwrap_or(0);
        FormulaError::InvalidSyntax {
            found: self.peek().to_string(),
            position,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), FormulaError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn ternary(&mut self) -> Result<Expr, FormulaError> {
        let condition = self.logical()?;

        if self.peek() != &Token::Tern {
            return Ok(condition);
        }
        self.advance();
        let if_true = self.ternary()?;
        self.expect(&Token::TernElse)?;
        let if_false = self.ternary()?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    fn logical(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.comparison()?;

        loop {
            let op = match self.peek() {
                Token::And => LogicalOp::And,
                Token::Or => LogicalOp::Or,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let left = self.unary()?;

        let op = match self.peek() {
            Token::CmpEq => CompareOp::Eq,
            Token::CmpNeq => CompareOp::Neq,
            Token::CmpLt => CompareOp::Lt,
            Token::CmpLte => CompareOp::Lte,
            Token::CmpGt => CompareOp::Gt,
            Token::CmpGte => CompareOp::Gte,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.unary()?;

        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.peek() == &Token::Not {
            self.advance();
            let operand = self.ternary()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.additive()
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.term()?;

        loop {
            let op = match self.peek() {
                Token::Add => ArithmeticOp::Add,
                Token::Sub => ArithmeticOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            left = Expr::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.factor()?;

        loop {
            let op = match self.peek() {
                Token::Mul => ArithmeticOp::Mul,
                Token::Div => ArithmeticOp::Div,
                Token::Mod => ArithmeticOp::Mod,
                Token::Pow => ArithmeticOp::Pow,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            left = Expr::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        match self.peek().clone() {
            Token::Integer(value) => {
                self.advance();
                Ok(Expr::Integer(value))
            }
            Token::Variable(name) => {
                self.advance();
                Ok(Expr::Variable(name))
            }
            Token::LParen => {
                self.advance();
                let expr = self.ternary()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.error()),
        }
    }
}

/// Tokenize and parse a formula in one go
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    Parser::new(tokenize(formula)?).parse()
}
