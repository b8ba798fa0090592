use thiserror::Error;

pub type PoxResult<T> = Result<T, PoxError>;

#[derive(Error, Debug)]
pub enum PoxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plural formula error: {0}")]
    Formula(#[from] FormulaError),

    #[error("Missing plural header: {0}")]
    MissingHeader(String),

    #[error("Spreadsheet shape error: {0}")]
    Shape(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while lexing, parsing or evaluating a plural formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Invalid character: {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Invalid syntax: unexpected {found} at position {position}")]
    InvalidSyntax { found: String, position: usize },

    #[error("Variable '{0}' not defined")]
    UndefinedVariable(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow")]
    Overflow,

    #[error("Formula produced invalid plural index {0}")]
    InvalidBucket(i64),
}
