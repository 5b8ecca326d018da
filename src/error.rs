//! Parse-time error type.
//!
//! Runtime errors are `Object::Error` values and flow through the
//! evaluator's normal return slot, never through `Result`. Parsing happens
//! before any `Object` exists, so it gets an ordinary typed `Result`-based
//! error instead.

use crate::token::TokenKind;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("{line}:{column}: expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        expected: String,
        got: TokenKind,
        line: usize,
        column: usize,
    },

    #[error("{line}:{column}: no prefix parse function for {token}")]
    NoPrefixParseFn {
        token: TokenKind,
        line: usize,
        column: usize,
    },

    #[error("{line}:{column}: could not parse '{literal}' as integer")]
    InvalidInteger {
        literal: String,
        line: usize,
        column: usize,
    },
}
