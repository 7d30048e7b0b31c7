//! Lexer
//!
//! This module orchestrates the tokenization of sncl sources.
//!
//! The pipeline consists of:
//! 1. Core tokenization using the logos lexer ([tokens])
//!    - whitespace is skipped
//!    - keywords and link roles take precedence over identifiers
//!    - literal values are matched with the ordered [patterns]
//! 2. Transformations over the token stream ([transformations])
//!    - `end` introducing a property is demoted to an identifier
//!
//! Every token is paired with its [Location]. Lexing stops at the first character
//! that no token accepts; there is no recovery.

pub mod location;
pub mod patterns;
pub mod tokens;
pub mod transformations;

pub use location::{LineIndex, Location};
pub use tokens::Token;

use crate::sncl::error::{CompileError, ErrorKind};
use logos::Logos;
use thiserror::Error;

/// Type alias for token with location
pub type TokenLocation = (Token, Location);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl LexError {
    pub fn into_compile_error(self, file: &str) -> CompileError {
        CompileError::new(ErrorKind::Lex(self.message), file, self.line)
    }
}

/// Tokenize source code with location information.
pub fn tokenize(source: &str) -> Result<Vec<TokenLocation>, LexError> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let location = index.locate(lexer.span());
        match result {
            Ok(token) => tokens.push((token, location)),
            Err(()) => {
                return Err(LexError {
                    message: format!(
                        "unexpected character: ->{}<- at line {}, column {}",
                        lexer.slice(),
                        location.line,
                        location.column
                    ),
                    line: location.line,
                })
            }
        }
    }

    let tokens = transformations::demote_property_keys(tokens);
    tracing::debug!(tokens = tokens.len(), "tokenized source");
    Ok(tokens)
}
