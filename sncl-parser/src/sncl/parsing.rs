//! Parser
//!
//! A combinator grammar over the token stream. The output is a [CstNode] tree
//! whose shape mirrors the grammar rules; nothing is interpreted here.
//!
//! The rules live in [grammar], built from the token matchers in [combinators].
//! Parsing stops at the first unresolvable token. Only the first error is
//! reported, located at the offending token (or at the last token when the input
//! ends too early).

mod combinators;
pub mod cst;
mod grammar;

pub use cst::{CstChild, CstNode, Rule, Slot};

use crate::sncl::error::{CompileError, ErrorKind};
use crate::sncl::lexing::TokenLocation;
use chumsky::error::Simple;
use chumsky::Parser;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn into_compile_error(self, file: &str) -> CompileError {
        CompileError::new(ErrorKind::Parse(self.message), file, self.line)
    }

    fn from_simple(error: &Simple<TokenLocation>, eoi_line: usize) -> Self {
        let expected = error.label();
        match error.found() {
            Some((token, location)) => {
                let message = match expected {
                    Some(label) => {
                        format!("Expecting token of type --> {label} <-- but found --> '{token}' <--")
                    }
                    None => format!("Unexpected token --> '{token}' <--"),
                };
                ParseError {
                    message,
                    line: location.line,
                }
            }
            None => {
                let message = match expected {
                    Some(label) => {
                        format!("Expecting token of type --> {label} <-- but found end of input")
                    }
                    None => "Unexpected end of input".to_string(),
                };
                ParseError {
                    message,
                    line: eoi_line,
                }
            }
        }
    }
}

/// Parse a token stream into the CST rooted at [Rule::Start].
pub fn parse(tokens: Vec<TokenLocation>) -> Result<CstNode, ParseError> {
    let eoi_line = tokens.last().map(|(_, location)| location.line).unwrap_or(1);

    let cst = grammar::start().parse(tokens).map_err(|errors| {
        errors
            .first()
            .map(|error| ParseError::from_simple(error, eoi_line))
            .unwrap_or_else(|| ParseError {
                message: "Unknown parse failure".to_string(),
                line: eoi_line,
            })
    })?;

    tracing::debug!(items = cst.children.len(), "parsed concrete syntax tree");
    Ok(cst)
}
