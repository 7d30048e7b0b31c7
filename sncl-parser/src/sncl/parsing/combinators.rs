//! Token-level parser combinators
//!
//! Every grammar rule is assembled from these matchers. They keep the matched
//! token and its location so the CST can carry them; labels feed error messages.

use chumsky::prelude::*;

use crate::sncl::lexing::{Token, TokenLocation};

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenLocation>;

/// Helper: match a specific token, ignoring the location
pub(crate) fn token(
    expected: Token,
) -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone {
    let label = expected.label();
    filter(move |(tok, _): &TokenLocation| tok == &expected).labelled(label)
}

/// The generic identifier token
pub(crate) fn identifier() -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone
{
    filter(|(tok, _): &TokenLocation| tok.is_identifier()).labelled("id")
}

/// A literal value
pub(crate) fn value() -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone {
    filter(|(tok, _): &TokenLocation| tok.is_value()).labelled("value")
}

/// Any condition role keyword
pub(crate) fn condition_role(
) -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone {
    filter(|(tok, _): &TokenLocation| matches!(tok, Token::Condition(_))).labelled("condition")
}

/// Any action role keyword
pub(crate) fn action_role() -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone
{
    filter(|(tok, _): &TokenLocation| matches!(tok, Token::Action(_))).labelled("action")
}

/// A macro call argument: identifier or literal value
pub(crate) fn argument() -> impl Parser<TokenLocation, TokenLocation, Error = ParserError> + Clone {
    filter(|(tok, _): &TokenLocation| tok.is_argument()).labelled("argument")
}

/// Optional `. id` suffix naming an interface
pub(crate) fn interface(
) -> impl Parser<TokenLocation, Option<(TokenLocation, TokenLocation)>, Error = ParserError> + Clone
{
    token(Token::Dot).then(identifier()).or_not()
}
