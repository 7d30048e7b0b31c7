//! Token stream transformations
//!
//! Logos has no lookahead, so context-dependent classification happens here, as a
//! pass over the raw token stream.
//!
//!     `end` followed by `:` is a property key, not the block terminator. Any amount
//!     of whitespace may sit between the two since the lexer already skipped it.

use super::tokens::Token;
use super::TokenLocation;

/// Turn every `end` keyword that introduces a property back into an identifier.
pub fn demote_property_keys(mut tokens: Vec<TokenLocation>) -> Vec<TokenLocation> {
    for i in 0..tokens.len() {
        let introduces_property = matches!(tokens.get(i + 1), Some((Token::Colon, _)));
        if tokens[i].0 == Token::End && introduces_property {
            tokens[i].0 = Token::Identifier("end".to_string());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncl::lexing::tokenize;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("source lexes")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn end_before_colon_is_an_identifier() {
        assert_eq!(
            kinds("end : 10s end"),
            vec![
                Token::Identifier("end".to_string()),
                Token::Colon,
                Token::Value("10s".to_string()),
                Token::End,
            ]
        );
    }

    #[test]
    fn end_before_newline_and_colon_is_an_identifier() {
        assert_eq!(kinds("end\n:")[0], Token::Identifier("end".to_string()));
    }

    #[test]
    fn plain_end_stays_a_keyword() {
        assert_eq!(kinds("end end"), vec![Token::End, Token::End]);
    }
}
