//! Token definitions for the sncl format
//!
//! This module defines all the tokens that can be produced by the sncl lexer.
//! The tokens are defined using the logos derive macro. Keywords are plain
//! literal tokens: logos prefers the longest match and, on equal length, a
//! literal over the identifier regex, so `end` is a keyword while `endTime` is
//! an identifier.
//!
//! Literal values are delegated to the [patterns](super::patterns) module: logos
//! only spots the first character and the callback consumes the rest.

use super::patterns;
use crate::sncl::ast::{ActionRole, ConditionRole};
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Link roles
    #[token("onBegin", |_| ConditionRole::OnBegin)]
    #[token("onEnd", |_| ConditionRole::OnEnd)]
    #[token("onSelection", |_| ConditionRole::OnSelection)]
    Condition(ConditionRole),

    #[token("start", |_| ActionRole::Start)]
    #[token("stop", |_| ActionRole::Stop)]
    #[token("set", |_| ActionRole::Set)]
    Action(ActionRole),

    // Structural keywords
    #[token("area")]
    Area,
    #[token("context")]
    Context,
    #[token("do")]
    Do,
    #[token("end")]
    End,
    #[token("macro")]
    Macro,
    #[token("media")]
    Media,
    #[token("port")]
    Port,
    #[token("region")]
    Region,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),

    #[regex(r##"[#"0-9]"##, literal)]
    Value(String),

    // Symbols
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

fn literal(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let start = lex.span().start;
    let len = patterns::match_value(&lex.source()[start..])?;
    lex.bump(len - lex.slice().len());
    Some(lex.slice().to_owned())
}

impl Token {
    /// The source text of the token.
    pub fn text(&self) -> &str {
        match self {
            Token::Condition(role) => role.as_str(),
            Token::Action(role) => role.as_str(),
            Token::Area => "area",
            Token::Context => "context",
            Token::Do => "do",
            Token::End => "end",
            Token::Macro => "macro",
            Token::Media => "media",
            Token::Port => "port",
            Token::Region => "region",
            Token::Identifier(text) | Token::Value(text) => text,
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }

    /// How the grammar refers to this kind of token in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Token::Condition(_) => "condition",
            Token::Action(_) => "action",
            Token::Area => "area",
            Token::Context => "context",
            Token::Do => "do",
            Token::End => "end",
            Token::Macro => "macro",
            Token::Media => "media",
            Token::Port => "port",
            Token::Region => "region",
            Token::Identifier(_) => "id",
            Token::Value(_) => "value",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, Token::Identifier(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Token::Value(_))
    }

    /// Macro call arguments accept identifiers and literal values alike.
    pub fn is_argument(&self) -> bool {
        self.is_identifier() || self.is_value()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Result<Token, ()>> {
        Token::lexer(source).collect()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(
            lex_all("media port region end"),
            vec![
                Ok(Token::Media),
                Ok(Token::Port),
                Ok(Token::Region),
                Ok(Token::End)
            ]
        );
    }

    #[test]
    fn longer_identifiers_are_not_keywords() {
        assert_eq!(
            lex_all("endTime mediaPlayer starter"),
            vec![
                Ok(Token::Identifier("endTime".to_string())),
                Ok(Token::Identifier("mediaPlayer".to_string())),
                Ok(Token::Identifier("starter".to_string())),
            ]
        );
    }

    #[test]
    fn roles_carry_their_kind() {
        assert_eq!(
            lex_all("onSelection set"),
            vec![
                Ok(Token::Condition(ConditionRole::OnSelection)),
                Ok(Token::Action(ActionRole::Set)),
            ]
        );
    }

    #[test]
    fn literal_values_use_the_longest_specific_form() {
        assert_eq!(
            lex_all("10% 5s 3 #fff \"a b\""),
            vec![
                Ok(Token::Value("10%".to_string())),
                Ok(Token::Value("5s".to_string())),
                Ok(Token::Value("3".to_string())),
                Ok(Token::Value("#fff".to_string())),
                Ok(Token::Value("\"a b\"".to_string())),
            ]
        );
    }

    #[test]
    fn symbols() {
        assert_eq!(
            lex_all(": , . ( )"),
            vec![
                Ok(Token::Colon),
                Ok(Token::Comma),
                Ok(Token::Dot),
                Ok(Token::LParen),
                Ok(Token::RParen)
            ]
        );
    }

    #[test]
    fn unknown_characters_are_errors() {
        assert_eq!(lex_all("@"), vec![Err(())]);
    }
}
