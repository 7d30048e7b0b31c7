//! Grammar rules
//!
//!     start      := (port | media | region | link | context | macro | macroCall)*
//!     port       := 'port' id id ('.' id)?
//!     media      := 'media' id (property | area)* 'end'
//!     area       := 'area' id property* 'end'
//!     region     := 'region' id (property | region)* 'end'
//!     link       := condition 'do' (property | action)* 'end'
//!     condition  := CONDITION id ('.' id)?
//!     action     := ACTION id ('.' id)? property* 'end'
//!     context    := 'context' id (port | media | link | context)* 'end'
//!     property   := id ':' (id | VALUE)
//!     macro      := 'macro' id '(' (id (',' id)*)? ')'
//!                   (port | media | region | context | link | macroCall)* 'end'
//!     macroCall  := id '(' (ARGUMENT (',' ARGUMENT)*)? ')'
//!
//! Each rule builds its [CstNode]. Structural keywords (including the closing
//! `end`) go to the keyword slot, identifiers to the identifier slot in source
//! order, sub-rules to the slot of their rule.

use chumsky::prelude::*;

use super::combinators::{
    action_role, argument, condition_role, identifier, interface, token, value, ParserError,
};
use super::cst::{CstNode, Rule, Slot};
use crate::sncl::lexing::{Token, TokenLocation};

type TokenPair = (TokenLocation, TokenLocation);

fn with_interface(mut node: CstNode, iface: Option<TokenPair>) -> CstNode {
    if let Some((dot, name)) = iface {
        node.push_token(Slot::Dot, dot);
        node.push_token(Slot::Identifier, name);
    }
    node
}

/// The whole document
pub(crate) fn start() -> impl Parser<TokenLocation, CstNode, Error = ParserError> + Clone {
    choice((
        port(),
        media(),
        region(),
        link(),
        context(),
        macro_definition(),
        macro_call(),
    ))
    .repeated()
    .then_ignore(end())
    .map(|nodes| CstNode::new(Rule::Start).with_nodes(nodes))
}

pub(crate) fn port() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    token(Token::Port)
        .then(identifier())
        .then(identifier())
        .then(interface())
        .map(|(((keyword, id), component), iface)| {
            let node = CstNode::new(Rule::Port)
                .with_token(Slot::Keyword, keyword)
                .with_token(Slot::Identifier, id)
                .with_token(Slot::Identifier, component);
            with_interface(node, iface)
        })
        .boxed()
}

pub(crate) fn property() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    let property_value = identifier()
        .map(|tok| (Slot::Identifier, tok))
        .or(value().map(|tok| (Slot::Value, tok)));

    identifier()
        .then(token(Token::Colon))
        .then(property_value)
        .map(|((name, colon), (slot, value))| {
            CstNode::new(Rule::Property)
                .with_token(Slot::Identifier, name)
                .with_token(Slot::Colon, colon)
                .with_token(slot, value)
        })
        .boxed()
}

pub(crate) fn area() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    token(Token::Area)
        .then(identifier())
        .then(property().repeated())
        .then(token(Token::End))
        .map(|(((keyword, id), properties), end)| {
            CstNode::new(Rule::Area)
                .with_token(Slot::Keyword, keyword)
                .with_token(Slot::Identifier, id)
                .with_nodes(properties)
                .with_token(Slot::Keyword, end)
        })
        .boxed()
}

pub(crate) fn media() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    token(Token::Media)
        .then(identifier())
        .then(property().or(area()).repeated())
        .then(token(Token::End))
        .map(|(((keyword, id), items), end)| {
            CstNode::new(Rule::Media)
                .with_token(Slot::Keyword, keyword)
                .with_token(Slot::Identifier, id)
                .with_nodes(items)
                .with_token(Slot::Keyword, end)
        })
        .boxed()
}

pub(crate) fn region() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    recursive(|region| {
        token(Token::Region)
            .then(identifier())
            .then(property().or(region).repeated())
            .then(token(Token::End))
            .map(|(((keyword, id), items), end)| {
                CstNode::new(Rule::Region)
                    .with_token(Slot::Keyword, keyword)
                    .with_token(Slot::Identifier, id)
                    .with_nodes(items)
                    .with_token(Slot::Keyword, end)
            })
    })
    .boxed()
}

pub(crate) fn condition() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    condition_role()
        .then(identifier())
        .then(interface())
        .map(|((role, component), iface)| {
            let node = CstNode::new(Rule::Condition)
                .with_token(Slot::Condition, role)
                .with_token(Slot::Identifier, component);
            with_interface(node, iface)
        })
        .boxed()
}

pub(crate) fn action() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    action_role()
        .then(identifier())
        .then(interface())
        .then(property().repeated())
        .then(token(Token::End))
        .map(|((((role, component), iface), properties), end)| {
            let node = CstNode::new(Rule::Action)
                .with_token(Slot::Action, role)
                .with_token(Slot::Identifier, component);
            with_interface(node, iface)
                .with_nodes(properties)
                .with_token(Slot::Keyword, end)
        })
        .boxed()
}

pub(crate) fn link() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    condition()
        .then(token(Token::Do))
        .then(property().or(action()).repeated())
        .then(token(Token::End))
        .map(|(((condition, keyword), items), end)| {
            CstNode::new(Rule::Link)
                .with_nodes([condition])
                .with_token(Slot::Keyword, keyword)
                .with_nodes(items)
                .with_token(Slot::Keyword, end)
        })
        .boxed()
}

pub(crate) fn context() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    recursive(|context| {
        token(Token::Context)
            .then(identifier())
            .then(choice((port(), media(), link(), context)).repeated())
            .then(token(Token::End))
            .map(|(((keyword, id), items), end)| {
                CstNode::new(Rule::Context)
                    .with_token(Slot::Keyword, keyword)
                    .with_token(Slot::Identifier, id)
                    .with_nodes(items)
                    .with_token(Slot::Keyword, end)
            })
    })
    .boxed()
}

pub(crate) fn macro_definition() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    let body = choice((
        port(),
        media(),
        region(),
        context(),
        link(),
        macro_call(),
    ));

    token(Token::Macro)
        .then(identifier())
        .then(token(Token::LParen))
        .then(identifier().separated_by(token(Token::Comma)))
        .then(token(Token::RParen))
        .then(body.repeated())
        .then(token(Token::End))
        .map(|((((((keyword, id), open), parameters), close), items), end)| {
            let mut node = CstNode::new(Rule::Macro)
                .with_token(Slot::Keyword, keyword)
                .with_token(Slot::Identifier, id)
                .with_token(Slot::LParen, open);
            for parameter in parameters {
                node.push_token(Slot::Identifier, parameter);
            }
            node.with_token(Slot::RParen, close)
                .with_nodes(items)
                .with_token(Slot::Keyword, end)
        })
        .boxed()
}

pub(crate) fn macro_call() -> BoxedParser<'static, TokenLocation, CstNode, ParserError> {
    identifier()
        .then(token(Token::LParen))
        .then(argument().separated_by(token(Token::Comma)))
        .then(token(Token::RParen))
        .map(|(((id, open), arguments), close)| {
            let mut node = CstNode::new(Rule::MacroCall)
                .with_token(Slot::Identifier, id)
                .with_token(Slot::LParen, open);
            for argument in arguments {
                node.push_token(Slot::Argument, argument);
            }
            node.with_token(Slot::RParen, close)
        })
        .boxed()
}
