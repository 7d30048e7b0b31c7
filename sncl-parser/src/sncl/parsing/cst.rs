//! Concrete syntax tree
//!
//! The parser produces a tree that mirrors the grammar rules and attaches no
//! meaning to anything. Each node names its rule and files its children into
//! slots: one slot per token kind consumed and one per sub-rule invoked. Within a
//! slot children keep source order; across slots there is no ordering, so the
//! builder decides in which order kinds are visited.

use crate::sncl::lexing::TokenLocation;
use indexmap::IndexMap;

/// The grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Start,
    Port,
    Media,
    Area,
    Region,
    Link,
    Condition,
    Action,
    Context,
    Property,
    Macro,
    MacroCall,
}

/// Where a child is filed inside its parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Keyword,
    Identifier,
    Value,
    Condition,
    Action,
    Argument,
    Colon,
    Dot,
    LParen,
    RParen,
    Node(Rule),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CstChild {
    Token(TokenLocation),
    Node(CstNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNode {
    pub rule: Rule,
    pub children: IndexMap<Slot, Vec<CstChild>>,
}

impl CstNode {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            children: IndexMap::new(),
        }
    }

    pub fn push_token(&mut self, slot: Slot, token: TokenLocation) {
        self.children
            .entry(slot)
            .or_default()
            .push(CstChild::Token(token));
    }

    /// File a sub-rule node under the slot named after its rule.
    pub fn push_node(&mut self, node: CstNode) {
        self.children
            .entry(Slot::Node(node.rule))
            .or_default()
            .push(CstChild::Node(node));
    }

    pub fn with_token(mut self, slot: Slot, token: TokenLocation) -> Self {
        self.push_token(slot, token);
        self
    }

    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = CstNode>) -> Self {
        for node in nodes {
            self.push_node(node);
        }
        self
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.children.get(&slot).is_some_and(|c| !c.is_empty())
    }

    pub fn tokens(&self, slot: Slot) -> impl Iterator<Item = &TokenLocation> {
        self.slot(slot).iter().filter_map(|child| match child {
            CstChild::Token(token) => Some(token),
            CstChild::Node(_) => None,
        })
    }

    /// The `n`th token in a slot.
    pub fn token(&self, slot: Slot, n: usize) -> Option<&TokenLocation> {
        self.tokens(slot).nth(n)
    }

    pub fn nodes(&self, rule: Rule) -> impl Iterator<Item = &CstNode> {
        self.slot(Slot::Node(rule))
            .iter()
            .filter_map(|child| match child {
                CstChild::Node(node) => Some(node),
                CstChild::Token(_) => None,
            })
    }

    fn slot(&self, slot: Slot) -> &[CstChild] {
        self.children.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }
}
