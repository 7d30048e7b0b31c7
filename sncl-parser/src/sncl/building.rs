//! AST builder
//!
//! Walks the CST top-down and produces the [Document] tree, registering
//! everything it builds in a fresh [SymbolTable].
//!
//! Top-level items are visited kind by kind: regions, ports, media, contexts,
//! links, then macro definitions, then macro calls. That order fixes both the
//! output order and the order in which macro calls are expanded.
//!
//! Macro bodies are templates. While building one the builder:
//!
//! - does not register or synthesize anything
//! - keeps quoted property values quoted, so substitution sees the raw literal
//! - leaves control-button interfaces alone (the resolver rewrites them after
//!   substitution)

use crate::sncl::ast::{
    Action, Area, Argument, Bind, BodyElement, Condition, Context, Document, Link, Macro,
    MacroCall, MacroItem, Media, Port, Properties, Region,
};
use crate::sncl::error::{ErrorKind, Result};
use crate::sncl::lexing::patterns::remove_quotes;
use crate::sncl::lexing::{Token, TokenLocation};
use crate::sncl::parsing::{CstChild, CstNode, Rule, Slot};
use crate::sncl::symbols::{HeadElement, SymbolTable};
use crate::sncl::synthesis::{materialize, rewrite_control_key};
use indexmap::IndexSet;

/// The tree plus the populated symbol table.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub document: Document,
    pub symbols: SymbolTable,
}

pub struct AstBuilder {
    symbols: SymbolTable,
    inside_macro: bool,
}

/// Build the document for a parsed source.
pub fn build(cst: &CstNode, file_name: &str) -> Result<BuildOutput> {
    AstBuilder::new(file_name).build(cst)
}

fn text(token: &TokenLocation) -> String {
    token.0.text().to_string()
}

fn line(token: &TokenLocation) -> usize {
    token.1.line
}

impl AstBuilder {
    pub fn new(file_name: &str) -> Self {
        Self {
            symbols: SymbolTable::new(file_name),
            inside_macro: false,
        }
    }

    pub fn build(mut self, cst: &CstNode) -> Result<BuildOutput> {
        let mut document = Document::default();

        for node in cst.nodes(Rule::Region) {
            let region = self.region(node)?;
            self.symbols.add_head(HeadElement::Region(region.clone()))?;
            document.regions.push(region);
        }

        let body_rules = [Rule::Port, Rule::Media, Rule::Context, Rule::Link];
        for rule in body_rules {
            for node in cst.nodes(rule) {
                let mut element = self.body_element(node)?;
                materialize(&mut element, &mut self.symbols)?;
                self.symbols.add_body(element.clone())?;
                document.body.push(element);
            }
        }

        self.inside_macro = true;
        for node in cst.nodes(Rule::Macro) {
            let definition = self.macro_definition(node)?;
            self.symbols.add_macro(definition.clone())?;
            document.macros.push(definition);
        }
        self.inside_macro = false;

        for node in cst.nodes(Rule::MacroCall) {
            let call = self.macro_call(node, None)?;
            self.symbols.add_macro_call(call.clone());
            document.calls.push(call);
        }

        let (ports, media, links, contexts) = self.symbols.body_counts();
        tracing::debug!(
            regions = self.symbols.get_head().regions.len(),
            ports,
            media,
            links,
            contexts,
            macros = self.symbols.macros().len(),
            calls = self.symbols.macro_calls().len(),
            "built syntax tree"
        );

        Ok(BuildOutput {
            document,
            symbols: self.symbols,
        })
    }

    /// The `n`th token of a slot, as an error if the CST is malformed.
    fn token<'c>(&self, node: &'c CstNode, slot: Slot, n: usize) -> Result<&'c TokenLocation> {
        node.token(slot, n).ok_or_else(|| {
            let line = node
                .children
                .values()
                .flatten()
                .find_map(|child| match child {
                    CstChild::Token(token) => Some(token.1.line),
                    CstChild::Node(_) => None,
                })
                .unwrap_or(0);
            self.symbols.error(
                ErrorKind::Parse(format!("malformed {:?} node", node.rule)),
                line,
            )
        })
    }

    fn body_element(&self, node: &CstNode) -> Result<BodyElement> {
        Ok(match node.rule {
            Rule::Port => BodyElement::Port(self.port(node)?),
            Rule::Media => BodyElement::Media(self.media(node)?),
            Rule::Link => BodyElement::Link(self.link(node)?),
            _ => BodyElement::Context(self.context(node)?),
        })
    }

    fn port(&self, node: &CstNode) -> Result<Port> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let component = self.token(node, Slot::Identifier, 1)?;
        let interface = if node.has(Slot::Dot) {
            Some(text(self.token(node, Slot::Identifier, 2)?))
        } else {
            None
        };

        Ok(Port {
            id: text(id),
            line: line(id),
            component: text(component),
            interface,
        })
    }

    fn properties(&self, node: &CstNode) -> Result<Properties> {
        let mut properties = Properties::new();
        for property in node.nodes(Rule::Property) {
            let name = self.token(property, Slot::Identifier, 0)?;
            let value = match property.token(Slot::Value, 0) {
                Some(value) => value,
                None => self.token(property, Slot::Identifier, 1)?,
            };
            let value = if self.inside_macro {
                text(value)
            } else {
                remove_quotes(value.0.text())
            };
            properties.insert(text(name), value);
        }
        Ok(properties)
    }

    fn media(&self, node: &CstNode) -> Result<Media> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let mut properties = self.properties(node)?;
        let region = properties.shift_remove("rg");
        let src = properties.shift_remove("src");
        let kind = properties.shift_remove("type");

        let areas = node
            .nodes(Rule::Area)
            .map(|area| self.area(area))
            .collect::<Result<Vec<_>>>()?;

        Ok(Media {
            id: text(id),
            line: line(id),
            region,
            descriptor: None,
            src,
            kind,
            properties,
            areas,
        })
    }

    fn area(&self, node: &CstNode) -> Result<Area> {
        let id = self.token(node, Slot::Identifier, 0)?;
        Ok(Area {
            id: text(id),
            line: line(id),
            properties: self.properties(node)?,
        })
    }

    fn region(&self, node: &CstNode) -> Result<Region> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let children = node
            .nodes(Rule::Region)
            .map(|child| self.region(child))
            .collect::<Result<Vec<_>>>()?;

        Ok(Region {
            id: text(id),
            line: line(id),
            properties: self.properties(node)?,
            children,
        })
    }

    fn bind<R>(&self, node: &CstNode, role: R) -> Result<Bind<R>> {
        let component = self.token(node, Slot::Identifier, 0)?;
        let interface = if node.has(Slot::Dot) {
            Some(text(self.token(node, Slot::Identifier, 1)?))
        } else {
            None
        };

        Ok(Bind {
            role,
            line: line(component),
            component: text(component),
            interface,
            properties: self.properties(node)?,
        })
    }

    fn condition(&self, node: &CstNode) -> Result<Condition> {
        let role = match self.token(node, Slot::Condition, 0)? {
            (Token::Condition(role), _) => *role,
            (_, location) => {
                return Err(self.symbols.error(
                    ErrorKind::Parse("expected a condition role".to_string()),
                    location.line,
                ))
            }
        };
        let mut condition = self.bind(node, role)?;
        if !self.inside_macro {
            rewrite_control_key(&mut condition);
        }
        Ok(condition)
    }

    fn action(&self, node: &CstNode) -> Result<Action> {
        let role = match self.token(node, Slot::Action, 0)? {
            (Token::Action(role), _) => *role,
            (_, location) => {
                return Err(self.symbols.error(
                    ErrorKind::Parse("expected an action role".to_string()),
                    location.line,
                ))
            }
        };
        self.bind(node, role)
    }

    fn link(&self, node: &CstNode) -> Result<Link> {
        let conditions = node
            .nodes(Rule::Condition)
            .map(|condition| self.condition(condition))
            .collect::<Result<Vec<_>>>()?;
        let actions = node
            .nodes(Rule::Action)
            .map(|action| self.action(action))
            .collect::<Result<Vec<_>>>()?;

        Ok(Link {
            line: conditions.first().map(|condition| condition.line).unwrap_or(0),
            conditions,
            actions,
            properties: self.properties(node)?,
            connector: String::new(),
        })
    }

    fn context(&self, node: &CstNode) -> Result<Context> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let mut children = Vec::new();
        for rule in [Rule::Port, Rule::Media, Rule::Link, Rule::Context] {
            for child in node.nodes(rule) {
                children.push(self.body_element(child)?);
            }
        }

        Ok(Context {
            id: text(id),
            line: line(id),
            children,
        })
    }

    fn macro_definition(&self, node: &CstNode) -> Result<Macro> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let macro_id = text(id);

        let mut parameters = IndexSet::new();
        for parameter in node.tokens(Slot::Identifier).skip(1) {
            if !parameters.insert(text(parameter)) {
                return Err(self.symbols.error(
                    ErrorKind::DuplicateParameter(text(parameter)),
                    line(parameter),
                ));
            }
        }

        let mut children = Vec::new();
        for region in node.nodes(Rule::Region) {
            children.push(MacroItem::Region(self.region(region)?));
        }
        for port in node.nodes(Rule::Port) {
            children.push(MacroItem::Port(self.port(port)?));
        }
        for media in node.nodes(Rule::Media) {
            children.push(MacroItem::Media(self.media(media)?));
        }
        for context in node.nodes(Rule::Context) {
            children.push(MacroItem::Context(self.context(context)?));
        }
        for link in node.nodes(Rule::Link) {
            children.push(MacroItem::Link(self.link(link)?));
        }
        for call in node.nodes(Rule::MacroCall) {
            children.push(MacroItem::Call(self.macro_call(call, Some(&macro_id))?));
        }

        Ok(Macro {
            id: macro_id,
            line: line(id),
            parameters,
            children,
        })
    }

    fn macro_call(&self, node: &CstNode, enclosing: Option<&str>) -> Result<MacroCall> {
        let id = self.token(node, Slot::Identifier, 0)?;
        let arguments = node
            .tokens(Slot::Argument)
            .map(|(token, _)| match token {
                Token::Value(literal) => Argument::Literal(literal.clone()),
                other => Argument::Identifier(other.text().to_string()),
            })
            .collect();

        Ok(MacroCall {
            line: line(id),
            macro_id: text(id),
            arguments,
            enclosing: enclosing.map(str::to_string),
        })
    }
}
