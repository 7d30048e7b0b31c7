//! NCL document generation
//!
//! Layout:
//!
//! ```text
//! <?xml version="1.0" encoding="ISO-8859-1"?>
//! <ncl id="main" xmlns="http://www.ncl.org.br/NCL3.0/EDTVProfile">
//!     <head>
//!         <connectorBase>  one causalConnector per connector
//!         <regionBase>     root regions, children nested
//!         <descriptorBase> one descriptor per region binding
//!     </head>
//!     <body>
//!         ports, media, links and contexts without an enclosing context,
//!         in registration order; contexts nest their children
//!     </body>
//! </ncl>
//! ```
//!
//! Every element sits on its own line, indented once per nesting level with the
//! configured indent string. Attribute values are XML-escaped.

use super::validator::Validator;
use crate::sncl::ast::{Area, Bind, ConditionRole, Connector, Descriptor, Link, Media, Port};
use crate::sncl::error::Result;
use crate::sncl::symbols::{BodyEntry, BodyNode, NodeId, RegionNode, SymbolTable};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#;
pub const NCL_NAMESPACE: &str = "http://www.ncl.org.br/NCL3.0/EDTVProfile";

/// Generate the NCL document for a resolved symbol table.
pub fn generate(symbols: &SymbolTable, indent: &str) -> Result<String> {
    let output = Generator::new(symbols, indent).generate()?;
    tracing::debug!(bytes = output.len(), "generated ncl document");
    Ok(output)
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Start tag under construction.
struct Tag {
    text: String,
}

impl Tag {
    fn new(name: &str) -> Self {
        Self {
            text: format!("<{name}"),
        }
    }

    fn attr(mut self, name: &str, value: &str) -> Self {
        self.text.push_str(&format!(" {}=\"{}\"", name, escape_xml(value)));
        self
    }

    fn attr_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    fn attrs<'p>(self, pairs: impl IntoIterator<Item = (&'p String, &'p String)>) -> Self {
        pairs
            .into_iter()
            .fold(self, |tag, (name, value)| tag.attr(name, value))
    }

    fn open(mut self) -> String {
        self.text.push('>');
        self.text
    }

    fn empty(mut self) -> String {
        self.text.push_str(" />");
        self.text
    }
}

pub struct Generator<'a> {
    symbols: &'a SymbolTable,
    validator: Validator<'a>,
    indent: &'a str,
    output: String,
    depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(symbols: &'a SymbolTable, indent: &'a str) -> Self {
        Self {
            symbols,
            validator: Validator::new(symbols),
            indent,
            output: String::new(),
            depth: 0,
        }
    }

    pub fn generate(mut self) -> Result<String> {
        self.line(XML_DECLARATION);
        self.open(format!(r#"<ncl id="main" xmlns="{NCL_NAMESPACE}">"#));

        self.open("<head>");
        self.head();
        self.close("</head>");

        self.open("<body>");
        let symbols = self.symbols;
        for node in symbols.roots() {
            self.node(node)?;
        }
        self.close("</body>");

        self.close("</ncl>");
        Ok(self.output)
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.output.push_str(self.indent);
        }
        self.output.push_str(text.as_ref());
        self.output.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn head(&mut self) {
        let symbols = self.symbols;
        let head = symbols.get_head();

        self.open("<connectorBase>");
        for connector in head.connectors.values() {
            self.connector(connector);
        }
        self.close("</connectorBase>");

        self.open("<regionBase>");
        for region in head.root_regions() {
            self.region(region);
        }
        self.close("</regionBase>");

        self.open("<descriptorBase>");
        for descriptor in head.descriptors.values() {
            self.descriptor(descriptor);
        }
        self.close("</descriptorBase>");
    }

    fn connector(&mut self, connector: &Connector) {
        self.open(Tag::new("causalConnector").attr("id", &connector.id).open());

        let compound = connector.conditions.len() > 1;
        if compound {
            self.open(r#"<compoundCondition operator="and">"#);
        }
        for (role, binding) in &connector.conditions {
            let mut tag = Tag::new("simpleCondition").attr("role", role.as_str());
            if binding.count > 1 {
                tag = tag.attr("max", "unbounded").attr("qualifier", "and");
            }
            if *role == ConditionRole::OnSelection && connector.declares_key() {
                tag = tag.attr("key", "$_keyValue");
            }
            self.line(tag.empty());
        }
        if compound {
            self.close("</compoundCondition>");
        }

        let compound = connector.actions.len() > 1;
        if compound {
            self.open(r#"<compoundAction operator="par">"#);
        }
        for (role, binding) in &connector.actions {
            let mut tag = Tag::new("simpleAction").attr("role", role.as_str());
            if binding.count > 1 {
                tag = tag.attr("max", "unbounded").attr("qualifier", "par");
            }
            for parameter in &binding.parameters {
                tag = tag.attr(parameter, &format!("${parameter}"));
            }
            self.line(tag.empty());
        }
        if compound {
            self.close("</compoundAction>");
        }

        for parameter in &connector.parameters {
            self.line(Tag::new("connectorParam").attr("name", parameter).empty());
        }
        self.close("</causalConnector>");
    }

    fn region(&mut self, region: &RegionNode) {
        let tag = Tag::new("region")
            .attr("id", &region.id)
            .attrs(&region.properties);
        if region.children.is_empty() {
            self.line(tag.empty());
            return;
        }

        self.open(tag.open());
        let symbols = self.symbols;
        let head = symbols.get_head();
        for child in region.children.iter().filter_map(|handle| head.region_at(*handle)) {
            self.region(child);
        }
        self.close("</region>");
    }

    fn descriptor(&mut self, descriptor: &Descriptor) {
        self.line(
            Tag::new("descriptor")
                .attr("id", &descriptor.id)
                .attr("region", &descriptor.region)
                .empty(),
        );
    }

    fn node(&mut self, node: &BodyNode) -> Result<()> {
        match &node.entry {
            BodyEntry::Port(port) => {
                self.validator.port(port, node.father)?;
                self.port(port);
            }
            BodyEntry::Media(media) => {
                self.validator.media(media)?;
                self.media(media);
            }
            BodyEntry::Link(link) => self.link(link, node.father)?,
            BodyEntry::Context(context) => {
                self.open(Tag::new("context").attr("id", &context.id).open());
                let symbols = self.symbols;
                for child in context
                    .children
                    .iter()
                    .filter_map(|handle| symbols.body_node(*handle))
                {
                    self.node(child)?;
                }
                self.close("</context>");
            }
        }
        Ok(())
    }

    fn port(&mut self, port: &Port) {
        self.line(
            Tag::new("port")
                .attr("id", &port.id)
                .attr("component", &port.component)
                .attr_opt("interface", port.interface.as_deref())
                .empty(),
        );
    }

    fn media(&mut self, media: &Media) {
        self.open(
            Tag::new("media")
                .attr("id", &media.id)
                .attr_opt("type", media.kind.as_deref())
                .attr_opt("src", media.src.as_deref())
                .attr_opt("descriptor", media.descriptor.as_deref())
                .open(),
        );
        for (name, value) in &media.properties {
            self.line(
                Tag::new("property")
                    .attr("name", name)
                    .attr("value", value)
                    .empty(),
            );
        }
        for area in &media.areas {
            self.area(area);
        }
        self.close("</media>");
    }

    fn area(&mut self, area: &Area) {
        self.line(
            Tag::new("area")
                .attr("id", &area.id)
                .attrs(&area.properties)
                .empty(),
        );
    }

    fn link(&mut self, link: &Link, father: Option<NodeId>) -> Result<()> {
        self.open(Tag::new("link").attr("xconnector", &link.connector).open());
        for condition in &link.conditions {
            self.bind(condition, condition.role.as_str(), father)?;
        }
        for action in &link.actions {
            self.bind(action, action.role.as_str(), father)?;
        }
        for (name, value) in &link.properties {
            self.line(
                Tag::new("linkParam")
                    .attr("name", name)
                    .attr("value", value)
                    .empty(),
            );
        }
        self.close("</link>");
        Ok(())
    }

    fn bind<R>(&mut self, bind: &Bind<R>, role: &str, father: Option<NodeId>) -> Result<()> {
        self.validator.bind(bind, father)?;

        let tag = Tag::new("bind")
            .attr("role", role)
            .attr("component", &bind.component)
            .attr_opt("interface", bind.interface.as_deref());
        if bind.properties.is_empty() {
            self.line(tag.empty());
            return Ok(());
        }

        self.open(tag.open());
        for (name, value) in &bind.properties {
            self.line(
                Tag::new("bindParam")
                    .attr("name", name)
                    .attr("value", value)
                    .empty(),
            );
        }
        self.close("</bind>");
        Ok(())
    }
}
