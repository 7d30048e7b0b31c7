//! Cross-reference checks
//!
//! - a port inside a context must name a sibling in that context
//! - a bind must name a sibling in its link's context; for a top-level link any
//!   named element of the document will do
//! - a media bound to a region needs that region in the head
//!
//! Top-level ports are not checked: they may point at components provided by
//! the embedding document.

use crate::sncl::ast::{Bind, Media, Port};
use crate::sncl::error::{CompileError, ErrorKind, Result};
use crate::sncl::symbols::{NodeId, SymbolTable};

pub struct Validator<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Validator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Whether `component` names a non-link child of the context `father`.
    fn is_sibling(&self, father: NodeId, component: &str) -> bool {
        self.symbols
            .context_children(father)
            .any(|child| !child.entry.is_link() && child.entry.id() == Some(component))
    }

    fn dangling(&self, component: &str, line: usize) -> CompileError {
        self.symbols.error(
            ErrorKind::DanglingComponentReference(component.to_string()),
            line,
        )
    }

    pub fn port(&self, port: &Port, father: Option<NodeId>) -> Result<()> {
        match father {
            Some(father) if !self.is_sibling(father, &port.component) => {
                Err(self.dangling(&port.component, port.line))
            }
            _ => Ok(()),
        }
    }

    /// `link_father` is the context enclosing the bind's link.
    pub fn bind<R>(&self, bind: &Bind<R>, link_father: Option<NodeId>) -> Result<()> {
        let found = match link_father {
            Some(father) => self.is_sibling(father, &bind.component),
            None => self.symbols.find_body(&bind.component).is_some(),
        };
        if found {
            Ok(())
        } else {
            Err(self.dangling(&bind.component, bind.line))
        }
    }

    pub fn media(&self, media: &Media) -> Result<()> {
        match &media.region {
            Some(region) if self.symbols.get_head().region(region).is_none() => Err(self
                .symbols
                .error(ErrorKind::MissingRegion(region.clone()), media.line)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncl::ast::{BodyElement, ConditionRole, Context, Properties};

    fn port(id: &str, component: &str) -> Port {
        Port {
            id: id.to_string(),
            line: 3,
            component: component.to_string(),
            interface: None,
        }
    }

    fn media(id: &str, region: Option<&str>) -> Media {
        Media {
            id: id.to_string(),
            line: 5,
            region: region.map(str::to_string),
            descriptor: None,
            src: None,
            kind: None,
            properties: Properties::new(),
            areas: vec![],
        }
    }

    fn table_with_context() -> (SymbolTable, NodeId) {
        let mut symbols = SymbolTable::new("doc.sncl");
        symbols
            .add_body(BodyElement::Media(media("outside", None)))
            .unwrap();
        let context = BodyElement::Context(Context {
            id: "c".to_string(),
            line: 1,
            children: vec![
                BodyElement::Media(media("inside", None)),
                BodyElement::Port(port("p", "inside")),
            ],
        });
        let handle = symbols.add_body(context).unwrap();
        (symbols, handle)
    }

    #[test]
    fn ports_resolve_within_their_context() {
        let (symbols, context) = table_with_context();
        let validator = Validator::new(&symbols);
        assert!(validator.port(&port("p", "inside"), Some(context)).is_ok());

        let err = validator
            .port(&port("q", "outside"), Some(context))
            .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DanglingComponentReference("outside".to_string())
        );
        assert_eq!(err.line, 3);
        assert!(validator.port(&port("r", "anywhere"), None).is_ok());
    }

    #[test]
    fn top_level_binds_use_the_whole_document() {
        let (symbols, context) = table_with_context();
        let validator = Validator::new(&symbols);
        let bind = Bind {
            role: ConditionRole::OnBegin,
            line: 9,
            component: "inside".to_string(),
            interface: None,
            properties: Properties::new(),
        };
        assert!(validator.bind(&bind, None).is_ok());
        assert!(validator.bind(&bind, Some(context)).is_ok());

        let missing = Bind {
            component: "ghost".to_string(),
            ..bind
        };
        assert_eq!(validator.bind(&missing, None).unwrap_err().line, 9);
    }

    #[test]
    fn media_regions_must_exist() {
        let symbols = SymbolTable::new("doc.sncl");
        let validator = Validator::new(&symbols);
        assert!(validator.media(&media("m", None)).is_ok());
        let err = validator.media(&media("m", Some("screen"))).unwrap_err();
        assert_eq!(err.to_string(), "doc.sncl:5:Region with id \"screen\" does not exist.");
    }
}
