//! Macro expansion
//!
//! Every queued top-level call is expanded in order. Expanding a call binds the
//! macro's parameters to the call's arguments, pushes that binding as a frame,
//! copies the macro body with every parameter occurrence substituted from the
//! top frame, registers the copies exactly like the builder registers source
//! elements, and pops the frame again.
//!
//! Arguments:
//!
//! - a literal is bound as written, minus surrounding quotes
//! - an identifier forwards a parameter of the macro whose body contains the
//!   call; only that one level is visible, and a top-level call may not pass
//!   identifiers at all
//!
//! Nested calls push their own frame. Expansion fails once `max_depth` frames
//! are active, which is how a self-recursive macro ends.

use crate::sncl::ast::{
    Area, Argument, Bind, BodyElement, Context, Link, Macro, MacroCall, MacroItem, Media, Port,
    Properties, Region,
};
use crate::sncl::error::{ErrorKind, Result};
use crate::sncl::lexing::patterns::remove_quotes;
use crate::sncl::symbols::{HeadElement, SymbolTable};
use crate::sncl::synthesis::{materialize, rewrite_control_key};
use indexmap::IndexMap;

/// Parameter bindings of one active call.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    macro_id: String,
    bindings: IndexMap<String, String>,
}

struct Resolver<'t> {
    symbols: &'t mut SymbolTable,
    stack: Vec<Frame>,
    max_depth: usize,
    expanded: usize,
}

/// Expand every queued macro call into the symbol table.
pub fn resolve_macros(symbols: &mut SymbolTable, max_depth: usize) -> Result<()> {
    let calls = symbols.macro_calls().to_vec();
    let mut resolver = Resolver {
        symbols,
        stack: Vec::new(),
        max_depth,
        expanded: 0,
    };

    for call in &calls {
        resolver.call(call)?;
    }

    tracing::debug!(
        calls = calls.len(),
        expansions = resolver.expanded,
        "resolved macro calls"
    );
    Ok(())
}

impl Resolver<'_> {
    fn call(&mut self, call: &MacroCall) -> Result<()> {
        let definition = self
            .symbols
            .get_macro(&call.macro_id)
            .cloned()
            .ok_or_else(|| {
                self.symbols
                    .error(ErrorKind::MacroNotDeclared(call.macro_id.clone()), call.line)
            })?;

        if definition.parameters.len() != call.arguments.len() {
            return Err(self.symbols.error(
                ErrorKind::ArityMismatch {
                    macro_id: call.macro_id.clone(),
                    expected: definition.parameters.len(),
                    found: call.arguments.len(),
                },
                call.line,
            ));
        }

        let mut bindings = IndexMap::new();
        for (parameter, argument) in definition.parameters.iter().zip(&call.arguments) {
            let value = match argument {
                Argument::Literal(literal) => remove_quotes(literal),
                Argument::Identifier(name) => self.forward(call, name)?,
            };
            bindings.insert(parameter.clone(), value);
        }

        if self.stack.len() >= self.max_depth {
            return Err(self.symbols.error(
                ErrorKind::ExpansionDepthExceeded(self.max_depth, call.macro_id.clone()),
                call.line,
            ));
        }

        tracing::trace!(macro_id = %call.macro_id, depth = self.stack.len() + 1, "push frame");
        self.stack.push(Frame {
            macro_id: call.macro_id.clone(),
            bindings,
        });
        self.expanded += 1;

        let result = self.expand(&definition);

        if let Some(frame) = self.stack.pop() {
            tracing::trace!(macro_id = %frame.macro_id, depth = self.stack.len(), "pop frame");
        }
        result
    }

    /// The value an identifier argument forwards from the enclosing macro.
    fn forward(&self, call: &MacroCall, name: &str) -> Result<String> {
        let Some(enclosing) = call.enclosing.as_deref() else {
            return Err(self
                .symbols
                .error(
                    ErrorKind::InvalidArgument {
                        argument: name.to_string(),
                        macro_id: None,
                    },
                    call.line,
                ));
        };

        let declared = self
            .symbols
            .get_macro(enclosing)
            .is_some_and(|definition| definition.parameters.contains(name));
        let bound = self
            .stack
            .last()
            .and_then(|frame| frame.bindings.get(name))
            .filter(|_| declared);

        bound.cloned().ok_or_else(|| {
            self.symbols.error(
                ErrorKind::InvalidArgument {
                    argument: name.to_string(),
                    macro_id: Some(enclosing.to_string()),
                },
                call.line,
            )
        })
    }

    fn expand(&mut self, definition: &Macro) -> Result<()> {
        for item in &definition.children {
            match item {
                MacroItem::Call(call) => self.call(call)?,
                MacroItem::Region(region) => {
                    let region = self.region(region);
                    self.symbols.add_head(HeadElement::Region(region))?;
                }
                MacroItem::Port(port) => self.register(BodyElement::Port(self.port(port)))?,
                MacroItem::Media(media) => self.register(BodyElement::Media(self.media(media)))?,
                MacroItem::Context(context) => {
                    self.register(BodyElement::Context(self.context(context)))?
                }
                MacroItem::Link(link) => self.register(BodyElement::Link(self.link(link)))?,
            }
        }
        Ok(())
    }

    fn register(&mut self, mut element: BodyElement) -> Result<()> {
        materialize(&mut element, self.symbols)?;
        self.symbols.add_body(element)?;
        Ok(())
    }

    /// Substitute a parameter from the top frame; anything else loses its quotes.
    fn value(&self, text: &str) -> String {
        self.stack
            .last()
            .and_then(|frame| frame.bindings.get(text))
            .cloned()
            .unwrap_or_else(|| remove_quotes(text))
    }

    fn optional(&self, text: Option<&str>) -> Option<String> {
        text.map(|text| self.value(text))
    }

    fn properties(&self, properties: &Properties) -> Properties {
        properties
            .iter()
            .map(|(name, value)| (name.clone(), self.value(value)))
            .collect()
    }

    fn port(&self, port: &Port) -> Port {
        Port {
            id: self.value(&port.id),
            line: port.line,
            component: self.value(&port.component),
            interface: self.optional(port.interface.as_deref()),
        }
    }

    fn area(&self, area: &Area) -> Area {
        Area {
            id: self.value(&area.id),
            line: area.line,
            properties: self.properties(&area.properties),
        }
    }

    fn media(&self, media: &Media) -> Media {
        Media {
            id: self.value(&media.id),
            line: media.line,
            region: self.optional(media.region.as_deref()),
            descriptor: None,
            src: self.optional(media.src.as_deref()),
            kind: self.optional(media.kind.as_deref()),
            properties: self.properties(&media.properties),
            areas: media.areas.iter().map(|area| self.area(area)).collect(),
        }
    }

    fn region(&self, region: &Region) -> Region {
        Region {
            id: self.value(&region.id),
            line: region.line,
            properties: self.properties(&region.properties),
            children: region
                .children
                .iter()
                .map(|child| self.region(child))
                .collect(),
        }
    }

    fn bind<R: Copy>(&self, bind: &Bind<R>) -> Bind<R> {
        Bind {
            role: bind.role,
            line: bind.line,
            component: self.value(&bind.component),
            interface: self.optional(bind.interface.as_deref()),
            properties: self.properties(&bind.properties),
        }
    }

    fn link(&self, link: &Link) -> Link {
        let conditions = link
            .conditions
            .iter()
            .map(|condition| {
                let mut condition = self.bind(condition);
                rewrite_control_key(&mut condition);
                condition
            })
            .collect();

        Link {
            line: link.line,
            conditions,
            actions: link.actions.iter().map(|action| self.bind(action)).collect(),
            properties: self.properties(&link.properties),
            connector: String::new(),
        }
    }

    fn context(&self, context: &Context) -> Context {
        Context {
            id: self.value(&context.id),
            line: context.line,
            children: context
                .children
                .iter()
                .map(|child| self.body(child))
                .collect(),
        }
    }

    fn body(&self, element: &BodyElement) -> BodyElement {
        match element {
            BodyElement::Port(port) => BodyElement::Port(self.port(port)),
            BodyElement::Media(media) => BodyElement::Media(self.media(media)),
            BodyElement::Link(link) => BodyElement::Link(self.link(link)),
            BodyElement::Context(context) => BodyElement::Context(self.context(context)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sncl::building::build;
    use crate::sncl::lexing::tokenize;
    use crate::sncl::parsing::parse;
    use crate::sncl::symbols::BodyEntry;

    fn resolve(source: &str) -> Result<SymbolTable> {
        let cst = parse(tokenize(source).unwrap()).unwrap();
        let mut symbols = build(&cst, "test.sncl")?.symbols;
        resolve_macros(&mut symbols, 64)?;
        Ok(symbols)
    }

    fn media<'a>(symbols: &'a SymbolTable, id: &str) -> &'a Media {
        match &symbols.find_body(id).unwrap().entry {
            BodyEntry::Media(media) => media,
            other => panic!("expected media, found {:?}", other),
        }
    }

    #[test]
    fn substitutes_literal_arguments() {
        let source = r#"
region screen end
macro show(id, file, where)
    media id src: file rg: where alt: "caption" end
end
show("m1", "a.png", "screen")
"#;
        let symbols = resolve(source).unwrap();
        let media = media(&symbols, "m1");
        assert_eq!(media.src.as_deref(), Some("a.png"));
        assert_eq!(media.descriptor.as_deref(), Some("__desc__screen"));
        assert_eq!(media.properties["alt"], "caption");
        assert!(symbols.get_head().descriptors.contains_key("__desc__screen"));
    }

    #[test]
    fn forwards_parameters_to_nested_calls() {
        let source = r#"
macro leaf(name, file)
    media name src: file end
end
macro pair(first, second)
    leaf(first, "a.png")
    leaf(second, "b.png")
    port entry first
end
pair("m1", "m2")
"#;
        let symbols = resolve(source).unwrap();
        assert_eq!(media(&symbols, "m1").src.as_deref(), Some("a.png"));
        assert_eq!(media(&symbols, "m2").src.as_deref(), Some("b.png"));
        match &symbols.find_body("entry").unwrap().entry {
            BodyEntry::Port(port) => assert_eq!(port.component, "m1"),
            other => panic!("expected port, found {:?}", other),
        }
    }

    #[test]
    fn expanded_links_get_connectors_and_key_rewrite() {
        let source = r#"
media menu end
media video end
macro onKey(key, target)
    onSelection menu.key do start target end end
end
onKey("RED", "video")
"#;
        let symbols = resolve(source).unwrap();
        let link = symbols
            .get_body()
            .values()
            .find_map(|node| match &node.entry {
                BodyEntry::Link(link) => Some(link),
                _ => None,
            })
            .unwrap();
        assert_eq!(link.conditions[0].interface, None);
        assert_eq!(link.conditions[0].properties["_keyValue"], "RED");
        assert_eq!(link.actions[0].component, "video");
        assert_eq!(link.connector, "onSelection_start");
        assert!(symbols.get_head().connectors["onSelection_start"].declares_key());
    }

    #[test]
    fn undeclared_macro() {
        let err = resolve("\nmissing(\"a\")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MacroNotDeclared("missing".to_string()));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn arity_mismatch() {
        let err = resolve("macro m(a, b) end\nm(\"x\")").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::ArityMismatch {
                macro_id: "m".to_string(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn top_level_identifier_arguments_are_invalid() {
        let err = resolve("macro m(a) end\nm(x)").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidArgument {
                argument: "x".to_string(),
                macro_id: None
            }
        );
        assert_eq!(
            err.to_string(),
            "test.sncl:2:Argument x is invalid. Did you mean \"x\""
        );
        assert_eq!(err.line, 2);
    }

    #[test]
    fn forwarded_identifier_must_be_a_parameter() {
        let source = "macro inner(a) end\nmacro outer(a)\n inner(b)\nend\nouter(\"v\")";
        let err = resolve(source).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidArgument {
                argument: "b".to_string(),
                macro_id: Some("outer".to_string())
            }
        );
        assert!(err
            .to_string()
            .ends_with("Argument b is not a parameter of macro outer()"));
        assert_eq!(err.line, 3);
    }

    #[test]
    fn recursion_hits_the_depth_limit() {
        let source = "macro loop(a) loop(a) end\nloop(\"x\")";
        let cst = parse(tokenize(source).unwrap()).unwrap();
        let mut symbols = build(&cst, "test.sncl").unwrap().symbols;
        let err = resolve_macros(&mut symbols, 8).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::ExpansionDepthExceeded(8, "loop".to_string())
        );
    }

    #[test]
    fn expanded_duplicates_are_reported() {
        let source = "macro m(id) port id x end\nm(\"p\")\nm(\"p\")";
        let err = resolve(source).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IdentifierAlreadyExists("p".to_string()));
    }
}
