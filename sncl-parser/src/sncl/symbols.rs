//! Symbol table
//!
//! Holds everything a compile knows about once the tree has been built:
//!
//! - the head namespace: regions, descriptors and connectors
//! - the body namespace: ports, media, links and contexts
//! - macro definitions and the queue of top-level macro calls
//!
//! Regions and body elements are stored flat, in insertion order, and refer to
//! their parent by handle. Registering a tree (a context or a region with
//! children) registers every descendant as well, so nested ids share the
//! namespace of their enclosing document.
//!
//! Uniqueness: region ids are unique in the head; port, media and context ids
//! are unique in the body. Links have no user id and are keyed by a sequence
//! number. Descriptors and connectors are derived from their content, so
//! inserting one with an existing id replaces the earlier entry in place.

use crate::sncl::ast::{
    BodyElement, Connector, Context, Descriptor, Link, Macro, MacroCall, Media, Port, Properties,
    Region,
};
use crate::sncl::error::{CompileError, ErrorKind, Result};
use indexmap::IndexMap;

/// Handle to a body entry (its insertion index).
pub type NodeId = usize;

/// Handle to a region (its insertion index).
pub type RegionId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyKey {
    Named(String),
    /// Links, numbered in registration order.
    Link(usize),
}

/// A registered context. Its children live in the body arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextNode {
    pub id: String,
    pub line: usize,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyEntry {
    Port(Port),
    Media(Media),
    Link(Link),
    Context(ContextNode),
}

impl BodyEntry {
    pub fn id(&self) -> Option<&str> {
        match self {
            BodyEntry::Port(port) => Some(&port.id),
            BodyEntry::Media(media) => Some(&media.id),
            BodyEntry::Context(context) => Some(&context.id),
            BodyEntry::Link(_) => None,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, BodyEntry::Link(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyNode {
    /// The enclosing context, if any.
    pub father: Option<NodeId>,
    pub entry: BodyEntry,
}

/// A registered region. Its children live in the region arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNode {
    pub id: String,
    pub line: usize,
    pub properties: Properties,
    pub children: Vec<RegionId>,
    pub parent: Option<RegionId>,
}

/// What can be inserted into the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    Region(Region),
    Descriptor(Descriptor),
    Connector(Connector),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    pub regions: IndexMap<String, RegionNode>,
    pub descriptors: IndexMap<String, Descriptor>,
    pub connectors: IndexMap<String, Connector>,
}

impl Head {
    pub fn region(&self, id: &str) -> Option<&RegionNode> {
        self.regions.get(id)
    }

    pub fn region_at(&self, handle: RegionId) -> Option<&RegionNode> {
        self.regions.get_index(handle).map(|(_, region)| region)
    }

    /// Regions without a parent, in registration order.
    pub fn root_regions(&self) -> impl Iterator<Item = &RegionNode> {
        self.regions.values().filter(|region| region.parent.is_none())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    file_name: String,
    head: Head,
    body: IndexMap<BodyKey, BodyNode>,
    links: usize,
    macros: IndexMap<String, Macro>,
    macro_calls: Vec<MacroCall>,
}

impl SymbolTable {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// Build an error located in this table's file.
    pub fn error(&self, kind: ErrorKind, line: usize) -> CompileError {
        CompileError::new(kind, self.file_name.as_str(), line)
    }

    pub fn get_head(&self) -> &Head {
        &self.head
    }

    pub fn add_head(&mut self, element: HeadElement) -> Result<()> {
        match element {
            HeadElement::Region(region) => {
                self.insert_region(region, None)?;
            }
            HeadElement::Descriptor(descriptor) => {
                self.head.descriptors.insert(descriptor.id.clone(), descriptor);
            }
            HeadElement::Connector(connector) => match self.head.connectors.get_mut(&connector.id) {
                Some(existing) => existing.merge(connector),
                None => {
                    self.head.connectors.insert(connector.id.clone(), connector);
                }
            },
        }
        Ok(())
    }

    fn insert_region(&mut self, region: Region, parent: Option<RegionId>) -> Result<RegionId> {
        if self.head.regions.contains_key(&region.id) {
            return Err(self.error(ErrorKind::IdentifierAlreadyExists(region.id), region.line));
        }

        let Region {
            id,
            line,
            properties,
            children,
        } = region;
        let node = RegionNode {
            id: id.clone(),
            line,
            properties,
            children: Vec::new(),
            parent,
        };
        let (handle, _) = self.head.regions.insert_full(id, node);

        let mut handles = Vec::with_capacity(children.len());
        for child in children {
            handles.push(self.insert_region(child, Some(handle))?);
        }
        if let Some((_, node)) = self.head.regions.get_index_mut(handle) {
            node.children = handles;
        }
        Ok(handle)
    }

    pub fn get_body(&self) -> &IndexMap<BodyKey, BodyNode> {
        &self.body
    }

    /// Register a top-level body element and everything nested in it.
    pub fn add_body(&mut self, element: BodyElement) -> Result<NodeId> {
        self.insert_body(element, None)
    }

    fn insert_body(&mut self, element: BodyElement, father: Option<NodeId>) -> Result<NodeId> {
        let key = match element.id() {
            Some(id) => BodyKey::Named(id.to_string()),
            None => {
                self.links += 1;
                BodyKey::Link(self.links)
            }
        };

        if let BodyKey::Named(id) = &key {
            if self.body.contains_key(&key) {
                return Err(self.error(
                    ErrorKind::IdentifierAlreadyExists(id.clone()),
                    element.line(),
                ));
            }
        }

        let (entry, children) = match element {
            BodyElement::Port(port) => (BodyEntry::Port(port), Vec::new()),
            BodyElement::Media(media) => (BodyEntry::Media(media), Vec::new()),
            BodyElement::Link(link) => (BodyEntry::Link(link), Vec::new()),
            BodyElement::Context(Context { id, line, children }) => (
                BodyEntry::Context(ContextNode {
                    id,
                    line,
                    children: Vec::new(),
                }),
                children,
            ),
        };
        let (handle, _) = self.body.insert_full(key, BodyNode { father, entry });

        if !children.is_empty() {
            let mut handles = Vec::with_capacity(children.len());
            for child in children {
                handles.push(self.insert_body(child, Some(handle))?);
            }
            if let Some((_, BodyNode { entry: BodyEntry::Context(context), .. })) =
                self.body.get_index_mut(handle)
            {
                context.children = handles;
            }
        }
        Ok(handle)
    }

    pub fn body_node(&self, handle: NodeId) -> Option<&BodyNode> {
        self.body.get_index(handle).map(|(_, node)| node)
    }

    /// Look up a named body element anywhere in the document.
    pub fn find_body(&self, id: &str) -> Option<&BodyNode> {
        self.body.get(&BodyKey::Named(id.to_string()))
    }

    /// Body elements without an enclosing context, in registration order.
    pub fn roots(&self) -> impl Iterator<Item = &BodyNode> {
        self.body.values().filter(|node| node.father.is_none())
    }

    /// Children of a registered context; empty for any other handle.
    pub fn context_children(&self, handle: NodeId) -> impl Iterator<Item = &BodyNode> {
        let children: &[NodeId] = match self.body_node(handle) {
            Some(BodyNode {
                entry: BodyEntry::Context(context),
                ..
            }) => context.children.as_slice(),
            _ => &[],
        };
        children.iter().filter_map(|child| self.body_node(*child))
    }

    pub fn add_macro(&mut self, definition: Macro) -> Result<()> {
        if self.macros.contains_key(&definition.id) {
            return Err(self.error(
                ErrorKind::MacroAlreadyExists(definition.id),
                definition.line,
            ));
        }
        self.macros.insert(definition.id.clone(), definition);
        Ok(())
    }

    pub fn macros(&self) -> &IndexMap<String, Macro> {
        &self.macros
    }

    pub fn get_macro(&self, id: &str) -> Option<&Macro> {
        self.macros.get(id)
    }

    pub fn add_macro_call(&mut self, call: MacroCall) {
        self.macro_calls.push(call);
    }

    pub fn macro_calls(&self) -> &[MacroCall] {
        &self.macro_calls
    }

    /// Number of registered (ports, media, links, contexts).
    pub fn body_counts(&self) -> (usize, usize, usize, usize) {
        self.body.values().fold((0, 0, 0, 0), |(p, m, l, c), node| match node.entry {
            BodyEntry::Port(_) => (p + 1, m, l, c),
            BodyEntry::Media(_) => (p, m + 1, l, c),
            BodyEntry::Link(_) => (p, m, l + 1, c),
            BodyEntry::Context(_) => (p, m, l, c + 1),
        })
    }
}
