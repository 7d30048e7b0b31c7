//! Element types
//!
//! Owned, tree-shaped values produced by the builder and held as macro templates.
//! Once registered in the symbol table, body elements and regions are re-homed
//! into arenas where parent links are stored as handles (see
//! [symbols](crate::sncl::symbols)).

use super::roles::{ActionRole, ConditionRole};
use indexmap::{IndexMap, IndexSet};

/// Property name to value, in declaration order. Redeclaring a name keeps its
/// first position and the last value.
pub type Properties = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: String,
    pub line: usize,
    pub component: String,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub id: String,
    pub line: usize,
    /// The `rg` property.
    pub region: Option<String>,
    /// Derived from `region` when the media is materialized.
    pub descriptor: Option<String>,
    pub src: Option<String>,
    /// The `type` property.
    pub kind: Option<String>,
    pub properties: Properties,
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub id: String,
    pub line: usize,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub line: usize,
    pub properties: Properties,
    pub children: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub id: String,
    pub line: usize,
    pub children: Vec<BodyElement>,
}

/// A condition or action attachment inside a link. The owning link is always the
/// container holding the bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind<R> {
    pub role: R,
    pub line: usize,
    pub component: String,
    pub interface: Option<String>,
    pub properties: Properties,
}

pub type Condition = Bind<ConditionRole>;
pub type Action = Bind<ActionRole>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub line: usize,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    pub properties: Properties,
    /// Id of the synthesized connector; empty until the link is materialized.
    pub connector: String,
}

/// Anything that lives in the body namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    Port(Port),
    Media(Media),
    Link(Link),
    Context(Context),
}

impl BodyElement {
    /// The user-visible id; links have none.
    pub fn id(&self) -> Option<&str> {
        match self {
            BodyElement::Port(port) => Some(&port.id),
            BodyElement::Media(media) => Some(&media.id),
            BodyElement::Context(context) => Some(&context.id),
            BodyElement::Link(_) => None,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            BodyElement::Port(port) => port.line,
            BodyElement::Media(media) => media.line,
            BodyElement::Context(context) => context.line,
            BodyElement::Link(link) => link.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A literal value, kept exactly as written (quotes included).
    Literal(String),
    /// A bare identifier; only valid when forwarding a parameter of the enclosing macro.
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall {
    pub line: usize,
    pub macro_id: String,
    pub arguments: Vec<Argument>,
    /// The macro whose body contains this call, if any.
    pub enclosing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroItem {
    Port(Port),
    Media(Media),
    Region(Region),
    Context(Context),
    Link(Link),
    Call(MacroCall),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub id: String,
    pub line: usize,
    pub parameters: IndexSet<String>,
    pub children: Vec<MacroItem>,
}

/// Presentation binding between media and a region. Always synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub id: String,
    pub region: String,
}

/// How one role is bound across a link: how often it occurs and which parameter
/// names its binds carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleBinding {
    pub count: usize,
    pub parameters: IndexSet<String>,
}

/// A causal connector, derived from the shape of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub id: String,
    pub conditions: IndexMap<ConditionRole, RoleBinding>,
    pub actions: IndexMap<ActionRole, RoleBinding>,
    pub parameters: IndexSet<String>,
}

/// The tree the builder produces for one source file, in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub regions: Vec<Region>,
    pub body: Vec<BodyElement>,
    pub macros: Vec<Macro>,
    pub calls: Vec<MacroCall>,
}

impl Document {
    pub fn iter_ports(&self) -> impl Iterator<Item = &Port> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Port(port) => Some(port),
            _ => None,
        })
    }

    pub fn iter_media(&self) -> impl Iterator<Item = &Media> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Media(media) => Some(media),
            _ => None,
        })
    }

    pub fn iter_links(&self) -> impl Iterator<Item = &Link> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Link(link) => Some(link),
            _ => None,
        })
    }

    pub fn iter_contexts(&self) -> impl Iterator<Item = &Context> {
        self.body.iter().filter_map(|element| match element {
            BodyElement::Context(context) => Some(context),
            _ => None,
        })
    }
}
