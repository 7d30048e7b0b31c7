//! AST definitions for the sncl format
//!
//! Document elements
//!
//!     An sncl document declares regions (screen areas, nested), media objects (with
//!     optional areas), ports (entry points into a component), links (a condition
//!     triggering actions) and contexts (groups of ports, media, links and contexts).
//!     Macros are parameterized templates over those elements and macro calls
//!     instantiate them.
//!
//!     Descriptors and connectors never appear in the source. They are synthesized
//!     from media region bindings and link shapes respectively, see
//!     [synthesis](crate::sncl::synthesis).
//!
//! Namespaces
//!
//!     Regions, descriptors and connectors live in the head namespace. Ports, media,
//!     links and contexts live in the body namespace. Both are kept in the
//!     [symbol table](crate::sncl::symbols).

pub mod elements;
pub mod roles;

pub use elements::{
    Action, Area, Argument, Bind, BodyElement, Condition, Connector, Context, Descriptor,
    Document, Link, Macro, MacroCall, MacroItem, Media, Port, Properties, Region, RoleBinding,
};
pub use roles::{is_control_button, ActionRole, ConditionRole};
