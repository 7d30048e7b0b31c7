//! NCL output
//!
//! [generation] walks the resolved symbol table and writes the NCL document.
//! Cross references are checked by the [validator] right before the element
//! that carries them is written, so a failed check leaves no partial document.

pub mod generation;
pub mod validator;

pub use generation::{generate, Generator, NCL_NAMESPACE, XML_DECLARATION};
