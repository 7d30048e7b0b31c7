//! # sncl-parser
//!
//! Compiler core for sNCL, a terse notation for hypermedia documents, targeting the
//! NCL XML dialect.
//!
//! File Layout
//!
//! The compiler is a straight pipeline and the module tree follows it, leaves first:
//! src/sncl
//!   ├── lexing      Source text to classified tokens (logos)
//!   ├── parsing     Tokens to a concrete syntax tree (chumsky)
//!   ├── building    CST to typed elements, populating the symbol table
//!   ├── symbols     Head / body namespaces, macro definitions and pending calls
//!   ├── synthesis   Implicit descriptors and connectors
//!   ├── macros      Macro call expansion
//!   ├── ncl         Validation and XML generation
//!   └── pipeline    The compile entry points tying the stages together
//!
//! Every compile builds its own lexer, parser and symbol table. Nothing is shared
//! between invocations.

pub mod sncl;

pub use sncl::error::{CompileError, ErrorKind};
pub use sncl::pipeline::{
    compile, compile_source, compile_with, CompileOptions, SourceLoader, OUTPUT_EXTENSION,
    SOURCE_EXTENSION,
};
