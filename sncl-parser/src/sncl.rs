//! Main module for sncl compiler functionality

pub mod ast;
pub mod building;
pub mod error;
pub mod lexing;
pub mod macros;
pub mod ncl;
pub mod parsing;
pub mod pipeline;
pub mod symbols;
pub mod synthesis;
