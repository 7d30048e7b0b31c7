//! Compile entry points
//!
//! source text -> [tokenize] -> [parse] -> [build] -> [resolve_macros] -> [generate]
//!
//! [compile] and [compile_with] turn a `.sncl` file into its sibling `.ncl` file.
//! The output is written to a temporary file in the same directory and renamed
//! into place, so a failed compile never leaves a partial or modified output.
//! [compile_source] runs the same pipeline in memory.
//!
//! [SourceLoader] exposes the intermediate stages for inspection:
//!
//! ```rust,ignore
//! use sncl_parser::SourceLoader;
//!
//! let loader = SourceLoader::from_string("port p m", "doc.sncl");
//! let tokens = loader.tokenize()?;
//! let cst = loader.parse()?;
//! let document = loader.build()?.document;
//! ```

use crate::sncl::building::{build, BuildOutput};
use crate::sncl::error::{CompileError, Result};
use crate::sncl::lexing::{tokenize, TokenLocation};
use crate::sncl::macros::resolve_macros;
use crate::sncl::ncl::generate;
use crate::sncl::parsing::{parse, CstNode};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const SOURCE_EXTENSION: &str = "sncl";
pub const OUTPUT_EXTENSION: &str = "ncl";

pub const DEFAULT_MAX_MACRO_DEPTH: usize = 64;
pub const DEFAULT_INDENT: &str = "\t";

/// Knobs for a single compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Maximum number of macro calls being expanded at once.
    pub max_macro_depth: usize,
    /// Indentation unit of the generated document.
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_macro_depth: DEFAULT_MAX_MACRO_DEPTH,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

/// Compile `path` with default options; returns the written output path.
pub fn compile(path: impl AsRef<Path>) -> Result<PathBuf> {
    compile_with(path, &CompileOptions::default())
}

pub fn compile_with(path: impl AsRef<Path>, options: &CompileOptions) -> Result<PathBuf> {
    let path = path.as_ref();
    let loader = SourceLoader::from_path(path)?;
    let document = loader.compile(options)?;

    let output = path.with_extension(OUTPUT_EXTENSION);
    write_atomically(&output, &document)
        .map_err(|err| CompileError::io(loader.file_name(), format!("Could not write output: {err}")))?;

    tracing::info!(output = %output.display(), "compiled");
    Ok(output)
}

/// Run the whole pipeline in memory.
#[tracing::instrument(level = "debug", skip(source, options), fields(bytes = source.len()))]
pub fn compile_source(source: &str, file_name: &str, options: &CompileOptions) -> Result<String> {
    let tokens = tokenize(source).map_err(|err| err.into_compile_error(file_name))?;
    let cst = parse(tokens).map_err(|err| err.into_compile_error(file_name))?;
    let BuildOutput { mut symbols, .. } = build(&cst, file_name)?;
    resolve_macros(&mut symbols, options.max_macro_depth)?;
    generate(&symbols, &options.indent)
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// The base name used in diagnostics.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A source plus the name diagnostics should carry, with stage shortcuts.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    source: String,
    file_name: String,
}

impl SourceLoader {
    /// Read a `.sncl` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = display_name(path);

        if path.extension().and_then(OsStr::to_str) != Some(SOURCE_EXTENSION) {
            return Err(CompileError::io(
                file_name,
                format!("Expected a .{SOURCE_EXTENSION} file"),
            ));
        }

        let source = fs::read_to_string(path)
            .map_err(|err| CompileError::io(file_name.as_str(), format!("File not found: {err}")))?;
        Ok(Self { source, file_name })
    }

    pub fn from_string<S: Into<String>>(source: S, file_name: &str) -> Self {
        Self {
            source: source.into(),
            file_name: file_name.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn tokenize(&self) -> Result<Vec<TokenLocation>> {
        tokenize(&self.source).map_err(|err| err.into_compile_error(&self.file_name))
    }

    pub fn parse(&self) -> Result<CstNode> {
        parse(self.tokenize()?).map_err(|err| err.into_compile_error(&self.file_name))
    }

    /// Build the tree and symbol table, before macro expansion.
    pub fn build(&self) -> Result<BuildOutput> {
        build(&self.parse()?, &self.file_name)
    }

    pub fn compile(&self, options: &CompileOptions) -> Result<String> {
        compile_source(&self.source, &self.file_name, options)
    }
}
