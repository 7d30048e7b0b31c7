//! Compilation errors
//!
//! Every failure is fatal to the compile that raised it. Stages report the first
//! problem they meet and the pipeline hands exactly one `CompileError` back to the
//! caller. The rendered form is `"<file>:<line>:<message>"`, which is what editor
//! integrations parse to place the diagnostic.

use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Lexing errors detected: {0}")]
    Lex(String),

    #[error("Parsing errors detected!: {0}")]
    Parse(String),

    #[error("[Identifier error]: Element with id \"{0}\" already exists")]
    IdentifierAlreadyExists(String),

    #[error("Duplicate Identifier {0} in macro definition")]
    DuplicateParameter(String),

    #[error("[Macro already exists]: Macro \"{0}\" already exists.")]
    MacroAlreadyExists(String),

    #[error("[Macro is not declared]: Macro {0}() is not declared")]
    MacroNotDeclared(String),

    #[error("Wrong number of arguments: macro {macro_id}() expects {expected}, found {found}")]
    ArityMismatch {
        macro_id: String,
        expected: usize,
        found: usize,
    },

    /// A bare identifier argument that cannot be forwarded. `macro_id` names the
    /// enclosing macro when the call has one.
    #[error("{}", invalid_argument(.argument, .macro_id.as_deref()))]
    InvalidArgument {
        argument: String,
        macro_id: Option<String>,
    },

    #[error("Component with id \"{0}\" does not exist in the same context.")]
    DanglingComponentReference(String),

    #[error("Region with id \"{0}\" does not exist.")]
    MissingRegion(String),

    #[error("Macro expansion exceeded the maximum depth of {0} while calling {1}()")]
    ExpansionDepthExceeded(usize, String),

    #[error("{0}")]
    SourceIo(String),
}

fn invalid_argument(argument: &str, macro_id: Option<&str>) -> String {
    match macro_id {
        Some(macro_id) => format!("Argument {argument} is not a parameter of macro {macro_id}()"),
        None => format!("Argument {argument} is invalid. Did you mean \"{argument}\""),
    }
}

/// A located, fatal compilation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{kind}")]
pub struct CompileError {
    pub file: String,
    pub line: usize,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(kind: ErrorKind, file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            kind,
        }
    }

    /// An I/O failure; these have no meaningful line.
    pub fn io(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceIo(message.into()), file, 0)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
