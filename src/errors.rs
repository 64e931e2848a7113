//! Unified error handling for rbsgen.
//!
//! Every fallible operation in the crate returns [`Error`]. The taxonomy is
//! small on purpose: evaluation of macro arguments either succeeds, passes
//! the fragment through opaquely, or fails with `UnsupportedFragment`; the
//! remaining variants are boundary failures (I/O, malformed signature table,
//! unparseable host source). Recoverable conditions such as an include
//! argument that is not a module path or a signature-table miss are handled at the
//! call site and never surface here.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read {path}")]
    #[diagnostic(code(rbsgen::io::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    #[diagnostic(code(rbsgen::io::write))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The tree-sitter parser returned no tree at all. Partial parse errors
    /// inside an otherwise readable file are tolerated and do not raise.
    #[error("could not parse Ruby source")]
    #[diagnostic(code(rbsgen::syntax::parse))]
    Parse,

    /// A macro argument used grammar outside the supported literal subset.
    /// Distinct from the opaque pass-through path: opaque fragments are
    /// values, this is a hard error for the enclosing invocation.
    #[error("unsupported expression kind `{kind}` in macro arguments (line {line})")]
    #[diagnostic(code(rbsgen::eval::unsupported))]
    UnsupportedFragment { kind: String, line: usize },

    #[error("invalid signature table {path}")]
    #[diagnostic(code(rbsgen::sig::table))]
    SignatureTable {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Read { path: path.into(), source }
    }

    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Write { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
