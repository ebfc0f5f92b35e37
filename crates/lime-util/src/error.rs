use std::path::PathBuf;
use thiserror::Error;

/// Errors that can originate from the shared utility layer itself,
/// as opposed to lexer/parser/codegen diagnostics (which are flat
/// strings accumulated by those stages, not structured errors).
#[derive(Debug, Error)]
pub enum UtilError {
    #[error("failed to read source file `{path}`: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type UtilResult<T> = Result<T, UtilError>;
