//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, validation, code generation).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the command manifest.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid or missing.
    #[error("[MESSAGE]:Failed to read path. [PATH]:{path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// The manifest lists no command at all.
    #[error("[MESSAGE]:Command manifest is empty")]
    EmptyManifest,

    /// Command ids must run 0, 1, 2, ... in manifest order.
    #[error("[MESSAGE]:Non contiguous command id [EXPECTED]:{expected} [FOUND]:{found}")]
    NonContiguousId { expected: usize, found: u8 },

    /// Two commands map to the same Rust variant.
    #[error("[MESSAGE]:Duplicate command name [NAME]:{name}")]
    DuplicateName { name: String },

    /// A default value the runtime could not honour.
    #[error("[MESSAGE]:Invalid default [COMMAND]:{name} [FIELD]:{field} [VALUE]:{value}")]
    InvalidDefault {
        name: String,
        field: &'static str,
        value: u8,
    },
}
