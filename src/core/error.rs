//! Typed faults raised by the library layer.
//!
//! Per-file faults (`FileFault`) are recovered by the batch runner and turned
//! into a failed verdict. Rule faults (`RuleError`) are fatal: they surface
//! while the rule store is being built, before any file is touched.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A fault that happened while reading or writing a single file.
///
/// The message names the failed step and the OS cause only; the path is
/// available through `path()` so callers can place it themselves.
#[derive(Error, Debug)]
pub enum FileFault {
    /// The file could not be read (missing, permission denied, ...).
    #[error("read failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its bytes are not valid UTF-8.
    #[error("not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The transformed content could not be written back.
    #[error("write failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileFault {
    /// The file the fault happened on.
    pub fn path(&self) -> &Path {
        match self {
            FileFault::Read { path, .. }
            | FileFault::Decode { path, .. }
            | FileFault::Write { path, .. } => path,
        }
    }

    /// Short label used by reporters ("read", "decode", "write").
    pub fn kind(&self) -> &'static str {
        match self {
            FileFault::Read { .. } => "read",
            FileFault::Decode { .. } => "decode",
            FileFault::Write { .. } => "write",
        }
    }
}

/// A malformed rule. Raised while constructing a `RuleStore`.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("literal rule #{index} has an empty source phrase")]
    EmptySource { index: usize },

    #[error("template rule #{index}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "template rule #{index}: replacement references group {group} but `{pattern}` has only {available} group(s)"
    )]
    MissingGroup {
        index: usize,
        pattern: String,
        group: usize,
        available: usize,
    },

    #[error(
        "template rule #{index}: replacement references group `{name}` which `{pattern}` does not define"
    )]
    MissingNamedGroup {
        index: usize,
        pattern: String,
        name: String,
    },

    #[error("template rule #{index}: invalid replacement `{template}`: {reason}")]
    InvalidTemplate {
        index: usize,
        template: String,
        reason: String,
    },
}
