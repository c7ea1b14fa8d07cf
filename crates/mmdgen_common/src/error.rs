//! Library error types.
//!
//! Only environment and input problems surface as errors. A rendering
//! failure is not an error: it is captured in the generation outcome so the
//! caller always receives actionable recovery guidance. Catalog problems
//! never surface at all.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MmdgenError {
    /// The external renderer is not installed. Fatal for the whole
    /// workflow, distinct from any per-diagram failure.
    #[error("mmdc not found. Install with: npm install -g @mermaid-js/mermaid-cli")]
    RendererUnavailable,

    /// No diagram source content supplied.
    #[error("no diagram source provided")]
    EmptyInput,

    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
