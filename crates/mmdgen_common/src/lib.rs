//! Mmdgen Common - Resilient Mermaid diagram generation.
//!
//! Core library: diagram category classification, the troubleshooting
//! knowledge base, the failure matcher, and the generation orchestrator.
//! The CLI in the `mmdgen` crate is a thin shell over this.

pub mod category;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod matcher;
pub mod naming;
pub mod outcome;
pub mod render_options;
pub mod renderer;
pub mod troubleshooting;

pub use category::{classify, DiagramCategory};
pub use config::Config;
pub use error::MmdgenError;
pub use generator::{DiagramGenerator, GenerationRequest};
pub use matcher::{FailureMatcher, ScoredMatch};
pub use outcome::{GenerationOutcome, MatchSummary};
pub use render_options::{ImageFormat, RenderOptions, Theme};
pub use renderer::{MmdcRenderer, RenderAttempt, Renderer};
pub use troubleshooting::{FailurePatternEntry, Severity, Troubleshooting};
