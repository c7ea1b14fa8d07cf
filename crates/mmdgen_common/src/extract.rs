//! Mermaid block extraction from markdown documents.
//!
//! Finds fenced ```` ```mermaid ```` blocks, lists them with position
//! metadata, saves each to its own `.mmd` file, or rewrites the document
//! with image references in place of the source blocks.

use crate::error::MmdgenError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

static MERMAID_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```mermaid\s*\n(.*?)```").expect("valid regex"));

/// Preview length for the signature line in listings.
const FIRST_LINE_PREVIEW: usize = 50;

/// One Mermaid block found in a markdown document.
#[derive(Debug, Clone, Serialize)]
pub struct MermaidBlock {
    /// 1-based position among the document's blocks.
    pub index: usize,
    /// 1-based line number of the opening fence.
    pub line_number: usize,
    /// Block content, fences stripped.
    pub content: String,
}

impl MermaidBlock {
    /// First line of the block, truncated for display.
    pub fn first_line(&self) -> String {
        let line = self.content.lines().next().unwrap_or("").trim();
        if line.chars().count() > FIRST_LINE_PREVIEW {
            let truncated: String = line.chars().take(FIRST_LINE_PREVIEW).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Extraction filename: `{prefix}-{index:03}.{extension}`.
    pub fn filename(&self, prefix: &str, extension: &str) -> String {
        format!("{}-{:03}.{}", prefix, self.index, extension)
    }
}

/// Extracts and rewrites Mermaid blocks in one markdown document.
pub struct MarkdownExtractor {
    content: String,
    blocks: Vec<MermaidBlock>,
}

impl MarkdownExtractor {
    pub fn new(content: String) -> Self {
        let blocks = MERMAID_BLOCK_RE
            .captures_iter(&content)
            .enumerate()
            .map(|(i, captures)| {
                let whole = captures.get(0).expect("group 0 always present");
                let body = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                MermaidBlock {
                    index: i + 1,
                    line_number: content[..whole.start()].matches('\n').count() + 1,
                    content: body.trim().to_string(),
                }
            })
            .collect();

        Self { content, blocks }
    }

    pub fn from_file(path: &Path) -> Result<Self, MmdgenError> {
        let content = fs::read_to_string(path).map_err(|source| MmdgenError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(content))
    }

    pub fn blocks(&self) -> &[MermaidBlock] {
        &self.blocks
    }

    /// Save every block to `{output_dir}/{prefix}-{index:03}.mmd`.
    pub fn save_blocks(&self, output_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, MmdgenError> {
        fs::create_dir_all(output_dir).map_err(|source| MmdgenError::WriteArtifact {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut saved = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let path = output_dir.join(block.filename(prefix, "mmd"));
            fs::write(&path, &block.content).map_err(|source| MmdgenError::WriteArtifact {
                path: path.clone(),
                source,
            })?;
            saved.push(path);
        }

        Ok(saved)
    }

    /// Rewrite the document, replacing each Mermaid block with an image
    /// reference into `image_dir`.
    pub fn replace_with_images(&self, prefix: &str, extension: &str, image_dir: &str) -> String {
        let mut index = 0usize;
        MERMAID_BLOCK_RE
            .replace_all(&self.content, |_caps: &Captures<'_>| {
                index += 1;
                let filename = format!("{}-{:03}.{}", prefix, index, extension);
                format!("![Diagram {}]({}/{})", index, image_dir, filename)
            })
            .into_owned()
    }
}
