//! Generation orchestrator.
//!
//! Sequences one generation attempt: classify the source, derive the
//! artifact base name, persist the `.mmd` file, invoke the renderer, and on
//! failure consult the knowledge base for recovery guidance. The outcome
//! always carries an actionable next step.

use crate::category::{classify, DiagramCategory};
use crate::error::MmdgenError;
use crate::matcher::FailureMatcher;
use crate::naming::base_filename;
use crate::outcome::GenerationOutcome;
use crate::render_options::ImageFormat;
use crate::renderer::Renderer;
use crate::troubleshooting::Troubleshooting;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Raw Mermaid source.
    pub code: String,
    /// Source document name feeding the artifact naming convention.
    pub document_name: String,
    /// Diagram ordinal within the document.
    pub ordinal: u32,
    /// Diagram title feeding the artifact naming convention.
    pub title: String,
    /// Directory receiving the `.mmd` and image artifacts.
    pub output_dir: PathBuf,
    /// Rendered image format.
    pub format: ImageFormat,
}

/// Orchestrates classify → name → persist → render → recover.
pub struct DiagramGenerator<R: Renderer> {
    renderer: R,
    troubleshooting: Troubleshooting,
}

impl<R: Renderer> DiagramGenerator<R> {
    /// The knowledge base is injected, parsed once by the caller; an empty
    /// one degrades matching but never blocks generation.
    pub fn new(renderer: R, troubleshooting: Troubleshooting) -> Self {
        Self {
            renderer,
            troubleshooting,
        }
    }

    pub fn troubleshooting(&self) -> &Troubleshooting {
        &self.troubleshooting
    }

    /// Execute the full resilient generation workflow.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, MmdgenError> {
        let code = request.code.trim();
        if code.is_empty() {
            return Err(MmdgenError::EmptyInput);
        }

        let category = classify(code);
        let base = base_filename(
            &request.document_name,
            request.ordinal,
            category,
            &request.title,
        );
        debug!("category {} -> base filename {}", category, base);

        let mmd_path = self
            .save_source(code, &request.output_dir, &base)
            .await?;
        let image_path = request
            .output_dir
            .join(format!("{}.{}", base, request.format.extension()));

        let attempt = self.renderer.render(&mmd_path, &image_path).await;

        if attempt.success {
            info!(
                "rendered {} in {}ms",
                image_path.display(),
                attempt.duration_ms
            );
            return Ok(GenerationOutcome::succeeded(mmd_path, image_path, category));
        }

        let error_message = attempt
            .error
            .unwrap_or_else(|| "Unknown rendering error".to_string());
        Ok(self.recover(mmd_path, category, error_message))
    }

    /// Persist the diagram source under the naming convention.
    async fn save_source(
        &self,
        code: &str,
        output_dir: &Path,
        base: &str,
    ) -> Result<PathBuf, MmdgenError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| MmdgenError::WriteArtifact {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let mmd_path = output_dir.join(format!("{}.mmd", base));
        let mut content = code.to_string();
        content.push('\n');
        tokio::fs::write(&mmd_path, content)
            .await
            .map_err(|source| MmdgenError::WriteArtifact {
                path: mmd_path.clone(),
                source,
            })?;

        Ok(mmd_path)
    }

    /// Build the failure outcome: ranked matches, suggested fix from the
    /// best match, search query when nothing trustworthy matched.
    fn recover(
        &self,
        mmd_path: PathBuf,
        category: DiagramCategory,
        error_message: String,
    ) -> GenerationOutcome {
        let matcher = FailureMatcher::new(self.troubleshooting.entries());
        let ranked = matcher.rank(&error_message, category);

        let suggested_fix = ranked
            .first()
            .map(|best| best.entry.correct_example.clone())
            .filter(|example| !example.is_empty());

        let search_query = if FailureMatcher::needs_search_fallback(&ranked) {
            Some(matcher.search_query(&error_message, category))
        } else {
            None
        };

        info!(
            "render failed, {} troubleshooting match(es){}",
            ranked.len(),
            if search_query.is_some() {
                ", recommending search"
            } else {
                ""
            }
        );

        GenerationOutcome::failed(
            mmd_path,
            category,
            error_message,
            &ranked,
            suggested_fix,
            search_query,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderAttempt;
    use std::time::Instant;

    /// Scripted renderer: succeeds, or fails with fixed error text.
    struct StubRenderer {
        error: Option<String>,
    }

    impl StubRenderer {
        fn succeeding() -> Self {
            Self { error: None }
        }

        fn failing(message: &str) -> Self {
            Self {
                error: Some(message.to_string()),
            }
        }
    }

    impl Renderer for StubRenderer {
        async fn render(&self, _source: &Path, image: &Path) -> RenderAttempt {
            let start = Instant::now();
            match &self.error {
                None => {
                    tokio::fs::write(image, b"artifact").await.unwrap();
                    RenderAttempt {
                        success: true,
                        error: None,
                        duration_ms: start.elapsed().as_millis() as u64,
                    }
                }
                Some(message) => RenderAttempt {
                    success: false,
                    error: Some(message.clone()),
                    duration_ms: start.elapsed().as_millis() as u64,
                },
            }
        }
    }

    fn request(dir: &Path, code: &str) -> GenerationRequest {
        GenerationRequest {
            code: code.to_string(),
            document_name: "Design Doc".to_string(),
            ordinal: 1,
            title: "Overview!".to_string(),
            output_dir: dir.to_path_buf(),
            format: ImageFormat::Png,
        }
    }

    const CATALOG: &str = "### ❌ Error 7: Parse Failure\n\n\
**Severity:** 🔴 Critical\n\n\
**Diagram Types Affected:** All diagrams\n\n\
**Problem:** The renderer could not parse the source.\n\n\
**Error Message:** `Parse error`\n\n\
**Correct:**\n```mermaid\nflowchart TD\n    A --> B\n```\n";

    #[tokio::test]
    async fn test_successful_generation_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DiagramGenerator::new(StubRenderer::succeeding(), Troubleshooting::default());

        let outcome = generator
            .generate(&request(dir.path(), "flowchart TD; A-->B"))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.category, DiagramCategory::Flow);
        assert!(outcome.error_message.is_none());
        assert!(outcome.troubleshooting_matches.is_empty());
        assert!(outcome.suggested_fix.is_none());
        assert!(outcome.search_query.is_none());

        // Artifacts follow the naming convention, side by side.
        assert_eq!(
            outcome.mmd_path,
            dir.path().join("design_doc_01_flow_overview.mmd")
        );
        assert_eq!(
            outcome.image_path.as_deref(),
            Some(dir.path().join("design_doc_01_flow_overview.png").as_path())
        );
        let saved = std::fs::read_to_string(&outcome.mmd_path).unwrap();
        assert_eq!(saved, "flowchart TD; A-->B\n");
    }

    #[tokio::test]
    async fn test_failure_consults_knowledge_base() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.md");
        std::fs::write(&catalog_path, CATALOG).unwrap();
        let kb = Troubleshooting::load(&catalog_path);
        assert_eq!(kb.entries().len(), 1);

        let generator =
            DiagramGenerator::new(StubRenderer::failing("Parse error on line 3"), kb);
        let outcome = generator
            .generate(&request(dir.path(), "flowchart TD; A-->B"))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.image_path.is_none());
        assert_eq!(outcome.error_message.as_deref(), Some("Parse error on line 3"));
        assert_eq!(outcome.troubleshooting_matches.len(), 1);
        assert_eq!(outcome.troubleshooting_matches[0].error_number, 7);
        // The top match has a correct example, so it becomes the fix and
        // no search fallback is needed.
        assert!(outcome.suggested_fix.as_deref().unwrap().contains("A --> B"));
        assert!(outcome.search_query.is_none());
    }

    #[tokio::test]
    async fn test_failure_with_empty_catalog_recommends_search() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DiagramGenerator::new(
            StubRenderer::failing("Something exploded"),
            Troubleshooting::default(),
        );

        let outcome = generator
            .generate(&request(dir.path(), "flowchart TD; A-->B"))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.troubleshooting_matches.is_empty());
        assert!(outcome.suggested_fix.is_none());
        let query = outcome.search_query.unwrap();
        assert!(query.contains("flow"));
        assert!(query.contains("Something exploded"));
    }

    #[tokio::test]
    async fn test_empty_input_is_fatal_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DiagramGenerator::new(StubRenderer::succeeding(), Troubleshooting::default());

        let err = generator
            .generate(&request(dir.path(), "   \n  "))
            .await
            .unwrap_err();
        assert!(matches!(err, MmdgenError::EmptyInput));

        // Nothing was written.
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_unknown_category_still_generates() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DiagramGenerator::new(
            StubRenderer::failing("boom"),
            Troubleshooting::default(),
        );

        let outcome = generator
            .generate(&request(dir.path(), "scribbles"))
            .await
            .unwrap();
        assert_eq!(outcome.category, DiagramCategory::Unknown);
        assert!(outcome.search_query.unwrap().contains("unknown"));
    }
}
