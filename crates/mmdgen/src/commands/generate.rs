//! `mmdgen generate` — the resilient generation workflow.
//!
//! Input problems abort before any file I/O; a missing renderer aborts the
//! whole workflow with its own exit code; a failed render still exits
//! through the outcome report so the caller gets recovery guidance.

use crate::display;
use crate::errors::{EXIT_GENERAL_ERROR, EXIT_NO_INPUT, EXIT_RENDERER_UNAVAILABLE, EXIT_SUCCESS};
use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use mmdgen_common::config::Config;
use mmdgen_common::error::MmdgenError;
use mmdgen_common::generator::{DiagramGenerator, GenerationRequest};
use mmdgen_common::render_options::{ImageFormat, RenderOptions, Theme};
use mmdgen_common::renderer::MmdcRenderer;
use mmdgen_common::troubleshooting::Troubleshooting;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["code", "input", "stdin"])))]
pub struct GenerateArgs {
    /// Mermaid code string
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Path to an existing .mmd file
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Read Mermaid code from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Source document name for the naming convention
    #[arg(long, short = 'm', default_value = "diagram")]
    pub doc_name: String,

    /// Diagram number within the document
    #[arg(long, short = 'n', default_value_t = 1)]
    pub ordinal: u32,

    /// Diagram title for the naming convention
    #[arg(long, short = 't', default_value = "diagram")]
    pub title: String,

    /// Output directory (overrides config)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Image format (overrides config)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<ImageFormat>,

    /// Mermaid theme (overrides config)
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Background color (overrides config)
    #[arg(long)]
    pub background: Option<String>,

    /// Output width in pixels (overrides config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels (overrides config)
    #[arg(long)]
    pub height: Option<u32>,

    /// Scale factor 1-3 (overrides config)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Troubleshooting catalog override (discovered if not given)
    #[arg(long)]
    pub troubleshooting: Option<PathBuf>,

    /// Emit the outcome as JSON
    #[arg(long, short = 'j')]
    pub json: bool,
}

pub async fn run(args: GenerateArgs, config: &Config) -> Result<i32> {
    let code = match read_source(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            return Ok(EXIT_NO_INPUT);
        }
    };
    if code.trim().is_empty() {
        eprintln!("ERROR: no Mermaid code provided");
        return Ok(EXIT_NO_INPUT);
    }

    // Probe the renderer once before touching the filesystem.
    if let Err(err) = MmdcRenderer::probe().await {
        eprintln!("ERROR: {}", err);
        return Ok(EXIT_RENDERER_UNAVAILABLE);
    }

    let troubleshooting = match &args.troubleshooting {
        Some(path) => Troubleshooting::load(path),
        None => Troubleshooting::discover(),
    };

    let request = GenerationRequest {
        code,
        document_name: args.doc_name.clone(),
        ordinal: args.ordinal,
        title: args.title.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output.dir.clone()),
        format: args.format.unwrap_or(config.output.format),
    };

    let renderer = MmdcRenderer::new(build_options(&args, config));
    let generator = DiagramGenerator::new(renderer, troubleshooting);

    let outcome = match generator.generate(&request).await {
        Ok(outcome) => outcome,
        Err(MmdgenError::EmptyInput) => {
            eprintln!("ERROR: no Mermaid code provided");
            return Ok(EXIT_NO_INPUT);
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", outcome.to_json()?);
    } else {
        display::print_outcome(&outcome);
    }

    Ok(if outcome.success {
        EXIT_SUCCESS
    } else {
        EXIT_GENERAL_ERROR
    })
}

/// Resolve the diagram source from the selected input channel.
fn read_source(args: &GenerateArgs) -> Result<String> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    if let Some(path) = &args.input {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

/// Config render options with CLI flag overrides applied.
fn build_options(args: &GenerateArgs, config: &Config) -> RenderOptions {
    let mut options = config.render.clone();
    if let Some(theme) = args.theme {
        options.theme = theme;
    }
    if let Some(background) = &args.background {
        options.background = background.clone();
    }
    if args.width.is_some() {
        options.width = args.width;
    }
    if args.height.is_some() {
        options.height = args.height;
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    options
}
