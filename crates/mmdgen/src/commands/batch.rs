//! `mmdgen batch` — render every .mmd file under a directory.
//!
//! Files are processed sequentially; each completes or fails
//! independently and failures do not stop the run.

use crate::display;
use crate::errors::{EXIT_GENERAL_ERROR, EXIT_NO_INPUT, EXIT_RENDERER_UNAVAILABLE, EXIT_SUCCESS};
use anyhow::{Context, Result};
use clap::Args;
use mmdgen_common::config::Config;
use mmdgen_common::render_options::ImageFormat;
use mmdgen_common::renderer::{MmdcRenderer, Renderer};
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory containing .mmd files
    pub input_dir: PathBuf,

    /// Write images here instead of next to each source file
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Image format (overrides config)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<ImageFormat>,

    /// Recurse into subdirectories
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

pub async fn run(args: BatchArgs, config: &Config) -> Result<i32> {
    if !args.input_dir.is_dir() {
        eprintln!("ERROR: not a directory: {}", args.input_dir.display());
        return Ok(EXIT_NO_INPUT);
    }

    if let Err(err) = MmdcRenderer::probe().await {
        eprintln!("ERROR: {}", err);
        return Ok(EXIT_RENDERER_UNAVAILABLE);
    }

    let sources = collect_sources(&args.input_dir, args.recursive);
    if sources.is_empty() {
        println!("No .mmd files found in {}", args.input_dir.display());
        return Ok(EXIT_SUCCESS);
    }

    let format = args.format.unwrap_or(config.output.format);
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
    }

    let renderer = MmdcRenderer::new(config.render.clone());
    let mut failed = 0usize;

    println!("Rendering {} diagram(s)...", sources.len());
    for source in &sources {
        let image = image_path(source, args.output_dir.as_deref(), format);
        let attempt = renderer.render(source, &image).await;
        display::print_batch_item(source, attempt.error.as_deref());
        if !attempt.success {
            failed += 1;
        }
    }

    println!(
        "Batch complete: {}/{} rendered",
        sources.len() - failed,
        sources.len()
    );

    Ok(if failed > 0 {
        EXIT_GENERAL_ERROR
    } else {
        EXIT_SUCCESS
    })
}

/// All .mmd files under the input directory, in stable path order.
fn collect_sources(input_dir: &std::path::Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut sources: Vec<PathBuf> = WalkDir::new(input_dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "mmd"))
        .collect();
    sources.sort();
    sources
}

/// Image destination for one source file: flat into the output directory
/// when given, otherwise next to the source.
fn image_path(
    source: &std::path::Path,
    output_dir: Option<&std::path::Path>,
    format: ImageFormat,
) -> PathBuf {
    match output_dir {
        Some(dir) => {
            let file_name = source.file_name().unwrap_or_default();
            dir.join(file_name).with_extension(format.extension())
        }
        None => source.with_extension(format.extension()),
    }
}
