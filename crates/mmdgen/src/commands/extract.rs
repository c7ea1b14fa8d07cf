//! `mmdgen extract` — pull Mermaid blocks out of markdown documents.

use crate::display;
use crate::errors::{EXIT_NO_INPUT, EXIT_SUCCESS};
use anyhow::{Context, Result};
use clap::Args;
use mmdgen_common::extract::MarkdownExtractor;
use mmdgen_common::render_options::ImageFormat;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Input markdown document
    pub markdown_file: PathBuf,

    /// Extract blocks to this directory
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Filename prefix for extracted blocks
    #[arg(long, default_value = "diagram")]
    pub prefix: String,

    /// List blocks without extracting
    #[arg(long, short = 'l')]
    pub list_only: bool,

    /// Replace blocks with image references and print/write the result
    #[arg(long, conflicts_with_all = ["output_dir", "list_only"])]
    pub replace_with_images: bool,

    /// Image format for references
    #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
    pub image_format: ImageFormat,

    /// Image directory used in references
    #[arg(long, default_value = "diagrams")]
    pub image_dir: String,

    /// Write the rewritten markdown here instead of stdout
    #[arg(long, requires = "replace_with_images")]
    pub output_markdown: Option<PathBuf>,
}

pub fn run(args: ExtractArgs) -> Result<i32> {
    let extractor = match MarkdownExtractor::from_file(&args.markdown_file) {
        Ok(extractor) => extractor,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return Ok(EXIT_NO_INPUT);
        }
    };

    if args.replace_with_images {
        let rewritten = extractor.replace_with_images(
            &args.prefix,
            args.image_format.extension(),
            &args.image_dir,
        );
        match &args.output_markdown {
            Some(path) => {
                fs::write(path, rewritten)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Rewritten markdown saved to {}", path.display());
            }
            None => print!("{}", rewritten),
        }
        return Ok(EXIT_SUCCESS);
    }

    if let Some(output_dir) = &args.output_dir {
        if !args.list_only {
            let saved = extractor.save_blocks(output_dir, &args.prefix)?;
            for path in &saved {
                println!("  saved {}", path.display());
            }
            println!("Extracted {} diagram(s)", saved.len());
            return Ok(EXIT_SUCCESS);
        }
    }

    display::print_blocks(&args.markdown_file, extractor.blocks());
    Ok(EXIT_SUCCESS)
}
