//! doxdown — generate cross-linked markdown from JSDoc comment lists.
//!
//! Two modes:
//!
//! - **stdin mode**: `doxdown < types.json` prints markdown for one file
//! - **file mode**: `doxdown -o docs/api comments/*.json` resolves links
//!   across all inputs and writes one document per file

use anyhow::{Context, Result};
use clap::Parser;
use doxdown::{parser, render, Options, SourceFile};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "doxdown",
    about = "Generate cross-linked markdown documentation from JSDoc comment lists"
)]
struct Cli {
    /// Comment list files (glob patterns and directories supported).
    /// If omitted, reads one comment list from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Skip files without a module header or with an @ignore'd one
    #[arg(long)]
    only_public_modules: bool,

    /// Log every normalized comment
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.files.is_empty() {
        return stdin_mode();
    }

    file_mode(&cli)
}

/// stdin mode: one comment list in, markdown with placeholder links out.
fn stdin_mode() -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let comments = parser::parse_comments(&input).context("failed to parse stdin")?;
    print!("{}", doxdown::create_markdown("<stdin>", comments)?);
    Ok(())
}

/// file mode: parse all files, resolve links across them, write to the output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    let mut sources: Vec<SourceFile> = Vec::with_capacity(input_files.len());
    // Target name -> source that claimed it
    let mut claimed: HashMap<String, String> = HashMap::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match parser::parse_file(path, &content) {
            Ok(comments) => {
                let source_filename = path.to_string_lossy().to_string();
                let target_filename = format!("{}.{}", derive_output_name(&source_filename), ext);
                if let Some(other) = claimed.get(&target_filename) {
                    anyhow::bail!(
                        "{} and {} would both be written to {}",
                        other,
                        source_filename,
                        target_filename
                    );
                }
                claimed.insert(target_filename.clone(), source_filename.clone());
                debug!(file = %source_filename, comments = comments.len(), "parsed");
                sources.push(SourceFile {
                    source_filename,
                    target_filename,
                    comments,
                });
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
            }
        }
    }

    let options = Options {
        only_public_modules: cli.only_public_modules,
    };
    let outputs = doxdown::create_docs_for_files(sources, &options, |file, message| {
        warn!(file = %file, "{}", message)
    });

    let mut written = 0usize;
    for output in outputs {
        let Some(doc) = output.doc else {
            continue;
        };
        let out_path = output_dir.join(&output.target_filename);
        let rendered = renderer
            .render(&doc)
            .with_context(|| format!("failed to render {}", output.source_filename))?;
        fs::write(&out_path, rendered)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        written += 1;
    }

    info!("wrote {} file(s) to {}", written, output_dir.display());
    Ok(())
}

/// File extension of comment list inputs.
const INPUT_EXTENSION: &str = "json";

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned (non-recursively) for comment lists.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file())
                    .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(INPUT_EXTENSION)),
            );
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sorted input makes the duplicate-module winner deterministic
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "comments/types.js.json" → "types", "types.json" → "types"
fn derive_output_name(source: &str) -> String {
    let filename = Path::new(source)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(source);
    let stem = filename.strip_suffix(".json").unwrap_or(filename);
    stem.strip_suffix(".js").unwrap_or(stem).to_string()
}
