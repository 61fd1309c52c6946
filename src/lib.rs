mod config;
mod error;
mod node;
mod outline;
mod output;
mod parser;
mod printer;
mod render;
mod slug;

pub use config::{Config, OutlineConfig, ParserConfig, RunConfig};
pub use error::Error;
pub use node::{Document, NodeId, NodeKind, NodeRef, Visitor, WalkStatus, walk};
pub use outline::{Outline, OutlineBuilder, OutlineNode, build_outline};
pub use output::LineTracker;
pub use printer::print_outline;
pub use render::{CanonicalRenderer, render_canonical};
pub use slug::{HeadingIds, slugify};

use std::fs;
use std::path::Path;

/// What to produce for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Linked table of contents of the file's sections.
    Outline,
    /// The file re-rendered in canonical form.
    Canonical,
}

/// Parse markdown text into a document tree using default extensions.
pub fn parse(markdown: &str) -> Document {
    parse_with_config(markdown, &ParserConfig::default())
}

/// Parse markdown text into a document tree.
pub fn parse_with_config(markdown: &str, config: &ParserConfig) -> Document {
    parser::parse(markdown, config)
}

/// Re-render markdown in canonical form using default config.
pub fn format(markdown: &str) -> Result<String, Error> {
    format_with_config(markdown, &Config::compiled_default())
}

/// Re-render markdown in canonical form with custom config.
pub fn format_with_config(markdown: &str, config: &Config) -> Result<String, Error> {
    let doc = parse_with_config(markdown, &config.parser);
    let bytes = render_canonical(&doc, Vec::new())?;
    // Every byte written came from a &str
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build the outline of markdown text using default config.
pub fn extract_outline(markdown: &str) -> Result<Outline, Error> {
    extract_outline_with_config(markdown, &Config::compiled_default())
}

/// Build the outline of markdown text with custom config.
pub fn extract_outline_with_config(markdown: &str, config: &Config) -> Result<Outline, Error> {
    let doc = parse_with_config(markdown, &config.parser);
    build_outline(&doc)
}

/// Convert markdown to a printed table of contents using default config.
pub fn toc(markdown: &str) -> Result<String, Error> {
    toc_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to a printed table of contents with custom config.
pub fn toc_with_config(markdown: &str, config: &Config) -> Result<String, Error> {
    let outline = extract_outline_with_config(markdown, config)?;
    print_outline(&outline.root, config.outline.max_depth)
}

/// Read one file and produce its outline or canonical form.
pub fn process_file(path: &Path, mode: Mode, config: &Config) -> Result<String, Error> {
    log::debug!("processing {} ({:?})", path.display(), mode);
    let markdown = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match mode {
        Mode::Outline => toc_with_config(&markdown, config),
        Mode::Canonical => format_with_config(&markdown, config),
    }
}
