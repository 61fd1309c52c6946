//! Canonical markdown renderer.
//!
//! Re-serializes a document tree so that every block is separated from its
//! neighbours by exactly one blank line, however many the source used.

use std::io::{self, Write};

use crate::error::Error;
use crate::node::{Document, NodeKind, NodeRef, Visitor, WalkStatus, walk};
use crate::output::LineTracker;

/// Render `doc` in canonical form into `sink`, returning the sink.
///
/// Fails on the first node kind the renderer does not support; whatever was
/// already written to the sink must then be discarded.
pub fn render_canonical<W: Write>(doc: &Document, sink: W) -> Result<W, Error> {
    let mut renderer = CanonicalRenderer::new(sink);
    walk(doc, &mut renderer)?;
    Ok(renderer.into_inner())
}

/// Visitor state for one render. Use a fresh instance per document.
pub struct CanonicalRenderer<W> {
    out: LineTracker<W>,
    at_document_start: bool,
}

impl<W: Write> CanonicalRenderer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            out: LineTracker::new(sink),
            at_document_start: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Separate the upcoming block from the previous one by a blank line.
    fn open_section(&mut self) -> io::Result<()> {
        if !self.at_document_start && !self.out.at_blank_line() {
            self.out.write_all(b"\n")?;
        }
        self.at_document_start = false;
        Ok(())
    }

    fn close_section(&mut self) -> io::Result<()> {
        if !self.out.at_blank_line() {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn heading(&mut self, level: u8, entering: bool) -> io::Result<()> {
        if entering {
            self.open_section()?;
            write!(self.out, "{} ", "#".repeat(usize::from(level)))
        } else {
            self.close_section()
        }
    }

    fn paragraph(&mut self, node: NodeRef<'_>, entering: bool) -> io::Result<()> {
        // Item text stays on the bullet's line
        if let Some(parent) = node.parent()
            && matches!(parent.kind(), NodeKind::ListItem { .. })
        {
            return Ok(());
        }
        if entering {
            self.open_section()
        } else {
            self.close_section()
        }
    }

    fn list_item(&mut self, node: NodeRef<'_>, bullet: char, entering: bool) -> io::Result<()> {
        if entering {
            let depth = node
                .ancestors()
                .filter(|n| matches!(n.kind(), NodeKind::List { .. }))
                .count()
                .saturating_sub(1);
            write!(self.out, "{}{} ", "  ".repeat(depth), bullet)
        } else {
            self.close_section()
        }
    }

    fn code_block(&mut self, info: &str, literal: &str) -> io::Result<()> {
        self.open_section()?;
        writeln!(self.out, "```{}", info)?;
        self.out.write_all(literal.as_bytes())?;
        if !literal.is_empty() && !literal.ends_with('\n') {
            self.out.write_all(b"\n")?;
        }
        self.out.write_all(b"```\n")
    }

    fn link(&mut self, destination: &str, entering: bool) -> io::Result<()> {
        if entering {
            self.out.write_all(b"[")
        } else {
            write!(self.out, "]({})", destination)
        }
    }
}

impl<W: Write> Visitor for CanonicalRenderer<W> {
    type Error = Error;

    fn visit(&mut self, node: NodeRef<'_>, entering: bool) -> Result<WalkStatus, Error> {
        log::trace!("{} ({}): {:?}", node.kind().name(), entering, node.kind());
        match node.kind() {
            NodeKind::Document => self.at_document_start = entering,
            NodeKind::Heading { level, .. } => self.heading(*level, entering)?,
            NodeKind::Paragraph => self.paragraph(node, entering)?,
            NodeKind::List { .. } => {
                // Each item closes itself
                if entering {
                    self.open_section()?;
                }
            }
            NodeKind::ListItem { bullet } => self.list_item(node, *bullet, entering)?,
            NodeKind::CodeBlock { info, literal } => {
                if entering {
                    self.code_block(info, literal)?;
                }
            }
            NodeKind::Text(text) => {
                if entering {
                    self.out.write_all(text.as_bytes())?;
                }
            }
            NodeKind::HardBreak => {
                if entering {
                    self.out.write_all(b"\n")?;
                }
            }
            NodeKind::Link { destination } => self.link(destination, entering)?,

            kind @ (NodeKind::OrderedList { .. }
            | NodeKind::BlockQuote
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Strikethrough
            | NodeKind::Code(_)
            | NodeKind::Image { .. }
            | NodeKind::HtmlBlock
            | NodeKind::Html(_)
            | NodeKind::InlineHtml(_)
            | NodeKind::Rule
            | NodeKind::Table
            | NodeKind::TableHead
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::Math(_)
            | NodeKind::FootnoteDefinition
            | NodeKind::FootnoteReference(_)
            | NodeKind::TaskListMarker(_)
            | NodeKind::MetadataBlock
            | NodeKind::Extension) => {
                return Err(Error::UnsupportedNodeKind { kind: kind.name() });
            }
        }
        Ok(WalkStatus::GoToNext)
    }
}
