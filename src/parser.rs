use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::config::ParserConfig;
use crate::node::{Document, NodeId, NodeKind};
use crate::slug::{HeadingIds, slugify};

/// Parse markdown text into a document tree
pub fn parse(markdown: &str, config: &ParserConfig) -> Document {
    let parser = Parser::new_ext(markdown, options(config));
    let mut state = TreeBuilder::new(markdown);

    for (event, range) in parser.into_offset_iter() {
        state.process_event(event, range);
    }

    state.finish()
}

fn options(config: &ParserConfig) -> Options {
    let mut options = Options::empty();
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
    options.set(Options::ENABLE_TASKLISTS, config.tasklists);
    options.set(Options::ENABLE_HEADING_ATTRIBUTES, config.heading_attributes);
    options.set(Options::ENABLE_MATH, config.math);
    options.set(
        Options::ENABLE_YAML_STYLE_METADATA_BLOCKS,
        config.metadata_blocks,
    );
    options
}

struct TreeBuilder<'a> {
    source: &'a str,
    doc: Document,
    // Open container nodes, innermost last
    open: Vec<NodeId>,
    heading_ids: HeadingIds,
    // Heading that needs a generated id once its text is known
    auto_id_heading: Option<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let doc = Document::new();
        let root = doc.root().id();
        Self {
            source,
            doc,
            open: vec![root],
            heading_ids: HeadingIds::new(),
            auto_id_heading: None,
        }
    }

    fn current(&self) -> NodeId {
        // The root is never popped
        self.open.last().copied().unwrap_or(self.doc.root().id())
    }

    fn start(&mut self, kind: NodeKind) {
        let id = self.doc.push(self.current(), kind);
        self.open.push(id);
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.doc.push(self.current(), kind);
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start_tag(tag, range),
            Event::End(_) => self.end_tag(),

            Event::Text(text) => self.text(&text),
            // Keep line structure inside the surrounding text literal
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.leaf(NodeKind::HardBreak),

            Event::Code(code) => self.leaf(NodeKind::Code(code.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.leaf(NodeKind::Math(math.into_string()))
            }
            Event::Html(html) => self.leaf(NodeKind::Html(html.into_string())),
            Event::InlineHtml(html) => self.leaf(NodeKind::InlineHtml(html.into_string())),
            Event::FootnoteReference(label) => {
                self.leaf(NodeKind::FootnoteReference(label.into_string()))
            }
            Event::Rule => self.leaf(NodeKind::Rule),
            Event::TaskListMarker(checked) => self.leaf(NodeKind::TaskListMarker(checked)),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Heading { level, id, .. } => {
                let id = match id {
                    Some(id) => self.heading_ids.unique(id.into_string()),
                    None => String::new(),
                };
                let generate = id.is_empty();
                self.start(NodeKind::Heading {
                    level: heading_level_to_u8(level),
                    id,
                });
                if generate {
                    self.auto_id_heading = Some(self.current());
                }
                return;
            }
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::List(None) => NodeKind::List {
                bullet: self.marker_at(range.start),
            },
            Tag::List(Some(start)) => NodeKind::OrderedList { start },
            Tag::Item => NodeKind::ListItem {
                bullet: self.enclosing_bullet(),
            },
            Tag::CodeBlock(kind) => NodeKind::CodeBlock {
                info: match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                },
                literal: String::new(),
            },
            Tag::Link { dest_url, .. } => NodeKind::Link {
                destination: dest_url.into_string(),
            },
            Tag::Image { dest_url, .. } => NodeKind::Image {
                destination: dest_url.into_string(),
            },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::HtmlBlock => NodeKind::HtmlBlock,
            Tag::FootnoteDefinition(_) => NodeKind::FootnoteDefinition,
            Tag::Table(_) => NodeKind::Table,
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::MetadataBlock(_) => NodeKind::MetadataBlock,
            _ => NodeKind::Extension,
        };
        self.start(kind);
    }

    fn end_tag(&mut self) {
        if self.open.len() <= 1 {
            return;
        }
        let Some(closed) = self.open.pop() else {
            return;
        };
        if self.auto_id_heading == Some(closed) {
            self.auto_id_heading = None;
            let slug = slugify(&self.doc.get(closed).text_content());
            let unique = self.heading_ids.unique(slug);
            if let NodeKind::Heading { id, .. } = self.doc.kind_mut(closed) {
                *id = unique;
            }
        }
    }

    fn text(&mut self, text: &str) {
        let current = self.current();
        // Code block content is the block's literal, not a child
        if let NodeKind::CodeBlock { literal, .. } = self.doc.kind_mut(current) {
            literal.push_str(text);
            return;
        }
        // Merge runs of text split by the tokenizer
        let last = self.doc.get(current).children().last().map(|n| n.id());
        if let Some(last) = last
            && let NodeKind::Text(existing) = self.doc.kind_mut(last)
        {
            existing.push_str(text);
            return;
        }
        self.leaf(NodeKind::Text(text.to_string()));
    }

    /// Bullet character of the list marker starting at `offset`.
    fn marker_at(&self, offset: usize) -> char {
        self.source
            .get(offset..)
            .and_then(|rest| rest.trim_start().chars().next())
            .filter(|c| matches!(c, '-' | '*' | '+'))
            .unwrap_or('-')
    }

    fn enclosing_bullet(&self) -> char {
        match self.doc.get(self.current()).kind() {
            NodeKind::List { bullet } => *bullet,
            _ => '-',
        }
    }

    fn finish(self) -> Document {
        self.doc
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
