//! The document tree consumed by the renderer and the outline builder.
//!
//! Nodes live in a flat arena owned by [`Document`]. Parent links are plain
//! [`NodeId`]s, so the tree has no reference cycles and can be shared freely
//! while it is walked.

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node types produced by the parser.
///
/// Everything after `HardBreak` is parsed so that the renderer can refuse it
/// by name instead of silently dropping content.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Heading {
        level: u8,
        id: String,
    },
    Paragraph,
    List { bullet: char },
    ListItem { bullet: char },
    CodeBlock {
        info: String,
        literal: String,
    },
    Text(String),
    Link { destination: String },
    HardBreak,

    OrderedList { start: u64 },
    BlockQuote,
    Emphasis,
    Strong,
    Strikethrough,
    Code(String),
    Image { destination: String },
    HtmlBlock,
    Html(String),
    InlineHtml(String),
    Rule,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Math(String),
    FootnoteDefinition,
    FootnoteReference(String),
    TaskListMarker(bool),
    MetadataBlock,
    /// Superscript, subscript, definition lists and similar extensions.
    Extension,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "list item",
            NodeKind::CodeBlock { .. } => "code block",
            NodeKind::Text(_) => "text",
            NodeKind::Link { .. } => "link",
            NodeKind::HardBreak => "hard break",
            NodeKind::OrderedList { .. } => "ordered list",
            NodeKind::BlockQuote => "block quote",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::Code(_) => "inline code",
            NodeKind::Image { .. } => "image",
            NodeKind::HtmlBlock => "html block",
            NodeKind::Html(_) => "html",
            NodeKind::InlineHtml(_) => "inline html",
            NodeKind::Rule => "horizontal rule",
            NodeKind::Table => "table",
            NodeKind::TableHead => "table head",
            NodeKind::TableRow => "table row",
            NodeKind::TableCell => "table cell",
            NodeKind::Math(_) => "math",
            NodeKind::FootnoteDefinition => "footnote definition",
            NodeKind::FootnoteReference(_) => "footnote reference",
            NodeKind::TaskListMarker(_) => "task list marker",
            NodeKind::MetadataBlock => "metadata block",
            NodeKind::Extension => "extension",
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed document. The root node is always of kind [`NodeKind::Document`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.get(NodeId(0))
    }

    /// Look up a node. Ids are only ever handed out by this document.
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    /// Append a new last child to `parent` and return its id.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed view of one node with access to its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.doc.nodes[self.id.0].kind
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.nodes[self.id.0].parent.map(|id| self.doc.get(id))
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.nodes[self.id.0].children.iter().map(move |&id| doc.get(id))
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    /// Parent, grandparent, ... up to and including the document root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Concatenated literal text of every text-like descendant.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self.id];
        while let Some(id) = pending.pop() {
            let node = &self.doc.nodes[id.0];
            if let NodeKind::Text(text) | NodeKind::Code(text) | NodeKind::Math(text) = &node.kind {
                out.push_str(text);
            }
            // Reversed so the first child is popped first
            pending.extend(node.children.iter().rev());
        }
        out
    }
}

/// Returned by a [`Visitor`] to steer the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    GoToNext,
    /// Do not descend; the exit event for this node is still delivered.
    SkipChildren,
    Terminate,
}

/// Receives every node twice in document order: once entering, once exiting.
pub trait Visitor {
    type Error;

    fn visit(&mut self, node: NodeRef<'_>, entering: bool) -> Result<WalkStatus, Self::Error>;
}

/// Walk the whole document depth-first, stopping at the first error.
///
/// The walk keeps its own stack, so nesting depth is bounded by memory only.
pub fn walk<V: Visitor>(doc: &Document, visitor: &mut V) -> Result<(), V::Error> {
    // Open nodes with the index of the next child to enter
    let mut open: Vec<(NodeId, usize)> = Vec::new();
    let mut entering = Some(doc.root().id());

    loop {
        if let Some(id) = entering.take() {
            match visitor.visit(doc.get(id), true)? {
                WalkStatus::Terminate => return Ok(()),
                WalkStatus::SkipChildren => open.push((id, doc.nodes[id.0].children.len())),
                WalkStatus::GoToNext => open.push((id, 0)),
            }
        }

        let Some((id, next_child)) = open.last_mut() else {
            return Ok(());
        };
        if let Some(&child) = doc.nodes[id.0].children.get(*next_child) {
            *next_child += 1;
            entering = Some(child);
            continue;
        }

        let id = *id;
        open.pop();
        if visitor.visit(doc.get(id), false)? == WalkStatus::Terminate {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        let mut doc = Document::new();
        let root = doc.root().id();
        let heading = doc.push(
            root,
            NodeKind::Heading {
                level: 2,
                id: "intro".to_string(),
            },
        );
        doc.push(heading, NodeKind::Text("Intro".to_string()));
        let list = doc.push(root, NodeKind::List { bullet: '-' });
        let item = doc.push(list, NodeKind::ListItem { bullet: '-' });
        doc.push(item, NodeKind::Text("one".to_string()));
        doc
    }

    struct Recorder {
        events: Vec<(&'static str, bool)>,
        skip: &'static str,
        stop: &'static str,
    }

    impl Visitor for Recorder {
        type Error = ();

        fn visit(&mut self, node: NodeRef<'_>, entering: bool) -> Result<WalkStatus, ()> {
            let name = node.kind().name();
            self.events.push((name, entering));
            if entering && name == self.skip {
                return Ok(WalkStatus::SkipChildren);
            }
            if name == self.stop {
                return Ok(WalkStatus::Terminate);
            }
            Ok(WalkStatus::GoToNext)
        }
    }

    fn record(doc: &Document, skip: &'static str, stop: &'static str) -> Vec<(&'static str, bool)> {
        let mut recorder = Recorder {
            events: Vec::new(),
            skip,
            stop,
        };
        walk(doc, &mut recorder).unwrap();
        recorder.events
    }

    #[test]
    fn walk_visits_each_node_twice_in_order() {
        let events = record(&sample(), "", "");
        assert_eq!(
            events,
            vec![
                ("document", true),
                ("heading", true),
                ("text", true),
                ("text", false),
                ("heading", false),
                ("list", true),
                ("list item", true),
                ("text", true),
                ("text", false),
                ("list item", false),
                ("list", false),
                ("document", false),
            ]
        );
    }

    #[test]
    fn skip_children_still_exits() {
        let events = record(&sample(), "heading", "");
        assert_eq!(&events[1..3], &[("heading", true), ("heading", false)]);
    }

    #[test]
    fn terminate_stops_walk() {
        let events = record(&sample(), "", "heading");
        assert_eq!(events, vec![("document", true), ("heading", true)]);
    }

    #[test]
    fn errors_stop_walk() {
        struct Failing(usize);
        impl Visitor for Failing {
            type Error = &'static str;
            fn visit(&mut self, node: NodeRef<'_>, _: bool) -> Result<WalkStatus, &'static str> {
                self.0 += 1;
                match node.kind() {
                    NodeKind::List { .. } => Err("list"),
                    _ => Ok(WalkStatus::GoToNext),
                }
            }
        }
        let mut visitor = Failing(0);
        assert_eq!(walk(&sample(), &mut visitor), Err("list"));
        assert_eq!(visitor.0, 6);
    }

    #[test]
    fn parent_and_ancestors() {
        let doc = sample();
        let list = doc.root().children().nth(1).unwrap();
        let item = list.first_child().unwrap();
        let text = item.first_child().unwrap();

        assert!(matches!(
            text.parent().unwrap().kind(),
            NodeKind::ListItem { .. }
        ));
        let names: Vec<_> = text.ancestors().map(|n| n.kind().name()).collect();
        assert_eq!(names, vec!["list item", "list", "document"]);
        assert!(doc.root().parent().is_none());
    }

    #[test]
    fn text_content_flattens_descendants() {
        let mut doc = Document::new();
        let root = doc.root().id();
        let heading = doc.push(
            root,
            NodeKind::Heading {
                level: 2,
                id: String::new(),
            },
        );
        doc.push(heading, NodeKind::Text("Using ".to_string()));
        doc.push(heading, NodeKind::Code("walk".to_string()));
        let link = doc.push(
            heading,
            NodeKind::Link {
                destination: "#x".to_string(),
            },
        );
        doc.push(link, NodeKind::Text(" here".to_string()));

        assert_eq!(doc.get(heading).text_content(), "Using walk here");
    }

    #[test]
    fn new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.root().kind(), &NodeKind::Document);
    }

    #[test]
    fn len_counts_nodes_below_root() {
        let doc = sample();
        assert_eq!(doc.len(), 5);
        assert!(!doc.is_empty());
    }

    #[test]
    fn skip_children_on_root_still_exits_root() {
        let events = record(&sample(), "document", "");
        assert_eq!(events, vec![("document", true), ("document", false)]);
    }

    #[test]
    fn terminate_inside_subtree_stops_walk() {
        let events = record(&sample(), "", "text");
        assert_eq!(
            events,
            vec![("document", true), ("heading", true), ("text", true)]
        );
    }

    fn deep_chain(depth: usize) -> Document {
        let mut doc = Document::new();
        let mut parent = doc.root().id();
        for _ in 0..depth {
            parent = doc.push(parent, NodeKind::BlockQuote);
        }
        doc.push(parent, NodeKind::Text("x".to_string()));
        doc
    }

    #[test]
    fn walk_handles_very_deep_nesting() {
        struct Depth {
            current: usize,
            deepest: usize,
            exits: usize,
        }
        impl Visitor for Depth {
            type Error = ();
            fn visit(&mut self, _: NodeRef<'_>, entering: bool) -> Result<WalkStatus, ()> {
                if entering {
                    self.current += 1;
                    self.deepest = self.deepest.max(self.current);
                } else {
                    self.current -= 1;
                    self.exits += 1;
                }
                Ok(WalkStatus::GoToNext)
            }
        }

        let doc = deep_chain(100_000);
        let mut visitor = Depth {
            current: 0,
            deepest: 0,
            exits: 0,
        };
        walk(&doc, &mut visitor).unwrap();

        assert_eq!(visitor.deepest, 100_002);
        assert_eq!(visitor.exits, 100_002);
        assert_eq!(visitor.current, 0);
    }

    #[test]
    fn text_content_handles_very_deep_nesting() {
        let doc = deep_chain(100_000);
        assert_eq!(doc.root().text_content(), "x");
    }
}
