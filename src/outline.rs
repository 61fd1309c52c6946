//! Table-of-contents extraction.
//!
//! Headings below the document title are folded into a tree that mirrors
//! their nesting. Entries link to the heading anchors assigned by the parser.

use crate::error::Error;
use crate::node::{Document, NodeKind, NodeRef, Visitor, WalkStatus, walk};

/// Headings above this level (the document title) are left out.
const FIRST_OUTLINE_LEVEL: u8 = 2;

/// One outline entry. The root of an outline has no bullet or literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineNode {
    pub bullet: char,
    pub literal: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(bullet: char, literal: impl Into<String>) -> Self {
        Self {
            bullet,
            literal: literal.into(),
            children: Vec::new(),
        }
    }
}

/// A finished outline together with the non-fatal problems met on the way.
#[derive(Debug)]
pub struct Outline {
    pub root: OutlineNode,
    pub warnings: Vec<Error>,
}

/// Build the outline of `doc`.
///
/// Fails when a heading skips a level on the way down, has no content, or
/// has no enclosing heading to nest under.
pub fn build_outline(doc: &Document) -> Result<Outline, Error> {
    let mut builder = OutlineBuilder::new();
    walk(doc, &mut builder)?;
    Ok(builder.finish())
}

/// Visitor state for one outline. Use a fresh instance per document.
#[derive(Debug)]
pub struct OutlineBuilder {
    root: OutlineNode,
    parent_level: u8,
    // Child index of each open parent below the root, outermost first
    stack: Vec<usize>,
    warnings: Vec<Error>,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self {
            root: OutlineNode::default(),
            parent_level: FIRST_OUTLINE_LEVEL,
            stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn finish(self) -> Outline {
        Outline {
            root: self.root,
            warnings: self.warnings,
        }
    }

    fn current_parent(&mut self) -> &mut OutlineNode {
        let mut node = &mut self.root;
        for &index in &self.stack {
            node = &mut node.children[index];
        }
        node
    }

    fn heading(&mut self, heading: NodeRef<'_>, level: u8, heading_id: &str) -> Result<(), Error> {
        if level < FIRST_OUTLINE_LEVEL {
            return Ok(());
        }

        if level > self.parent_level {
            if level - self.parent_level > 1 {
                return Err(Error::HeadingLevelSkip {
                    heading_id: heading_id.to_string(),
                    from: self.parent_level,
                    to: level,
                });
            }
            // The previous entry becomes the parent
            let Some(last) = self.current_parent().children.len().checked_sub(1) else {
                return Err(Error::MissingParentHeading {
                    heading_id: heading_id.to_string(),
                    level,
                });
            };
            self.stack.push(last);
            self.parent_level = level;
        } else if level < self.parent_level {
            // Only single-level descents are pushed, so this never underflows
            for _ in 0..(self.parent_level - level) {
                self.stack.pop();
            }
            self.parent_level = level;
        }
        log::debug!(
            "outline entry `{}` at level {} (depth {})",
            heading_id,
            level,
            self.stack.len()
        );

        let literal = self.label(heading, level, heading_id)?;
        let bullet = if level == FIRST_OUTLINE_LEVEL { '-' } else { '*' };
        self.current_parent()
            .children
            .push(OutlineNode::new(bullet, literal));
        Ok(())
    }

    fn label(
        &mut self,
        heading: NodeRef<'_>,
        level: u8,
        heading_id: &str,
    ) -> Result<String, Error> {
        let Some(first) = heading.first_child() else {
            return Err(Error::MissingHeadingText {
                heading_id: heading_id.to_string(),
                level,
            });
        };
        let text = match first.kind() {
            NodeKind::Text(text) => text.clone(),
            _ => {
                let warning = Error::NonTextHeadingLabel {
                    heading_id: heading_id.to_string(),
                };
                log::warn!("{}", warning);
                self.warnings.push(warning);
                heading.text_content()
            }
        };
        Ok(format!("[{}](#{})", text, heading_id))
    }
}

impl Visitor for OutlineBuilder {
    type Error = Error;

    fn visit(&mut self, node: NodeRef<'_>, entering: bool) -> Result<WalkStatus, Error> {
        if entering && let NodeKind::Heading { level, id } = node.kind() {
            self.heading(node, *level, id)?;
        }
        Ok(WalkStatus::GoToNext)
    }
}
