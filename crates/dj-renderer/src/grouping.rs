//! Structural grouping of table rows and tight list items.

use dj_ast::Node;

use crate::element::{Element, Html};

/// Routes the rendered children of a table into caption, header and body
/// slots in one forward pass.
///
/// A header row goes to the header group only while no body row has been
/// seen; the first non-header row closes the header for good.
#[derive(Debug, Default)]
pub struct TableGrouper {
    caption: Option<Html>,
    seen_caption: bool,
    head: Vec<Html>,
    body: Vec<Html>,
    other: Vec<Html>,
}

impl TableGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one child. `rendered` is `None` when the child produced nothing.
    pub fn push(&mut self, child: &Node, rendered: Option<Html>) {
        match child {
            Node::Caption(_) => {
                // Only the first caption is kept.
                if !self.seen_caption {
                    self.seen_caption = true;
                    self.caption = rendered;
                }
            }
            Node::Row(row) => {
                let Some(rendered) = rendered else {
                    return;
                };
                if row.head && self.body.is_empty() {
                    self.head.push(rendered);
                } else {
                    self.body.push(rendered);
                }
            }
            _ => self.other.extend(rendered),
        }
    }

    /// Table children: caption, `thead`, `tbody`, then everything else.
    pub fn finish(self) -> Vec<Html> {
        let mut children = Vec::with_capacity(3 + self.other.len());
        children.extend(self.caption);
        if !self.head.is_empty() {
            children.push(
                Element::new("thead")
                    .with_key("thead")
                    .with_children(self.head)
                    .into(),
            );
        }
        if !self.body.is_empty() {
            children.push(
                Element::new("tbody")
                    .with_key("tbody")
                    .with_children(self.body)
                    .into(),
            );
        }
        children.extend(self.other);
        children
    }
}

/// Children to render for a list item.
///
/// In a tight list an item whose only child is a paragraph renders the
/// paragraph's content directly.
pub fn item_content(children: &[Node], tight: bool) -> &[Node] {
    match children {
        [Node::Para(para)] if tight => &para.children,
        _ => children,
    }
}
