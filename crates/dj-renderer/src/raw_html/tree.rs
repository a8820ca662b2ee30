//! Fragment tree construction with best-effort repair.

use std::sync::LazyLock;

use regex::Regex;

use super::entities::decode_entities;
use super::tokenizer::{Token, Tokenizer};
use crate::element::is_void_tag;

static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>`/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("invalid attribute regex")
});

/// Deepest element nesting kept. Start tags opened past it become empty
/// siblings inside the deepest open element.
pub const MAX_DEPTH: usize = 512;

/// Node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Element(RawElement),
    /// Decoded text.
    Text(String),
}

/// Element of a parsed fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElement {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order: lowercased name, decoded value.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<RawNode>,
}

/// Parse a fragment into a list of top-level nodes.
///
/// Void elements and `.../>` never receive children. A close tag closes the
/// nearest open element with the same name along with everything opened
/// after it; close tags matching nothing are ignored. Elements still open at
/// the end are closed implicitly. Nesting stops at [`MAX_DEPTH`].
pub fn parse_fragment(source: &str) -> Vec<RawNode> {
    // Bottom entry is the synthetic root.
    let mut stack = vec![RawElement::default()];

    for token in Tokenizer::new(source) {
        match token {
            Token::Text(text) => push_text(&mut stack, &decode_entities(text)),
            Token::LessThan => push_text(&mut stack, "<"),
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let element = RawElement {
                    attributes: parse_attributes(attrs),
                    children: Vec::new(),
                    tag: name,
                };
                if self_closing || is_void_tag(&element.tag) {
                    top(&mut stack).children.push(RawNode::Element(element));
                } else if stack.len() > MAX_DEPTH {
                    tracing::trace!(tag = %element.tag, "Raw HTML nesting limit reached");
                    top(&mut stack).children.push(RawNode::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Token::EndTag { name } => {
                if let Some(depth) = stack.iter().skip(1).rposition(|el| el.tag == name) {
                    close_to(&mut stack, depth + 1);
                }
            }
        }
    }

    close_to(&mut stack, 1);
    stack.pop().map(|root| root.children).unwrap_or_default()
}

fn top(stack: &mut [RawElement]) -> &mut RawElement {
    let last = stack.len() - 1;
    &mut stack[last]
}

/// Append text, merging with a preceding text node.
fn push_text(stack: &mut [RawElement], text: &str) {
    let children = &mut top(stack).children;
    if let Some(RawNode::Text(prev)) = children.last_mut() {
        prev.push_str(text);
    } else {
        children.push(RawNode::Text(text.to_owned()));
    }
}

/// Pop elements until the stack has `len` entries, attaching each popped
/// element to its parent.
fn close_to(stack: &mut Vec<RawElement>, len: usize) {
    while stack.len() > len {
        let Some(element) = stack.pop() else {
            break;
        };
        top(stack).children.push(RawNode::Element(element));
    }
}

/// Parse the attribute text of a start tag.
pub fn parse_attributes(source: &str) -> Vec<(String, String)> {
    ATTRIBUTE_PATTERN
        .captures_iter(source)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            (name, decode_entities(value).into_owned())
        })
        .collect()
}
