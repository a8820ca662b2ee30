//! Raw HTML fragment sub-parser.
//!
//! Turns the text of an `html` raw block or inline into sanitized [`Html`]
//! nodes without a full HTML parser:
//!
//! 1. [`tokenizer`] splits the fragment into text and tag tokens.
//! 2. [`tree`] builds a node tree, repairing unbalanced tags.
//! 3. [`sanitize`] drops dangerous elements and attributes and maps the rest
//!    to props.
//!
//! # Example
//!
//! ```
//! use dj_renderer::raw_html::sanitize_fragment;
//! use dj_renderer::Html;
//!
//! let nodes = sanitize_fragment(r#"<a href="javascript:x()" title="t">hi</a><script>x()</script>"#, "raw");
//! assert_eq!(Html::fragment(nodes).to_markup(), r#"<a title="t">hi</a>"#);
//! ```

mod entities;
mod sanitize;
mod tokenizer;
mod tree;

pub use entities::decode_entities;
pub use sanitize::sanitize_attributes;
pub(crate) use sanitize::{is_event_handler, is_unsafe_url};
pub use tree::{MAX_DEPTH, RawElement, RawNode, parse_attributes, parse_fragment};

use crate::element::Html;

/// Parse and sanitize a fragment. Element keys start with `key_prefix`.
pub fn sanitize_fragment(source: &str, key_prefix: &str) -> Vec<Html> {
    sanitize::to_html(&parse_fragment(source), key_prefix)
}
