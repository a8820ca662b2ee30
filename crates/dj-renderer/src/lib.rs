//! Djot document tree to HTML node renderer.
//!
//! This crate turns a [`dj_ast::Node`] tree into a tree of [`Html`] nodes
//! that can be serialized with [`Html::to_markup`] or post-processed by the
//! caller.
//!
//! # Architecture
//!
//! - [`DocumentRenderer`] walks the tree and maps every node kind to a
//!   default element, or to an [`Override`] from the [`Components`] map.
//! - [`ResolverState`] numbers footnotes and resolves link references for
//!   one document; the renderer appends the endnotes section.
//! - [`TableGrouper`] splits table rows into `thead`/`tbody`, and tight list
//!   items render their single paragraph's content directly.
//! - [`raw_html`] parses and sanitizes `html` raw blocks and inlines.
//! - [`Compiler`] memoizes source-to-tree decoding in a bounded LRU cache.
//!
//! # Example
//!
//! ```
//! use dj_ast::Node;
//! use dj_renderer::DocumentRenderer;
//!
//! let doc = Node::from_json(
//!     r#"{"tag":"doc","children":[{"tag":"para","children":[
//!         {"tag":"str","text":"See"},
//!         {"tag":"footnote_reference","text":"n"}
//!     ]}],"footnotes":{"n":{"tag":"footnote","label":"n","children":[
//!         {"tag":"para","children":[{"tag":"str","text":"Note."}]}
//!     ]}}}"#,
//! )
//! .unwrap();
//!
//! let markup = DocumentRenderer::new().render_to_string(&doc);
//! assert!(markup.starts_with(r##"<p>See<a href="#fn1" id="fnref1" role="doc-noteref"><sup>1</sup></a></p>"##));
//! assert!(markup.contains(r##"<li id="fn1"><p>Note.<a href="#fnref1" role="doc-backlink">"##));
//! ```

mod compile;
mod components;
mod dispatch;
mod element;
mod error;
mod grouping;
pub mod raw_html;
mod resolver;
mod util;

pub use compile::Compiler;
pub use components::{
    Component, ComponentKind, ComponentProps, Components, Inputs, Override, is_valid_tag,
};
pub use dispatch::DocumentRenderer;
pub use element::{
    Element, Fragment, Html, PropValue, Props, Style, TextNode, VOID_TAGS, escape_html,
    is_void_tag,
};
pub use error::RenderError;
pub use grouping::{TableGrouper, item_content};
pub use resolver::{FootnoteRef, ResolverState};
pub use util::{parse_style, smart_punctuation};
