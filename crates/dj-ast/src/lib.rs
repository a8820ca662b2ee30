//! Djot document tree model.
//!
//! The tree is produced by an external djot parser and handed to this
//! workspace in its JSON form. Every object carries a `"tag"` discriminant;
//! [`Node`] is the closed sum type over all known tags, with
//! [`Node::Unknown`] absorbing anything newer than this crate.
//!
//! # Example
//!
//! ```
//! use dj_ast::Node;
//!
//! let node = Node::from_json(
//!     r#"{"tag":"doc","children":[{"tag":"para","children":[{"tag":"str","text":"hi"}]}]}"#,
//! )
//! .unwrap();
//! assert_eq!(node.tag(), "doc");
//! assert_eq!(node.children()[0].tag(), "para");
//! ```

mod error;
mod node;

pub use error::AstError;
pub use node::{
    Alignment, Attributes, Cell, Checkbox, CodeBlock, Container, Doc, Footnote, Heading, Leaf,
    Link, List, Literal, Node, OrderedList, Raw, Reference, References, Row, SmartPunctuation,
    Symb, TaskListItem,
};
