//! Footnote numbering and link reference resolution.
//!
//! One [`ResolverState`] is built per rendered document and threaded through
//! the render by `&mut`. Footnote indices come from a pre-pass over the
//! whole tree, so numbering follows document order of the references even
//! when the footnote definitions appear elsewhere.

use std::collections::HashMap;

use dj_ast::{Doc, Node, Reference, References};

/// Anchor data for one rendered footnote reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteRef {
    /// 1-based display index.
    pub index: usize,
    /// Anchor id: `fnref{index}` for the first reference, `fnref{index}-{n}`
    /// for the n-th.
    pub id: String,
    /// Target of the reference: `#fn{index}`.
    pub href: String,
}

/// Per-render footnote counters and borrowed reference dictionaries.
#[derive(Debug, Default)]
pub struct ResolverState<'a> {
    /// Footnote label to 1-based display index.
    index_by_label: HashMap<String, usize>,
    /// Labels in index order.
    order: Vec<String>,
    /// Number of references rendered so far per label.
    ref_count_by_label: HashMap<String, usize>,
    /// Anchor id of the first rendered reference per label.
    first_ref_id_by_label: HashMap<String, String>,
    /// Explicit link references of the document.
    references: Option<&'a References>,
    /// Heading-derived link references of the document.
    auto_references: Option<&'a References>,
}

impl<'a> ResolverState<'a> {
    /// Build state for a document: number footnote references in
    /// depth-first order and borrow the reference dictionaries.
    pub fn build(doc: &'a Doc) -> Self {
        let mut state = Self {
            references: Some(&doc.references),
            auto_references: Some(&doc.auto_references),
            ..Self::default()
        };
        state.collect(&doc.children);
        state
    }

    fn collect(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::FootnoteReference(label) = node {
                self.ensure_index(&label.text);
            } else {
                self.collect(node.children());
            }
        }
    }

    /// Index for `label`, assigning the next one if the label is new.
    pub fn ensure_index(&mut self, label: &str) -> usize {
        if let Some(&index) = self.index_by_label.get(label) {
            return index;
        }
        self.order.push(label.to_owned());
        let index = self.order.len();
        self.index_by_label.insert(label.to_owned(), index);
        index
    }

    /// Index for `label` without assigning one.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index_by_label.get(label).copied()
    }

    /// Record one rendered reference to `label` and return its anchor data.
    pub fn record_reference(&mut self, label: &str) -> FootnoteRef {
        let index = self.ensure_index(label);
        let count = self.ref_count_by_label.entry(label.to_owned()).or_insert(0);
        *count += 1;

        let id = if *count == 1 {
            format!("fnref{index}")
        } else {
            format!("fnref{index}-{count}")
        };
        self.first_ref_id_by_label
            .entry(label.to_owned())
            .or_insert_with(|| id.clone());

        FootnoteRef {
            index,
            id,
            href: format!("#fn{index}"),
        }
    }

    /// Labels in index order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Backlink target for the endnote of `label`.
    ///
    /// Falls back to `fnref{index}` when no reference has been rendered.
    pub fn backlink_target(&self, label: &str, index: usize) -> String {
        self.first_ref_id_by_label
            .get(label)
            .cloned()
            .unwrap_or_else(|| format!("fnref{index}"))
    }

    /// Look up a link reference: explicit dictionary first, then the
    /// heading-derived one.
    pub fn lookup(&self, label: &str) -> Option<&'a Reference> {
        self.references
            .and_then(|refs| refs.get(label))
            .or_else(|| self.auto_references.and_then(|refs| refs.get(label)))
    }

    /// Resolve a link or image target.
    ///
    /// A direct destination wins; otherwise the reference label is looked
    /// up. `None` means the link has no target.
    pub fn resolve_destination<'b>(
        &self,
        destination: Option<&'b str>,
        reference: Option<&str>,
    ) -> Option<&'b str>
    where
        'a: 'b,
    {
        destination.or_else(|| {
            self.lookup(reference?)
                .map(|reference| reference.destination.as_str())
        })
    }
}
