//! Memoized source-to-tree compilation.

use std::sync::Arc;

use dj_ast::{AstError, Node};
use dj_cache::{DEFAULT_CAPACITY, LruCache};

use crate::dispatch::DocumentRenderer;
use crate::element::Html;

/// Decodes document sources into trees, keeping the most recently used
/// trees in a bounded cache keyed by the exact source text.
///
/// # Example
///
/// ```
/// use dj_renderer::{Compiler, DocumentRenderer};
///
/// let mut compiler = Compiler::new(8);
/// let source = r#"{"tag":"doc","children":[{"tag":"para","children":[{"tag":"str","text":"hi"}]}]}"#;
/// let html = compiler
///     .render_source(source, &DocumentRenderer::new())
///     .unwrap()
///     .unwrap();
/// assert_eq!(html.to_markup(), "<p>hi</p>");
/// assert_eq!(compiler.len(), 1);
/// ```
#[derive(Debug)]
pub struct Compiler {
    cache: LruCache<String, Arc<Node>>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Compiler {
    /// Create a compiler that keeps at most `capacity` trees.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Decode `source`, returning the cached tree for a repeated source.
    pub fn compile(&mut self, source: &str) -> Result<Arc<Node>, AstError> {
        if let Some(tree) = self.cache.get(source) {
            tracing::trace!(len = source.len(), "Compile cache hit");
            return Ok(Arc::clone(tree));
        }

        let tree = Arc::new(Node::from_json(source)?);
        tracing::debug!(len = source.len(), "Compiled document");
        self.cache.put(source.to_owned(), Arc::clone(&tree));
        Ok(tree)
    }

    /// Compile and render `source`. Empty or whitespace-only sources render
    /// to nothing without touching the cache.
    pub fn render_source(
        &mut self,
        source: &str,
        renderer: &DocumentRenderer,
    ) -> Result<Option<Html>, AstError> {
        if source.trim().is_empty() {
            return Ok(None);
        }
        let tree = self.compile(source)?;
        Ok(renderer.render(&tree))
    }

    /// Number of cached trees.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Drop every cached tree.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
