//! Tree to cache compilation.

use crate::node::{CacheNode, CompositeNode};

/// Iterator over the children of a source node.
pub type Children<'a, N> = Box<dyn Iterator<Item = &'a N> + 'a>;

/// Hooks describing how a source tree maps onto a cache.
///
/// Every hook receives the composite node created for the visited source
/// node by [`CacheSource::composite`], or `None` when the node is not
/// dynamic. Hook errors are propagated by [`CacheBuilder::build`] untouched.
pub trait CacheSource {
    /// The source tree node type.
    type Node;
    /// The payload stored in composite cache nodes.
    type Payload;
    /// The error raised by hooks.
    type Error;

    /// Create the synthetic top container of the cache.
    fn new_root(&self, root: &Self::Node) -> Result<CompositeNode<Self::Payload>, Self::Error>;

    /// Return a new composite node if `node` is dynamic.
    fn composite(
        &self,
        node: &Self::Node,
    ) -> Result<Option<CompositeNode<Self::Payload>>, Self::Error>;

    /// Text emitted before the children of `node`.
    fn text_prefix(
        &self,
        node: &Self::Node,
        composite: Option<&CompositeNode<Self::Payload>>,
    ) -> Result<Option<String>, Self::Error>;

    /// Text emitted after the children of `node`.
    fn text_suffix(
        &self,
        node: &Self::Node,
        composite: Option<&CompositeNode<Self::Payload>>,
    ) -> Result<Option<String>, Self::Error>;

    /// Children of `node` to descend into, `None` for leaves.
    fn children<'a>(
        &self,
        node: &'a Self::Node,
        composite: Option<&CompositeNode<Self::Payload>>,
    ) -> Option<Children<'a, Self::Node>>;
}

/// Compiles source trees into caches.
///
/// The builder holds no per-build state, so one builder can compile any
/// number of trees.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder<S> {
    source: S,
}

impl<S: CacheSource> CacheBuilder<S> {
    /// Create a builder over the given hooks.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Get the hooks.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the hooks mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Compile `root` into a cache.
    pub fn build(&self, root: &S::Node) -> Result<CompositeNode<S::Payload>, S::Error> {
        let mut state = BuildState {
            text: String::new(),
            stack: vec![self.source.new_root(root)?],
        };
        self.visit(root, &mut state)?;
        state.flush();
        debug_assert_eq!(state.stack.len(), 1, "unbalanced cache stack");
        Ok(state.stack.swap_remove(0))
    }

    /// Depth-first visit of one source node.
    fn visit(&self, node: &S::Node, state: &mut BuildState<S::Payload>) -> Result<(), S::Error> {
        let composite = self.source.composite(node)?;
        if let Some(prefix) = self.source.text_prefix(node, composite.as_ref())? {
            state.text.push_str(&prefix);
        }

        let dynamic = composite.is_some();
        if let Some(composite) = composite {
            state.flush();
            state.stack.push(composite);
        }

        let current = if dynamic { state.stack.last() } else { None };
        if let Some(children) = self.source.children(node, current) {
            for child in children {
                self.visit(child, state)?;
            }
        }

        let current = if dynamic { state.stack.last() } else { None };
        if let Some(suffix) = self.source.text_suffix(node, current)? {
            state.text.push_str(&suffix);
        }

        if dynamic {
            state.flush();
            if let Some(done) = state.stack.pop() {
                state.top().push(CacheNode::Composite(done));
            }
        }
        Ok(())
    }
}

/// Mutable state of a single build.
struct BuildState<P> {
    /// Text accumulated since the last flush.
    text: String,
    /// Open composite nodes; the first one is the cache root.
    stack: Vec<CompositeNode<P>>,
}

impl<P> BuildState<P> {
    /// The composite receiving new children.
    fn top(&mut self) -> &mut CompositeNode<P> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Move accumulated text into the current composite.
    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.top().push_text(&text);
    }
}
