//! Bulk allocator for trie nodes.
//!
//! Nodes are allocated in fixed-size pages; a `NodeId` is a stable
//! handle into a page, replacing the original's raw pointer. Because
//! slot classification is now the `Slot` enum (see `node.rs`), the
//! arena no longer needs to expose an `is_trie_pointer` range test to
//! the rest of the engine — it only needs to hand out and dereference
//! ids, which it does with a bounds assertion instead.

use crate::error::EngineError;
use crate::node::TrieNode;

/// Nodes held per page before a new page is appended.
pub const NODES_PER_PAGE: usize = 32768;

/// Hard cap on the number of pages the arena will allocate.
pub const MAX_PAGES: usize = 128;

/// A stable handle into the arena. Never reused across a burst: a
/// node that stops being referenced (its slot replaced) is simply
/// leaked until the whole arena is torn down, matching the original's
/// "pages are never freed individually until teardown" discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Bulk allocator for `TrieNode`s, organised as an ordered list of
/// pack pages.
#[derive(Debug)]
pub struct Arena {
    pages: Vec<Vec<TrieNode>>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            pages: vec![Vec::with_capacity(NODES_PER_PAGE)],
        }
    }

    /// Number of live pages.
    pub fn pages(&self) -> usize {
        self.pages.len()
    }

    /// Total nodes allocated so far, across every page.
    pub fn node_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// Allocate a freshly zeroed trie node, appending a new page if
    /// the current one is full. Fails once the hard page cap is hit.
    pub fn alloc_node(&mut self) -> Result<NodeId, EngineError> {
        let last = self.pages.last().expect("arena always has at least one page");

        if last.len() == NODES_PER_PAGE {
            if self.pages.len() >= MAX_PAGES {
                return Err(EngineError::ArenaExhausted { pages: MAX_PAGES });
            }
            self.pages.push(Vec::with_capacity(NODES_PER_PAGE));
        }

        let page_index = self.pages.len() - 1;
        let page = &mut self.pages[page_index];
        page.push(TrieNode::new());

        Ok(NodeId(page_index * NODES_PER_PAGE + page.len() - 1))
    }

    fn locate(&self, id: NodeId) -> (usize, usize) {
        (id.0 / NODES_PER_PAGE, id.0 % NODES_PER_PAGE)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::new()
    }
}

impl std::ops::Index<NodeId> for Arena {
    type Output = TrieNode;

    fn index(&self, id: NodeId) -> &TrieNode {
        let (page, offset) = self.locate(id);
        &self.pages[page][offset]
    }
}

impl std::ops::IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut TrieNode {
        let (page, offset) = self.locate(id);
        &mut self.pages[page][offset]
    }
}
