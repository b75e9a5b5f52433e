//! Path-compressed binary prefix trie.
//!
//! Nodes live in a per-trie arena and are addressed by index. Slots released
//! by compaction go to a free-list and are reused by later insertions, so a
//! long insertion run does not churn the allocator.

use crate::bits::BitView;

/// Arena index of a node.
type NodeId = u32;

/// The root occupies slot 0 and is never a child, so 0 doubles as "no child".
const ROOT: NodeId = 0;
const NONE: NodeId = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Node {
    /// Every address reachable through this node matches.
    full: bool,
    children: [NodeId; 2],
}

/// Binary trie answering "is this address covered by any inserted prefix?".
///
/// The trie is family-agnostic: it is bound to a bit length (`limit`) at
/// construction and trusts its callers to pass addresses with at least
/// `limit` bits and prefix lengths no greater than `limit`. Use
/// [`Matcher`](crate::Matcher) for validated, per-family access.
///
/// Insertion keeps the tree compact: a node whose two children are both full
/// becomes full itself and its children are released, so inserting a set of
/// prefixes that tiles a range costs a single node.
///
/// # Panics
/// Nodes are addressed by `u32`, so an insertion that would need more than
/// `u32::MAX` live nodes panics rather than aliasing an existing node.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    limit: usize,
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    /// Scratch stack of ancestors visited by the current insertion.
    path: Vec<NodeId>,
}

impl PrefixTrie {
    /// Create an empty trie over addresses of `limit` bits.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            nodes: vec![Node::default()],
            free: Vec::new(),
            path: Vec::with_capacity(limit),
        }
    }

    /// Bit length of the addresses this trie covers.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Whether the whole address space is covered.
    pub fn is_full(&self) -> bool {
        self.nodes[ROOT as usize].full
    }

    /// Test whether `address` falls inside any inserted prefix.
    ///
    /// # Panics
    /// Panics if `address` is shorter than `limit` bits.
    pub fn matches(&self, address: &[u8]) -> bool {
        let bits = BitView::new(address);
        let mut now = &self.nodes[ROOT as usize];
        for idx in 0..self.limit {
            if now.full {
                return true;
            }
            let next = now.children[bits.get(idx)];
            if next == NONE {
                return false;
            }
            now = &self.nodes[next as usize];
        }
        // A prefix of exactly `limit` bits marks the node at the bottom.
        now.full
    }

    /// Insert the prefix made of the first `prefix_len` bits of `address`.
    ///
    /// # Panics
    /// Panics if `address` is shorter than `prefix_len` bits.
    pub fn add(&mut self, address: &[u8], prefix_len: usize) {
        debug_assert!(prefix_len <= self.limit);

        let bits = BitView::new(address);
        self.path.clear();

        let mut now = ROOT;
        for idx in 0..prefix_len {
            if self.nodes[now as usize].full {
                // Already covered by a shorter prefix.
                return;
            }
            self.path.push(now);
            let bit = bits.get(idx);
            let mut next = self.nodes[now as usize].children[bit];
            if next == NONE {
                next = self.alloc();
                self.nodes[now as usize].children[bit] = next;
            }
            now = next;
        }

        if self.nodes[now as usize].full {
            return;
        }
        // Longer prefixes inserted earlier are now redundant.
        self.release_children(now);
        self.nodes[now as usize].full = true;

        while let Some(parent) = self.path.pop() {
            let [left, right] = self.nodes[parent as usize].children;
            if left == NONE
                || right == NONE
                || !self.nodes[left as usize].full
                || !self.nodes[right as usize].full
            {
                break;
            }
            self.release(left);
            self.release(right);
            self.nodes[parent as usize] = Node {
                full: true,
                children: [NONE; 2],
            };
        }
    }

    fn alloc(&mut self) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = Node::default();
                id
            }
            None => {
                let id = NodeId::try_from(self.nodes.len()).expect("trie arena exhausted");
                self.nodes.push(Node::default());
                id
            }
        }
    }

    /// Return a single node to the free-list. Its children must already be gone.
    fn release(&mut self, id: NodeId) {
        self.nodes[id as usize] = Node::default();
        self.free.push(id);
    }

    /// Release every descendant of `id`, leaving `id` itself childless.
    fn release_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id as usize].children);
        if children == [NONE; 2] {
            return;
        }

        let mut stack: Vec<NodeId> = children.into_iter().filter(|&c| c != NONE).collect();
        while let Some(id) = stack.pop() {
            let node = self.nodes[id as usize];
            stack.extend(node.children.into_iter().filter(|&c| c != NONE));
            self.release(id);
        }
    }
}

#[cfg(test)]
impl PrefixTrie {
    /// Walk the reachable tree and assert its structural invariants.
    pub(crate) fn validate(&self) {
        let mut stack = vec![ROOT];
        let mut reachable = 0usize;
        let mut depth_of = vec![0usize];
        while let Some(id) = stack.pop() {
            let depth = depth_of.pop().unwrap();
            reachable += 1;
            assert!(depth <= self.limit, "node deeper than limit: {depth}");

            let node = self.nodes[id as usize];
            assert!(
                !self.free.contains(&id),
                "reachable node {id} is on the free-list"
            );
            if node.full {
                assert_eq!(node.children, [NONE; 2], "full node {id} has children");
            }
            let [left, right] = node.children;
            if left != NONE && right != NONE {
                assert!(
                    !(self.nodes[left as usize].full && self.nodes[right as usize].full),
                    "node {id} has two full children"
                );
            }
            for child in node.children.into_iter().filter(|&c| c != NONE) {
                stack.push(child);
                depth_of.push(depth + 1);
            }
        }
        assert_eq!(reachable, self.node_count(), "leaked or double-freed nodes");
    }

    /// Pre-order encoding of the reachable tree, independent of arena slots.
    pub(crate) fn shape(&self) -> Vec<(bool, bool, bool)> {
        let mut out = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = self.nodes[id as usize];
            let [left, right] = node.children;
            out.push((node.full, left != NONE, right != NONE));
            if right != NONE {
                stack.push(right);
            }
            if left != NONE {
                stack.push(left);
            }
        }
        out
    }

    pub(crate) fn root_children(&self) -> [bool; 2] {
        let [left, right] = self.nodes[ROOT as usize].children;
        [left != NONE, right != NONE]
    }
}
