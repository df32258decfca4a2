//! Arena-allocated nodes and their forward links.
//!
//! Nodes live in a `Vec` and refer to each other by slot index, never by
//! reference. Slot 0 is the head sentinel. Removed nodes are put on a free
//! list and their slot is reused by the next insert.
//!
//! ```text
//! Level 2: HEAD ---------(3)---------> C ---------(3)---------> NULL
//! Level 1: HEAD ---(1)---> A ---(2)--> C ---(1)--> D ---(2)---> NULL
//! Level 0: HEAD -(1)-> A -(1)-> B -(1)-> C -(1)-> D -(1)-> E -(1)-> NULL
//! ```
//!
//! The number on a link is its span: how many level 0 steps it covers.
//! Links to NULL span up to the virtual position `size + 1`.

use smallvec::SmallVec;

/// Slot index into the node arena. u32 keeps links small.
pub(crate) type Idx = u32;

/// Marks the end of a level.
pub(crate) const NULL: Idx = Idx::MAX;

/// The head sentinel always occupies slot 0.
pub(crate) const HEAD: Idx = 0;

/// Most nodes are 1 or 2 levels tall at p = 0.5.
pub(crate) type Links = SmallVec<[Link; 4]>;

/// One forward link of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    /// The next node at this level, or `NULL`.
    pub next: Idx,
    /// Level 0 steps between this node and `next`.
    pub span: usize,
}

impl Link {
    pub fn new(next: Idx, span: usize) -> Link {
        Link { next, span }
    }
}

/// A stored value with one link per level it participates in.
/// The head and free slots have no value.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub value: Option<T>,
    pub links: Links,
}

impl<T> Node<T> {
    fn new(value: T, height: usize) -> Self {
        let mut links = Links::new();
        links.resize(height, Link::new(NULL, 0));
        Node {
            value: Some(value),
            links,
        }
    }

    fn new_head() -> Self {
        Node {
            value: None,
            links: Links::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.links.len()
    }
}

/// Owns every node, the head included.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<Idx>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            nodes: vec![Node::new_head()],
            free_list: Vec::new(),
        }
    }

    #[inline]
    pub fn node(&self, idx: Idx) -> &Node<T> {
        &self.nodes[idx as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, idx: Idx) -> &mut Node<T> {
        &mut self.nodes[idx as usize]
    }

    #[inline]
    pub fn head(&self) -> &Node<T> {
        self.node(HEAD)
    }

    #[inline]
    pub fn head_mut(&mut self) -> &mut Node<T> {
        self.node_mut(HEAD)
    }

    #[inline]
    pub fn link(&self, idx: Idx, level: usize) -> Link {
        self.node(idx).links[level]
    }

    #[inline]
    pub fn link_mut(&mut self, idx: Idx, level: usize) -> &mut Link {
        &mut self.node_mut(idx).links[level]
    }

    /// The value held by a live, non-head node.
    #[inline]
    pub fn value(&self, idx: Idx) -> &T {
        match &self.node(idx).value {
            Some(value) => value,
            None => panic!("slot {} holds no value", idx),
        }
    }

    /// Store a value in a fresh or recycled slot with `height` unlinked levels.
    pub fn alloc(&mut self, value: T, height: usize) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            let node = self.node_mut(idx);
            node.value = Some(value);
            node.links.clear();
            node.links.resize(height, Link::new(NULL, 0));
            idx
        } else {
            let idx = self.nodes.len() as Idx;
            assert!(idx != NULL, "skip list arena exhausted");
            self.nodes.push(Node::new(value, height));
            idx
        }
    }

    /// Take the value out of a node that has already been unlinked
    /// from every level, and recycle its slot.
    pub fn free(&mut self, idx: Idx) -> T {
        debug_assert!(idx != HEAD, "the head is never freed");
        let node = self.node_mut(idx);
        node.links.clear();
        let value = node.value.take();
        self.free_list.push(idx);
        match value {
            Some(value) => value,
            None => panic!("slot {} freed twice", idx),
        }
    }

    /// Drop every node except a fresh head.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::new_head();
        self.free_list.clear();
    }

    /// Slots in use, head excluded.
    pub fn live(&self) -> usize {
        self.nodes.len() - 1 - self.free_list.len()
    }

    /// Approximate bytes owned by the arena.
    pub fn size_of(&self) -> usize {
        let spilled: usize = self
            .nodes
            .iter()
            .filter(|node| node.links.spilled())
            .map(|node| node.links.capacity() * std::mem::size_of::<Link>())
            .sum();
        self.nodes.capacity() * std::mem::size_of::<Node<T>>()
            + self.free_list.capacity() * std::mem::size_of::<Idx>()
            + spilled
    }
}
