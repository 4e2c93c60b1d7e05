//! A Red-Black tree. Every node is coloured red or black such that:
//!
//! 1. The root is black.
//! 2. A red node never has a red child.
//! 3. Every path from a node down to an empty child passes through the same number of black
//!    nodes (the node's black-height).
//! 4. Empty children ("NIL") count as black.
//!
//! Together these keep the longest root-to-leaf path at most twice as long as the shortest, so
//! the height stays in `O(lg N)`. Insertion restores the rules with at most two rotations and a
//! walk of recolourings up the tree.
//!
//! Deletion is only the structural BST delete: the node is unlinked and its parent links are
//! kept consistent, but nothing is recoloured or rotated afterwards. Deleting can therefore
//! break rules 1 and 3; the ordering of the keys is always kept.
//!
//! Nodes live in an arena and refer to each other by index. A child slot is either `None`
//! (standing in for the shared black NIL leaf) or the index of a live node, so asking for the
//! colour or parent of "NIL" never touches a real node.
//!
//! # Examples
//!
//! ```
//! use search_trees::rbtree::{Color, RbTree};
//!
//! let mut tree = RbTree::new();
//! for key in 1..=3 {
//!     tree.insert(key);
//! }
//!
//! // Three ascending keys are rotated into a balanced shape.
//! let root = tree.root().unwrap();
//! assert_eq!(*root.key(), 2);
//! assert_eq!(root.color(), Color::Black);
//! assert_eq!(root.left().map(|n| n.color()), Some(Color::Red));
//! assert_eq!(tree.height(), 2);
//!
//! tree.delete(&2);
//! assert!(tree.search(&2).is_none());
//! assert_eq!(tree.in_order(), [&1, &3]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

use log::trace;

use crate::traverse::{self, Cursor};
use crate::OrderedStore;

/// The colour of a node. Empty children are always considered black.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// A red node. Its children must be black.
    Red,
    /// A black node.
    Black,
}

/// The stable index of a node inside an [`RbTree`]'s arena. Indices of deleted nodes are reused
/// by later insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Left = 0,
    Right = 1,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A node record in the arena.
///
/// `key` only changes when a node with two children is deleted and takes over its in-order
/// successor's key.
struct Node<K> {
    key: K,
    color: Color,
    /// Navigation only; ownership runs from the arena, and structurally from parent to child.
    parent: Option<NodeId>,
    child: [Option<NodeId>; 2],
}

impl<K> Index<Direction> for Node<K> {
    type Output = Option<NodeId>;

    fn index(&self, dir: Direction) -> &Self::Output {
        &self.child[dir as usize]
    }
}

impl<K> IndexMut<Direction> for Node<K> {
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        &mut self.child[dir as usize]
    }
}

/// A Red-Black tree of keys. Equal keys are kept and inserted to the right.
pub struct RbTree<K> {
    /// Every node ever allocated. Deleted nodes leave a `None` behind whose index goes on the
    /// `free` list.
    nodes: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

/// A read-only view of one node of an [`RbTree`], as returned by [`RbTree::search`].
pub struct NodeRef<'a, K> {
    tree: &'a RbTree<K>,
    id: NodeId,
}

// Manual impls so `K` doesn't have to be `Clone`.
impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    fn at(tree: &'a RbTree<K>, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self { tree, id })
    }

    /// The arena index of this node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The key stored in this node.
    pub fn key(self) -> &'a K {
        &self.tree.node(self.id).key
    }

    /// The colour of this node.
    pub fn color(self) -> Color {
        self.tree.node(self.id).color
    }

    /// The node above this one, or `None` for the root.
    pub fn parent(self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.id).parent)
    }

    /// The left child, or `None` if it is NIL.
    pub fn left(self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.id)[Direction::Left])
    }

    /// The right child, or `None` if it is NIL.
    pub fn right(self) -> Option<Self> {
        Self::at(self.tree, self.tree.node(self.id)[Direction::Right])
    }
}

impl<'a, K> Cursor<'a, K> for NodeRef<'a, K> {
    fn key(self) -> &'a K {
        NodeRef::key(self)
    }

    fn left(self) -> Option<Self> {
        NodeRef::left(self)
    }

    fn right(self) -> Option<Self> {
        NodeRef::right(self)
    }
}

impl<K> fmt::Debug for NodeRef<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key())
            .field("color", &self.color())
            .finish()
    }
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for RbTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("keys", &self.in_order())
            .finish()
    }
}

impl<K> RbTree<K> {
    /// Generates a new, empty `RbTree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// How many keys are stored, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        NodeRef::at(self, self.root)
    }

    fn node(&self, id: NodeId) -> &Node<K> {
        self.nodes[id.0]
            .as_ref()
            .expect("node ids held by the tree are always live")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.nodes[id.0]
            .as_mut()
            .expect("node ids held by the tree are always live")
    }

    /// The colour of a child slot. NIL is black.
    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.node(id).color)
    }

    /// Which side of `parent` the node `child` hangs on.
    fn side_of(&self, child: NodeId, parent: NodeId) -> Direction {
        if self.node(parent)[Direction::Left] == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Takes a node out of the arena. The caller must already have unlinked it.
    fn release(&mut self, id: NodeId) -> Node<K> {
        let node = self.nodes[id.0]
            .take()
            .expect("only live nodes are released");
        self.free.push(id);
        node
    }

    /// The number of nodes on the longest root-to-leaf path, not counting NIL leaves. This walks
    /// the whole tree every time; nothing is cached.
    pub fn height(&self) -> usize {
        traverse::height(self.root())
    }

    /// Finds the first node on the path from the root whose key equals `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rbtree::{Color, RbTree};
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1);
    ///
    /// let found = tree.search(&1).unwrap();
    /// assert_eq!(found.color(), Color::Black);
    /// assert!(found.parent().is_none());
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<NodeRef<'_, K>>
    where
        K: Ord,
    {
        NodeRef::at(self, self.find(key))
    }

    fn find(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(&node.key) {
                Ordering::Less => node[Direction::Left],
                Ordering::Equal => return Some(id),
                Ordering::Greater => node[Direction::Right],
            };
        }

        None
    }

    /// Inserts `key` as a new red leaf (equal keys go right) and then recolours and rotates until
    /// the red-black rules hold again.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rbtree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// for key in 1..=1_000 {
    ///     tree.insert(key);
    /// }
    ///
    /// assert_eq!(tree.len(), 1_000);
    /// assert!(tree.height() <= 20);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        // Walk down to the NIL slot the key belongs in, remembering its parent.
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            dir = if key < node.key {
                Direction::Left
            } else {
                Direction::Right
            };
            parent = Some(id);
            current = node[dir];
        }

        let id = self.alloc(Node {
            key,
            color: Color::Red,
            parent,
            child: [None, None],
        });
        match parent {
            Some(parent) => self.node_mut(parent)[dir] = Some(id),
            None => self.root = Some(id),
        }
        self.len += 1;

        self.fix_insert(id);
    }

    /// Repairs a red node `z` that may have a red parent. Each pass either pushes the problem two
    /// levels up (red uncle) or fixes it for good with one or two rotations (black uncle).
    fn fix_insert(&mut self, mut z: NodeId) {
        while let Some(parent) = self.red_parent(z) {
            // Only a delete can leave the root red. Blackening it at the end is all that's
            // needed then.
            let Some(grandparent) = self.node(parent).parent else {
                break;
            };
            let side = self.side_of(parent, grandparent);
            let uncle = self.node(grandparent)[side.opposite()];

            if self.color_of(uncle) == Color::Red {
                trace!("rbtree: red uncle, recolouring");
                self.node_mut(parent).color = Color::Black;
                if let Some(uncle) = uncle {
                    self.node_mut(uncle).color = Color::Black;
                }
                self.node_mut(grandparent).color = Color::Red;
                z = grandparent;
                continue;
            }

            if self.node(parent)[side.opposite()] == Some(z) {
                // Inner child: rotate it into line with its parent first.
                z = parent;
                self.rotate(z, side);
            }
            let parent = self
                .node(z)
                .parent
                .expect("the rotated node still has a parent");
            self.node_mut(parent).color = Color::Black;
            self.node_mut(grandparent).color = Color::Red;
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    /// `z`'s parent if it is red.
    fn red_parent(&self, z: NodeId) -> Option<NodeId> {
        self.node(z)
            .parent
            .filter(|&parent| self.node(parent).color == Color::Red)
    }

    /// Rotates the subtree rooted at `x` so that `x` moves down on the `dir` side and its child
    /// on the other side takes its place. `Direction::Left` is a left rotation. Returns the
    /// promoted node.
    ///
    /// ## Panics
    ///
    /// When `x` has no child opposite `dir`.
    ///
    /// # Diagram
    ///
    /// A left rotation:
    ///
    /// ```text
    ///     Option<parent>          Option<parent>
    ///         |                       |
    ///         x                       y
    ///        / \     rotate ->       / \
    ///       a   y                   x   c
    ///          / \                 / \
    ///         b   c               a   b
    /// ```
    fn rotate(&mut self, x: NodeId, dir: Direction) -> NodeId {
        let y = self.node(x)[dir.opposite()].expect("rotation needs a child to promote");
        let middle = self.node(y)[dir];
        let parent = self.node(x).parent;
        trace!("rbtree: rotating {:?} at {:?}", dir, x);

        self.node_mut(x)[dir.opposite()] = middle;
        if let Some(middle) = middle {
            self.node_mut(middle).parent = Some(x);
        }

        self.replace_child(parent, x, Some(y));
        self.node_mut(y).parent = parent;
        self.node_mut(y)[dir] = Some(x);
        self.node_mut(x).parent = Some(y);

        if cfg!(debug_assertions) {
            self.assert_links(x);
            self.assert_links(y);
        }
        y
    }

    /// Points whatever referred to `old` (its parent's child slot, or the root) at `new` instead.
    /// Doesn't touch `new`'s own parent link.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.node_mut(parent)[side] = new;
            }
            None => self.root = new,
        }
    }

    /// Replaces the subtree at `old` with the one at `new`, including `new`'s parent link.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.node(old).parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    /// Checks the parent and child links around `id` agree with each other.
    fn assert_links(&self, id: NodeId) {
        let node = self.node(id);
        match node.parent {
            Some(parent) => assert!(
                self.node(parent)[Direction::Left] == Some(id)
                    || self.node(parent)[Direction::Right] == Some(id)
            ),
            None => assert_eq!(self.root, Some(id)),
        }
        for child in node.child.into_iter().flatten() {
            assert_eq!(self.node(child).parent, Some(id));
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id)[Direction::Left] {
            id = left;
        }
        id
    }

    /// Removes the first node on the search path whose key equals `key`, the same way
    /// [`bst::Tree::delete`](crate::bst::Tree::delete) does. Deleting a missing key does nothing.
    ///
    /// Only the links are repaired: no recolouring or rotation follows, so after a delete the
    /// root may be red and black-heights may differ. The key order is always kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rbtree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// for key in [5, 3, 8, 7, 9] {
    ///     tree.insert(key);
    /// }
    ///
    /// tree.delete(&5);
    /// assert_eq!(tree.root().map(|node| *node.key()), Some(7));
    /// assert_eq!(tree.in_order(), [&3, &7, &8, &9]);
    /// ```
    pub fn delete(&mut self, key: &K)
    where
        K: Ord,
    {
        let Some(z) = self.find(key) else {
            return;
        };

        let node = self.node(z);
        match (node[Direction::Left], node[Direction::Right]) {
            (None, child) | (child, None) => {
                self.transplant(z, child);
                self.release(z);
            }
            (Some(_), Some(right)) => {
                // Hand z the successor's key and unlink the successor, which has no left child.
                let successor = self.leftmost(right);
                let successor_right = self.node(successor)[Direction::Right];
                self.transplant(successor, successor_right);
                let successor = self.release(successor);
                self.node_mut(z).key = successor.key;
            }
        }
        self.len -= 1;
    }

    /// Keys in root, left, right order.
    pub fn pre_order(&self) -> Vec<&K> {
        traverse::pre_order(self.root())
    }

    /// Keys in sorted order.
    pub fn in_order(&self) -> Vec<&K> {
        traverse::in_order(self.root())
    }

    /// Keys in left, right, root order.
    pub fn post_order(&self) -> Vec<&K> {
        traverse::post_order(self.root())
    }

    /// Keys level by level, left to right.
    pub fn level_order(&self) -> Vec<&K> {
        traverse::level_order(self.root())
    }
}

impl<K: Ord> OrderedStore<K> for RbTree<K> {
    fn insert(&mut self, key: K) {
        RbTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) {
        RbTree::delete(self, key)
    }

    fn search(&self, key: &K) -> Option<&K> {
        RbTree::search(self, key).map(NodeRef::key)
    }

    fn height(&self) -> usize {
        RbTree::height(self)
    }

    fn pre_order(&self) -> Vec<&K> {
        RbTree::pre_order(self)
    }

    fn in_order(&self) -> Vec<&K> {
        RbTree::in_order(self)
    }

    fn post_order(&self) -> Vec<&K> {
        RbTree::post_order(self)
    }

    fn level_order(&self) -> Vec<&K> {
        RbTree::level_order(self)
    }
}
