//! A self-balancing BST (specifically, an AVL tree). Every node caches the height of the subtree
//! rooted at it and, on the way back up from an insert or delete, any node whose children differ
//! in height by more than one is rotated back into shape.
//!
//! Because the height stays in `O(lg N)`, the operations here recurse freely.
//!
//! # Examples
//!
//! ```
//! use search_trees::avl::Tree;
//!
//! let mut tree = Tree::new();
//! for key in 1..=7 {
//!     tree.insert(key);
//! }
//!
//! // Sorted input would make a plain BST 7 levels deep.
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.level_order(), [&4, &2, &6, &1, &3, &5, &7]);
//!
//! tree.delete(&4);
//! assert!(tree.search(&4).is_none());
//! assert_eq!(tree.in_order(), [&1, &2, &3, &5, &6, &7]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::trace;

use crate::traverse::{self, Cursor};
use crate::OrderedStore;

type Link<K> = Option<Box<Node<K>>>;

/// An AVL tree of keys. Equal keys are kept and inserted to the right, although rotations may
/// later move them around; the in-order walk is always sorted.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

/// A single node of a [`Tree`]. Handed out by [`Tree::search`].
///
/// A node's key never changes once it is placed, with one exception: deleting a node with two
/// children moves its in-order successor's key into it (see [`Tree::delete`]).
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The root of the left subtree, if there is one.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of the right subtree, if there is one.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// The cached height of the subtree rooted here.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Overwrites this node's key with its in-order successor's during a two-child delete. This
    /// is the only place a placed key is ever changed.
    fn replace_key(&mut self, successor: K) {
        self.key = successor;
    }

    fn left_height(&self) -> usize {
        height(&self.left)
    }

    fn right_height(&self) -> usize {
        height(&self.right)
    }

    /// Recomputes this node's height from its children, which must already be correct.
    fn fix_height(&mut self) {
        self.height = self.left_height().max(self.right_height()) + 1;
    }

    /// Positive when the left subtree is taller, negative when the right one is.
    fn balance_factor(&self) -> isize {
        self.left_height() as isize - self.right_height() as isize
    }
}

fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl<'a, K> Cursor<'a, K> for &'a Node<K> {
    fn key(self) -> &'a K {
        &self.key
    }

    fn left(self) -> Option<Self> {
        self.left.as_deref()
    }

    fn right(self) -> Option<Self> {
        self.right.as_deref()
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("keys", &self.in_order())
            .finish()
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
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
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// The height of the tree. This is cached in the root so it's `O(1)`.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts `key` as a new leaf like a plain BST would (equal keys go right) and then
    /// rebalances every node on the path back up to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(3);
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// // 3 -> 2 -> 1 is too tall on the left, so 2 is rotated up.
    /// assert_eq!(tree.pre_order(), [&2, &1, &3]);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        self.root = Some(insert(self.root.take(), key));
        self.len += 1;
    }

    /// Finds the first node on the path from the root whose key equals `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.search(&1).map(|node| node.height()), Some(1));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }

        None
    }

    /// Removes the first node on the search path whose key equals `key`, exactly like
    /// [`bst::Tree::delete`](crate::bst::Tree::delete), then rebalances every node on the path
    /// back up. Unlike insertion this can rotate at every level. Deleting a missing key does
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 1, 3, 4] {
    ///     tree.insert(key);
    /// }
    ///
    /// // Removing 1 leaves 2 -> 3 -> 4 leaning right, so 3 is rotated up.
    /// tree.delete(&1);
    /// assert_eq!(tree.pre_order(), [&3, &2, &4]);
    /// ```
    pub fn delete(&mut self, key: &K)
    where
        K: Ord,
    {
        let (root, deleted) = delete(self.root.take(), key);
        self.root = root;
        if deleted {
            self.len -= 1;
        }
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

fn insert<K: Ord>(link: Link<K>, key: K) -> Box<Node<K>> {
    let Some(mut node) = link else {
        return Node::new_boxed(key);
    };

    if key < node.key {
        node.left = Some(insert(node.left.take(), key));
    } else {
        node.right = Some(insert(node.right.take(), key));
    }

    node.fix_height();
    balance(node)
}

/// Returns the subtree with `key` removed, and whether anything was removed.
fn delete<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    let deleted = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, deleted) = delete(node.left.take(), key);
            node.left = left;
            deleted
        }
        Ordering::Greater => {
            let (right, deleted) = delete(node.right.take(), key);
            node.right = right;
            deleted
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => return (right, true),
            (left, None) => return (left, true),
            (left, Some(right)) => {
                let (successor, right) = take_leftmost(right);
                node.replace_key(successor);
                node.left = left;
                node.right = right;
                true
            }
        },
    };

    node.fix_height();
    (Some(balance(node)), deleted)
}

/// Unlinks the leftmost node of `node`'s subtree, rebalancing on the way back up, and returns
/// its key along with what is left of the subtree.
fn take_leftmost<K>(mut node: Box<Node<K>>) -> (K, Link<K>) {
    let Some(left) = node.left.take() else {
        let Node { key, right, .. } = *node;
        return (key, right);
    };

    let (key, left) = take_leftmost(left);
    node.left = left;
    node.fix_height();
    (key, Some(balance(node)))
}

/// Restores the AVL invariant at `node` assuming both its subtrees already satisfy it and its
/// height is current. Returns the new root of the subtree.
///
/// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
fn balance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let factor = node.balance_factor();
    let node = if factor > 1 {
        if node.left.as_ref().map_or(false, |left| left.balance_factor() < 0) {
            // Left-right: straighten the left child out first.
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if factor < -1 {
        if node.right.as_ref().map_or(false, |right| right.balance_factor() > 0) {
            // Right-left.
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    };

    // In debug builds, assert that we've restored/maintained the AVL invariant.
    if cfg!(debug_assertions) {
        let left_height = node.left_height();
        let right_height = node.right_height();
        assert_eq!(node.height, left_height.max(right_height) + 1);
        assert!(left_height.abs_diff(right_height) <= 1);
    }

    node
}

/// Rotates `old_root` to the right. This moves the left child up vertically and `old_root` down
/// vertically. Used to rebalance the tree when the left child is too tall. As such, it must only
/// be called when there _is_ a left child.
///
/// ## Panics
///
/// When called on a node without a left child.
///
/// # Diagram
///
/// ```text
///       old_root               new_root
///        /     \               /     \
///   new_root    z   rotate -> x    old_root
///    /   \                          /   \
///   x     y                        y     z
/// ```
fn rotate_right<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = old_root
        .left
        .take()
        .expect("rotate right => left child");
    trace!("avl: rotating right");

    old_root.left = new_root.right.take();
    old_root.fix_height();

    new_root.right = Some(old_root);
    new_root.fix_height();
    new_root
}

/// The mirror image of [`rotate_right`]: the right child moves up and `old_root` becomes its
/// left child, adopting the right child's old left subtree.
///
/// ## Panics
///
/// When called on a node without a right child.
fn rotate_left<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = old_root
        .right
        .take()
        .expect("rotate left => right child");
    trace!("avl: rotating left");

    old_root.right = new_root.left.take();
    old_root.fix_height();

    new_root.left = Some(old_root);
    new_root.fix_height();
    new_root
}

impl<K: Ord> OrderedStore<K> for Tree<K> {
    fn insert(&mut self, key: K) {
        Tree::insert(self, key)
    }

    fn delete(&mut self, key: &K) {
        Tree::delete(self, key)
    }

    fn search(&self, key: &K) -> Option<&K> {
        Tree::search(self, key).map(Node::key)
    }

    fn height(&self) -> usize {
        Tree::height(self)
    }

    fn pre_order(&self) -> Vec<&K> {
        Tree::pre_order(self)
    }

    fn in_order(&self) -> Vec<&K> {
        Tree::in_order(self)
    }

    fn post_order(&self) -> Vec<&K> {
        Tree::post_order(self)
    }

    fn level_order(&self) -> Vec<&K> {
        Tree::level_order(self)
    }
}
