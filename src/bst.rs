//! A plain, unbalanced BST. Nothing is ever rotated, so inserting keys in sorted order builds a
//! linked list with a height equal to the number of keys. That is the point of it: it's the
//! baseline the balanced trees are measured against.
//!
//! Because the tree can be that deep, every operation here walks it with a loop (or an explicit
//! stack) rather than recursion. That includes dropping it.
//!
//! # Examples
//!
//! ```
//! use search_trees::bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_none());
//!
//! tree.insert(2);
//! tree.insert(1);
//! tree.insert(3);
//! assert_eq!(tree.search(&1).map(|node| *node.key()), Some(1));
//! assert_eq!(tree.height(), 2);
//!
//! // Deleting a key that isn't there does nothing.
//! tree.delete(&42);
//! assert_eq!(tree.len(), 3);
//!
//! tree.delete(&2);
//! assert!(tree.search(&2).is_none());
//! assert_eq!(tree.in_order(), [&1, &3]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::traverse::{self, Cursor};
use crate::OrderedStore;

type Link<K> = Option<Box<Node<K>>>;

/// An unbalanced Binary Search Tree of keys. Equal keys are kept and always go to the right.
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
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
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

    /// Overwrites this node's key with its in-order successor's during a two-child delete. This
    /// is the only place a placed key is ever changed.
    fn replace_key(&mut self, successor: K) {
        self.key = successor;
    }
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

impl<K> Drop for Tree<K> {
    // The derived drop would recurse once per level, which a degenerate tree can't afford.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
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

    /// Adds a new leaf holding `key` where a walk down from the root first runs out of
    /// children. Keys equal to a node's key go right, so inserting an existing key adds a
    /// duplicate rather than replacing anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.pre_order(), [&1, &1]);
    /// assert!(tree.root().unwrap().right().is_some());
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }

        *link = Some(Node::new_boxed(key));
        self.len += 1;
    }

    /// Finds the first node on the path from the root whose key equals `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.search(&1).map(|node| *node.key()), Some(1));
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

    /// Removes the first node on the search path whose key equals `key`. If there is no such
    /// node nothing happens.
    ///
    /// - A node without a left child is replaced by its right subtree.
    /// - A node without a right child is replaced by its left subtree.
    /// - A node with both children takes the key of its in-order successor (the leftmost node
    ///   of its right subtree) and that successor, which has no left child, is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree = Tree::new();
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
        let mut link = &mut self.root;
        loop {
            let ordering = match link.as_deref() {
                Some(node) => key.cmp(&node.key),
                None => return,
            };
            if ordering == Ordering::Equal {
                break;
            }
            if let Some(node) = link {
                link = if ordering == Ordering::Less {
                    &mut node.left
                } else {
                    &mut node.right
                };
            }
        }

        Self::unlink(link);
        self.len -= 1;
    }

    /// Removes the node `link` points at, splicing its children back into the tree.
    fn unlink(link: &mut Link<K>) {
        let Some(node) = link else {
            return;
        };

        if node.left.is_some() && node.right.is_some() {
            if let Some(successor) = Self::take_leftmost(&mut node.right) {
                node.replace_key(successor);
            }
            return;
        }

        if let Some(node) = link.take() {
            let Node { left, right, .. } = *node;
            *link = left.or(right);
        }
    }

    /// Unlinks the leftmost node of the subtree at `link`, replacing it with its right subtree,
    /// and returns its key.
    fn take_leftmost(link: &mut Link<K>) -> Option<K> {
        let mut link = link;
        while link.as_ref().map_or(false, |node| node.left.is_some()) {
            if let Some(node) = link {
                link = &mut node.left;
            }
        }

        let node = link.take()?;
        let Node { key, right, .. } = *node;
        *link = right;
        Some(key)
    }

    /// The number of nodes on the longest root-to-leaf path. This walks the whole tree every
    /// time; nothing is cached.
    pub fn height(&self) -> usize {
        traverse::height(self.root())
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

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(keys: Vec<&i32>) -> Vec<i32> {
        keys.into_iter().copied().collect()
    }

    fn tree_of(keys: &[i32]) -> Tree<i32> {
        let mut tree = Tree::new();
        for key in keys {
            tree.insert(*key);
        }
        tree
    }

    /// Checks the ordering invariant on every node, including that duplicates went right.
    fn assert_ordered(tree: &Tree<i32>) {
        let mut stack: Vec<(&Node<i32>, Option<i32>, Option<i32>)> =
            tree.root().into_iter().map(|n| (n, None, None)).collect();
        while let Some((node, low, high)) = stack.pop() {
            // Everything in a subtree is >= the lower bound and < the upper bound.
            assert!(low.map_or(true, |low| node.key >= low));
            assert!(high.map_or(true, |high| node.key < high));
            stack.extend(node.left().map(|l| (l, low, Some(node.key))));
            stack.extend(node.right().map(|r| (r, Some(node.key), high)));
        }
    }

    #[test]
    fn traversals_of_fixed_keys() {
        let tree = tree_of(&[79, 23, 90, 69, 85, 10, 4, 85, 61, 83]);

        assert_eq!(
            owned(tree.pre_order()),
            [79, 23, 10, 4, 69, 61, 90, 85, 83, 85]
        );
        assert_eq!(
            owned(tree.in_order()),
            [4, 10, 23, 61, 69, 79, 83, 85, 85, 90]
        );
        assert_eq!(
            owned(tree.post_order()),
            [4, 10, 61, 69, 23, 83, 85, 85, 90, 79]
        );
        assert_eq!(
            owned(tree.level_order()),
            [79, 23, 90, 10, 69, 85, 4, 61, 83, 85]
        );
        assert_eq!(tree.height(), 4);
        assert_ordered(&tree);
    }

    #[test]
    fn empty_tree() {
        let mut tree = Tree::<i32>::new();

        assert_eq!(tree.height(), 0);
        assert!(tree.pre_order().is_empty());
        assert!(tree.in_order().is_empty());
        assert!(tree.post_order().is_empty());
        assert!(tree.level_order().is_empty());
        assert!(tree.search(&1).is_none());

        tree.delete(&1);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn ascending_keys_make_a_list() {
        let keys: Vec<i32> = (0..3_000).collect();
        let tree = tree_of(&keys);

        assert_eq!(tree.height(), 3_000);
        assert_eq!(owned(tree.in_order()), keys);
    }

    #[test]
    fn duplicates_go_right() {
        let tree = tree_of(&[5, 5, 5]);
        let root = tree.root().unwrap();

        assert!(root.left().is_none());
        assert_eq!(root.right().map(|n| n.key), Some(5));
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn delete_with_no_children() {
        let mut tree = tree_of(&[5, 3, 7]);

        tree.delete(&7);
        assert!(tree.search(&7).is_none());
        assert_eq!(owned(tree.pre_order()), [5, 3]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn delete_with_no_left_child() {
        let mut tree = tree_of(&[5, 3, 7, 8]);

        tree.delete(&7);
        assert_eq!(owned(tree.pre_order()), [5, 3, 8]);
    }

    #[test]
    fn delete_with_no_right_child() {
        let mut tree = tree_of(&[5, 3, 7, 6]);

        tree.delete(&7);
        assert_eq!(owned(tree.pre_order()), [5, 3, 6]);
    }

    #[test]
    fn delete_with_two_children_uses_successor() {
        // The successor of 50 is 60, which has a right child 65 to splice in.
        let mut tree = tree_of(&[50, 30, 80, 60, 90, 65]);

        tree.delete(&50);
        assert_eq!(tree.root().map(|n| n.key), Some(60));
        assert_eq!(owned(tree.pre_order()), [60, 30, 80, 65, 90]);
        assert_ordered(&tree);
    }

    #[test]
    fn delete_root_until_empty() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);

        for _ in 0..7 {
            let root = tree.root().map(|n| n.key).unwrap();
            tree.delete(&root);
            assert_ordered(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn delete_removes_one_duplicate() {
        let mut tree = tree_of(&[2, 1, 2, 3, 2]);

        tree.delete(&2);
        assert_eq!(owned(tree.in_order()), [1, 2, 2, 3]);
        tree.delete(&2);
        tree.delete(&2);
        assert_eq!(owned(tree.in_order()), [1, 3]);
        assert!(tree.search(&2).is_none());
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let mut tree = tree_of(&[79, 23, 90, 69, 85, 10, 4, 85, 61, 83]);
        let before = owned(tree.in_order());

        for key in [0, 50, 85, 100] {
            tree.insert(key);
            tree.delete(&key);
            assert_eq!(owned(tree.in_order()), before);
        }
    }

    #[test]
    fn dropping_a_deep_tree() {
        let mut tree = Tree::new();
        // Building descending keys is O(n) per insert, so keep this moderate.
        for key in (0..5_000).rev() {
            tree.insert(key);
        }
        assert_eq!(tree.height(), 5_000);
        drop(tree);
    }
}
