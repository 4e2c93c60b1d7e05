//! This crate exposes three classical search trees side by side, mostly to compare how
//! their heights grow.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert, find, and delete
//! stored keys. BSTs are typically defined recursively using the notion of a `Node`. A `Node`
//! stores a key and will sometimes have child `Node`s. The most important invariants of a BST
//! are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a key less than its
//!    own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a key greater than or
//!    equal to its own key. Duplicates always go right.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key takes `O(height)` (where `height` is the number of nodes on the longest
//! path from the root `Node` down to a leaf). Without any help the height of a BST can be as bad
//! as `N` - insert keys in ascending order and you get a linked list. The balanced flavours keep
//! the height in `O(lg N)`:
//!
//! - [`bst::Tree`] does no rebalancing at all.
//! - [`avl::Tree`] caches subtree heights and rotates whenever two siblings differ in height by
//!   more than one.
//! - [`rbtree::RbTree`] colours its nodes red or black and rotates/recolours after insertion so
//!   that no path is more than twice as long as any other.
//!
//! All three implement [`OrderedStore`] so they can be driven polymorphically, which is what the
//! [`experiment`] module does.
//!
//! ```
//! use search_trees::{avl, bst, rbtree::RbTree, OrderedStore};
//!
//! fn fill<T: OrderedStore<u32> + Default>(keys: impl IntoIterator<Item = u32>) -> T {
//!     let mut tree = T::default();
//!     for key in keys {
//!         tree.insert(key);
//!     }
//!     tree
//! }
//!
//! let plain: bst::Tree<u32> = fill(1..=100);
//! let avl: avl::Tree<u32> = fill(1..=100);
//! let red_black: RbTree<u32> = fill(1..=100);
//!
//! assert_eq!(plain.height(), 100);
//! assert!(avl.height() <= 8);
//! assert!(red_black.height() <= 14);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod experiment;
pub mod rbtree;
pub mod traverse;

/// The operations every tree in this crate supports. This is the only thing the
/// [`experiment`] driver knows about the trees it measures.
pub trait OrderedStore<K: Ord> {
    /// Adds `key` to the store. Equal keys are kept, not replaced.
    fn insert(&mut self, key: K);

    /// Removes one occurrence of `key`. Deleting a key that isn't stored does nothing.
    fn delete(&mut self, key: &K);

    /// Returns the stored key equal to `key`, or `None` if there is no such key.
    fn search(&self, key: &K) -> Option<&K>;

    /// The number of nodes on the longest root-to-leaf path. `0` when empty.
    fn height(&self) -> usize;

    /// Keys in root, left, right order.
    fn pre_order(&self) -> Vec<&K>;

    /// Keys in left, root, right order. This is always sorted.
    fn in_order(&self) -> Vec<&K>;

    /// Keys in left, right, root order.
    fn post_order(&self) -> Vec<&K>;

    /// Keys level by level, left before right.
    fn level_order(&self) -> Vec<&K>;

    /// Whether a key equal to `key` is stored.
    fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Whether the store holds no keys.
    fn is_empty(&self) -> bool {
        self.height() == 0
    }
}
