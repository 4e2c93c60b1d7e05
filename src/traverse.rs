//! Traversals and height shared by all the trees.
//!
//! Every function here walks the tree with an explicit stack or queue instead of recursing. An
//! unbalanced [`bst::Tree`](crate::bst::Tree) built from sorted keys is as deep as it is long,
//! and we'd rather not find out how deep the call stack is.
//!
//! The trees don't share a node type (the red-black tree doesn't even own its nodes through
//! pointers) so the walkers are written against [`Cursor`], a cheap copyable handle to a node.

use std::collections::VecDeque;

/// A copyable handle to a node in some binary tree. Children are returned by value so that
/// handles that aren't plain references (e.g. an arena index paired with its arena) work too.
pub trait Cursor<'a, K: 'a>: Copy {
    /// The key stored in this node.
    fn key(self) -> &'a K;

    /// The left child, if any.
    fn left(self) -> Option<Self>;

    /// The right child, if any.
    fn right(self) -> Option<Self>;
}

/// Root, then the left subtree, then the right subtree.
pub fn pre_order<'a, K: 'a, C: Cursor<'a, K>>(root: Option<C>) -> Vec<&'a K> {
    let mut keys = Vec::new();
    let mut stack: Vec<C> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        keys.push(node.key());
        // Right goes on first so that left comes off first.
        stack.extend(node.right());
        stack.extend(node.left());
    }

    keys
}

/// The left subtree, then the root, then the right subtree. For a search tree this is the keys
/// in sorted order.
pub fn in_order<'a, K: 'a, C: Cursor<'a, K>>(root: Option<C>) -> Vec<&'a K> {
    let mut keys = Vec::new();
    let mut stack = Vec::new();
    let mut current = root;

    loop {
        while let Some(node) = current {
            stack.push(node);
            current = node.left();
        }
        let Some(node) = stack.pop() else {
            break;
        };
        keys.push(node.key());
        current = node.right();
    }

    keys
}

/// The left subtree, then the right subtree, then the root.
///
/// This is a root-right-left pre-order walk read backwards.
pub fn post_order<'a, K: 'a, C: Cursor<'a, K>>(root: Option<C>) -> Vec<&'a K> {
    let mut keys = Vec::new();
    let mut stack: Vec<C> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        keys.push(node.key());
        stack.extend(node.left());
        stack.extend(node.right());
    }

    keys.reverse();
    keys
}

/// Breadth first: the root, then all the nodes one level down from left to right, and so on.
pub fn level_order<'a, K: 'a, C: Cursor<'a, K>>(root: Option<C>) -> Vec<&'a K> {
    let mut keys = Vec::new();
    let mut queue: VecDeque<C> = root.into_iter().collect();

    while let Some(node) = queue.pop_front() {
        keys.push(node.key());
        queue.extend(node.left());
        queue.extend(node.right());
    }

    keys
}

/// The number of nodes on the longest path from `root` down to a leaf. An absent root has a
/// height of 0 and a lone node has a height of 1.
pub fn height<'a, K: 'a, C: Cursor<'a, K>>(root: Option<C>) -> usize {
    let mut tallest = 0;
    let mut stack: Vec<(C, usize)> = root.into_iter().map(|node| (node, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        tallest = tallest.max(depth);
        stack.extend(node.left().map(|child| (child, depth + 1)));
        stack.extend(node.right().map(|child| (child, depth + 1)));
    }

    tallest
}
