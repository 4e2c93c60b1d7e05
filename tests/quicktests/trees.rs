use search_trees::rbtree::{Color, NodeRef, RbTree};
use search_trees::{avl, bst, OrderedStore};

use std::collections::{BTreeMap, HashSet};

use crate::Op;

/// The keys a multiset of counts holds, in sorted order.
fn expand<K: Copy>(counts: &BTreeMap<K, usize>) -> Vec<K> {
    counts
        .iter()
        .flat_map(|(k, n)| std::iter::repeat(*k).take(*n))
        .collect()
}

/// Applies a set of operations to a tree and a multiset of counts.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same keys in both.
fn do_ops<K, T>(ops: &[Op<K>], tree: &mut T, counts: &mut BTreeMap<K, usize>) -> bool
where
    K: Ord + Copy,
    T: OrderedStore<K>,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree.insert(*k);
                *counts.entry(*k).or_default() += 1;
            }
            Op::Remove(k) => {
                tree.delete(k);
                if let Some(count) = counts.get_mut(k) {
                    *count -= 1;
                    if *count == 0 {
                        counts.remove(k);
                    }
                }
            }
            Op::Traverse => {
                let expected = expand(counts);
                let in_order: Vec<K> = tree.in_order().into_iter().copied().collect();
                if in_order != expected {
                    return false;
                }

                // The other walks visit the same keys, just in another order.
                for mut walk in [tree.pre_order(), tree.post_order(), tree.level_order()] {
                    walk.sort();
                    if walk.into_iter().copied().collect::<Vec<_>>() != expected {
                        return false;
                    }
                }
            }
        }
    }

    tree.in_order().into_iter().copied().collect::<Vec<_>>() == expand(counts)
}

/// Inserting then deleting a key never changes the in-order walk.
fn round_trips<T: OrderedStore<i8> + Default>(xs: &[i8], extra: i8) -> bool {
    let mut tree = T::default();
    for x in xs {
        tree.insert(*x);
    }
    let before: Vec<i8> = tree.in_order().into_iter().copied().collect();

    tree.insert(extra);
    tree.delete(&extra);
    let after: Vec<i8> = tree.in_order().into_iter().copied().collect();

    before == after
}

fn contains_not<T: OrderedStore<i8> + Default>(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = T::default();
    for x in &xs {
        tree.insert(*x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

fn with_deletions<T: OrderedStore<i8> + Default>(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = T::default();
    for x in &xs {
        tree.insert(*x);
    }
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // Each delete only removes one copy of a duplicated key.
        if let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    still_present.iter().all(|x| tree.search(x) == Some(x))
}

/// Black-height below `node` (counting NIL), or `None` if a colour rule is broken.
fn black_height(node: Option<NodeRef<'_, i16>>) -> Option<usize> {
    let Some(node) = node else {
        return Some(1);
    };
    let is_red = node.color() == Color::Red;
    let red_child = [node.left(), node.right()]
        .into_iter()
        .flatten()
        .any(|child| child.color() == Color::Red);
    if is_red && red_child {
        return None;
    }

    let left = black_height(node.left())?;
    let right = black_height(node.right())?;
    (left == right).then_some(left + usize::from(!is_red))
}

quickcheck::quickcheck! {
    fn bst_fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        do_ops(&ops, &mut bst::Tree::new(), &mut BTreeMap::new())
    }

    fn avl_fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        let mut tree = avl::Tree::new();
        let ok = do_ops(&ops, &mut tree, &mut BTreeMap::new());
        let bound = 1.5 * ((tree.len() + 1) as f64).log2();
        ok && tree.height() as f64 <= bound.max(1.0)
    }

    fn rbtree_fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        do_ops(&ops, &mut RbTree::new(), &mut BTreeMap::new())
    }

    fn round_trip(xs: Vec<i8>, extra: i8) -> bool {
        round_trips::<bst::Tree<i8>>(&xs, extra)
            && round_trips::<avl::Tree<i8>>(&xs, extra)
            && round_trips::<RbTree<i8>>(&xs, extra)
    }

    fn search_misses(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        contains_not::<bst::Tree<i8>>(xs.clone(), nots.clone())
            && contains_not::<avl::Tree<i8>>(xs.clone(), nots.clone())
            && contains_not::<RbTree<i8>>(xs, nots)
    }

    fn deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        with_deletions::<bst::Tree<i8>>(xs.clone(), deletes.clone())
            && with_deletions::<avl::Tree<i8>>(xs.clone(), deletes.clone())
            && with_deletions::<RbTree<i8>>(xs, deletes)
    }

    fn rbtree_inserts_keep_colours(xs: Vec<i16>) -> bool {
        let mut tree = RbTree::new();
        xs.iter().all(|x| {
            tree.insert(*x);
            tree.root().map_or(false, |root| root.color() == Color::Black)
                && black_height(tree.root()).is_some()
        })
    }
}
