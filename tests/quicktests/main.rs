use quickcheck::{Arbitrary, Gen};

mod trees;

/// An enum for the various kinds of "things" to do to
/// search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<K> {
    /// Insert the K into the data structure
    Insert(K),
    /// Remove one K from the data structure
    Remove(K),
    /// Compare traversals against the reference
    Traverse,
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Remove(K::arbitrary(g)),
            2 => Op::Traverse,
            _ => unreachable!(),
        }
    }
}
