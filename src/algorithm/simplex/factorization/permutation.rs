//! # Permutations
//!
//! Row and column reorderings of the factorized basis. The full permutations come out of the
//! pivot order of the factorization; the rotations accumulate one per rank-1 update.
use std::cmp::Ordering;
use std::fmt;

use crate::data::linear_algebra::SparseTuple;

/// A bijection on `0..len`.
pub trait Permutation {
    /// Where index `i` maps to.
    fn forward(&self, i: usize) -> usize;
    /// Which index maps to `i`.
    fn backward(&self, i: usize) -> usize;
    /// Size of the index range.
    fn len(&self) -> usize;

    /// Apply to the indices of a tuple list and restore sortedness.
    fn apply_forward<T>(&self, items: &mut Vec<SparseTuple<T>>) {
        for (i, _) in items.iter_mut() {
            *i = self.forward(*i);
        }
        items.sort_unstable_by_key(|&(i, _)| i);
    }

    /// Apply the inverse to the indices of a tuple list and restore sortedness.
    fn apply_backward<T>(&self, items: &mut Vec<SparseTuple<T>>) {
        for (i, _) in items.iter_mut() {
            *i = self.backward(*i);
        }
        items.sort_unstable_by_key(|&(i, _)| i);
    }
}

/// An arbitrary permutation, stored in both directions.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct FullPermutation {
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl FullPermutation {
    /// The identity on `0..len`.
    pub fn identity(len: usize) -> Self {
        Self {
            forward: (0..len).collect(),
            backward: (0..len).collect(),
        }
    }

    /// Build from the forward image list: index `i` maps to `forward[i]`.
    pub fn from_forward(forward: Vec<usize>) -> Self {
        let mut backward = vec![usize::MAX; forward.len()];
        for (i, &image) in forward.iter().enumerate() {
            debug_assert!(image < forward.len());
            debug_assert_eq!(backward[image], usize::MAX, "not a bijection");

            backward[image] = i;
        }

        Self { forward, backward }
    }
}

impl Permutation for FullPermutation {
    fn forward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.forward[i]
    }

    fn backward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.backward[i]
    }

    fn len(&self) -> usize {
        self.forward.len()
    }
}

impl fmt::Display for FullPermutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.forward)
    }
}

/// Move one index to the back, shifting everything it jumps over a step forward.
///
/// Indices below `index` are unchanged.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct RotateToBack {
    /// The index that gets moved to `len - 1`.
    pub index: usize,
    len: usize,
}

impl RotateToBack {
    pub fn new(index: usize, len: usize) -> Self {
        debug_assert!(index < len);

        Self { index, len }
    }
}

impl Permutation for RotateToBack {
    fn forward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        match i.cmp(&self.index) {
            Ordering::Less => i,
            Ordering::Equal => self.len() - 1,
            Ordering::Greater => i - 1,
        }
    }

    fn backward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        if i < self.index {
            i
        } else if i < self.len() - 1 {
            i + 1
        } else {
            self.index
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl fmt::Display for RotateToBack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rotate {} to {}", self.index, self.len - 1)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::factorization::permutation::{
        FullPermutation, Permutation, RotateToBack,
    };

    #[test]
    fn full_roundtrip() {
        let permutation = FullPermutation::from_forward(vec![2, 0, 1]);
        for i in 0..3 {
            assert_eq!(permutation.backward(permutation.forward(i)), i);
        }

        let mut items = vec![(0, 'a'), (2, 'c')];
        permutation.apply_forward(&mut items);
        assert_eq!(items, vec![(1, 'c'), (2, 'a')]);
        permutation.apply_backward(&mut items);
        assert_eq!(items, vec![(0, 'a'), (2, 'c')]);
    }

    #[test]
    fn rotation() {
        let rotation = RotateToBack::new(1, 4);
        assert_eq!(rotation.forward(0), 0);
        assert_eq!(rotation.forward(1), 3);
        assert_eq!(rotation.forward(2), 1);
        assert_eq!(rotation.forward(3), 2);
        for i in 0..4 {
            assert_eq!(rotation.backward(rotation.forward(i)), i);
        }
    }
}
