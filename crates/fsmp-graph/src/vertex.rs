use std::fmt;

use serde::Serialize;

use crate::graph::GraphError;

/// A signed permutation of `1..=n`.
///
/// Every value `1..=n` appears exactly once up to sign, and each position
/// carries its own sign. These are the vertex labels of the burnt pancake
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SignedPermutation {
    entries: Box<[i32]>,
}

impl SignedPermutation {
    /// Construct a validated signed permutation.
    ///
    /// # Returns
    /// [`GraphError::InvalidDimension`] for an empty sequence, or
    /// [`GraphError::InvalidSignedPermutation`] if a magnitude is zero, out of
    /// range, or repeated.
    pub fn new(entries: impl Into<Vec<i32>>) -> Result<Self, GraphError> {
        let entries: Vec<i32> = entries.into();
        let n = entries.len();
        if n == 0 {
            return Err(GraphError::InvalidDimension(0));
        }
        let mut seen = vec![false; n];
        for &value in &entries {
            let magnitude = value.unsigned_abs() as usize;
            if magnitude == 0 || magnitude > n || seen[magnitude - 1] {
                return Err(GraphError::InvalidSignedPermutation { entries });
            }
            seen[magnitude - 1] = true;
        }
        Ok(Self::from_entries(entries))
    }

    /// The identity permutation `(1, 2, ..., n)` with all signs positive.
    pub fn identity(n: usize) -> Result<Self, GraphError> {
        if n == 0 {
            return Err(GraphError::InvalidDimension(0));
        }
        let n = i32::try_from(n).map_err(|_| GraphError::InvalidDimension(n))?;
        Ok(Self::from_entries((1..=n).collect()))
    }

    pub(crate) fn from_entries(entries: Vec<i32>) -> Self {
        Self {
            entries: entries.into_boxed_slice(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[i32] {
        &self.entries
    }

    /// Prefix reversal with negation of length `k`.
    ///
    /// The first `k` entries are reversed and negated, the remaining `n - k`
    /// entries are kept.
    ///
    /// # Panics
    /// If `k` is zero or exceeds the dimension.
    pub fn flip(&self, k: usize) -> Self {
        let n = self.dimension();
        assert!(
            (1..=n).contains(&k),
            "flip length {k} out of range for dimension {n}"
        );
        let mut entries = self.entries.to_vec();
        entries[..k].reverse();
        for value in &mut entries[..k] {
            *value = -*value;
        }
        Self::from_entries(entries)
    }

    /// Rename values through `map`: entry `x` becomes `sign(x) * map[|x| - 1]`.
    ///
    /// Relabelling commutes with every flip, so it is a graph automorphism of
    /// the burnt pancake graph.
    ///
    /// # Panics
    /// If `map` has a different dimension.
    pub fn relabel(&self, map: &SignedPermutation) -> Self {
        assert_eq!(
            self.dimension(),
            map.dimension(),
            "relabelling map has the wrong dimension"
        );
        let entries = self
            .entries
            .iter()
            .map(|&x| x.signum() * map.entries[(x.unsigned_abs() - 1) as usize])
            .collect();
        Self::from_entries(entries)
    }

    /// The unique value relabelling `m` with `self.relabel(&m) == *target`.
    ///
    /// # Panics
    /// If `target` has a different dimension.
    pub fn relabelling_to(&self, target: &SignedPermutation) -> Self {
        assert_eq!(
            self.dimension(),
            target.dimension(),
            "relabelling target has the wrong dimension"
        );
        let mut map = vec![0; self.dimension()];
        for (&source, &image) in self.entries.iter().zip(target.entries.iter()) {
            map[(source.unsigned_abs() - 1) as usize] = source.signum() * image;
        }
        Self::from_entries(map)
    }
}

impl fmt::Display for SignedPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(entries: &[i32]) -> SignedPermutation {
        SignedPermutation::new(entries.to_vec()).unwrap()
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(SignedPermutation::new(vec![1, 1, 3]).is_err());
        assert!(SignedPermutation::new(vec![1, 0, 3]).is_err());
        assert!(SignedPermutation::new(vec![1, 2, 4]).is_err());
        assert!(SignedPermutation::new(vec![-1, 2, -2]).is_err());
        assert_eq!(
            SignedPermutation::new(Vec::new()),
            Err(GraphError::InvalidDimension(0))
        );
    }

    #[test]
    fn accepts_any_sign_pattern() {
        assert!(SignedPermutation::new(vec![-3, 1, -2]).is_ok());
    }

    #[test]
    fn flip_reverses_and_negates_prefix() {
        let v = perm(&[1, 2, 3]);
        assert_eq!(v.flip(1), perm(&[-1, 2, 3]));
        assert_eq!(v.flip(2), perm(&[-2, -1, 3]));
        assert_eq!(v.flip(3), perm(&[-3, -2, -1]));
    }

    #[test]
    fn flip_is_an_involution() {
        let v = perm(&[2, -3, 1, -4]);
        for k in 1..=4 {
            assert_eq!(v.flip(k).flip(k), v);
            assert_ne!(v.flip(k), v);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn flip_zero_panics() {
        perm(&[1, 2]).flip(0);
    }

    #[test]
    fn relabelling_commutes_with_flips() {
        let map = perm(&[3, -1, 2]);
        let v = perm(&[-2, 3, 1]);
        for k in 1..=3 {
            assert_eq!(v.flip(k).relabel(&map), v.relabel(&map).flip(k));
        }
    }

    #[test]
    fn relabelling_to_hits_target() {
        let source = perm(&[1, -3, 2]);
        let target = perm(&[-2, 1, 3]);
        let map = source.relabelling_to(&target);
        assert_eq!(source.relabel(&map), target);
        assert!(SignedPermutation::new(map.entries().to_vec()).is_ok());
    }

    #[test]
    fn display_uses_tuple_form() {
        assert_eq!(perm(&[1, -2, 3]).to_string(), "(1,-2,3)");
    }
}
