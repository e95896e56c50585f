//! Checked binomial coefficients and ranked lexicographic combinations.

/// `C(n, k)`, or `None` if it does not fit in a `u64`.
///
/// Uses the multiplicative formula, so the cost is `O(min(k, n - k))` and
/// nothing is tabulated. Fault budgets are small, which keeps `k` small even
/// for graphs with millions of vertices.
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut acc: u128 = 1;
    for i in 1..=k {
        // acc = C(n - k + i - 1, i - 1), so the division is exact.
        acc = acc.checked_mul(n - k + i)? / i;
    }
    u64::try_from(acc).ok()
}

/// Cursor over the `k`-subsets of `0..n` in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combinations {
    n: usize,
    positions: Vec<usize>,
    exhausted: bool,
}

impl Combinations {
    /// First combination `[0, 1, .., k-1]`; exhausted at once if `k > n`.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            positions: (0..k).collect(),
            exhausted: k > n,
        }
    }

    /// The combination with lexicographic rank `rank`, or `None` if
    /// `rank >= C(n, k)`.
    pub fn from_rank(n: usize, k: usize, mut rank: u64) -> Option<Self> {
        if rank >= binomial(n, k)? {
            return None;
        }
        let mut positions = Vec::with_capacity(k);
        let mut candidate = 0;
        for slot in 0..k {
            loop {
                // Combinations whose `slot`-th element is `candidate`.
                let with_candidate = binomial(n - 1 - candidate, k - 1 - slot)?;
                if rank < with_candidate {
                    break;
                }
                rank -= with_candidate;
                candidate += 1;
            }
            positions.push(candidate);
            candidate += 1;
        }
        Some(Self {
            n,
            positions,
            exhausted: false,
        })
    }

    pub fn current(&self) -> Option<&[usize]> {
        if self.exhausted {
            None
        } else {
            Some(&self.positions)
        }
    }

    /// Step to the next combination; returns false once past the last one.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let k = self.positions.len();
        let Some(slot) = (0..k).rev().find(|&i| self.positions[i] < self.n - k + i) else {
            self.exhausted = true;
            return false;
        };
        self.positions[slot] += 1;
        for i in slot + 1..k {
            self.positions[i] = self.positions[i - 1] + 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(n: usize, k: usize) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut combos = Combinations::new(n, k);
        while let Some(current) = combos.current() {
            out.push(current.to_vec());
            combos.advance();
        }
        out
    }

    #[test]
    fn binomial_values() {
        assert_eq!(binomial(72, 4), Some(1_028_790));
        assert_eq!(binomial(47, 3), Some(16_215));
        assert_eq!(binomial(72, 68), Some(1_028_790));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
    }

    #[test]
    fn binomial_matches_pascal_rule() {
        for n in 1..40 {
            for k in 1..n {
                let sum = binomial(n - 1, k - 1).unwrap() + binomial(n - 1, k).unwrap();
                assert_eq!(binomial(n, k), Some(sum), "C({n},{k})");
            }
        }
    }

    #[test]
    fn binomial_reports_overflow() {
        assert!(binomial(67, 33).is_some());
        assert_eq!(binomial(68, 34), None);
        assert_eq!(binomial(130, 65), None);
        assert_eq!(binomial(10_321_920, 1), Some(10_321_920));
    }

    #[test]
    fn lexicographic_order() {
        assert_eq!(
            collect(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(collect(3, 0), vec![Vec::<usize>::new()]);
        assert!(collect(2, 3).is_empty());
    }

    #[test]
    fn unranking_matches_iteration() {
        for (n, k) in [(7, 3), (6, 0), (5, 5), (9, 1)] {
            for (rank, expected) in collect(n, k).into_iter().enumerate() {
                let combo = Combinations::from_rank(n, k, rank as u64).unwrap();
                assert_eq!(combo.current(), Some(expected.as_slice()), "C({n},{k}) #{rank}");
            }
            let count = binomial(n, k).unwrap();
            assert!(Combinations::from_rank(n, k, count).is_none());
        }
    }
}
