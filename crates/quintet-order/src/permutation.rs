//! Lexicographic permutation generation for lineup search
//!
//! Orderings are produced lazily, one `Vec<usize>` of roster indices at a
//! time, starting from the identity. A fresh iterator restarts the sequence.

/// n! (n is at most a roster size, so this never overflows in practice)
pub fn factorial(n: usize) -> usize {
    (1..=n).product()
}

/// All orderings of `0..n`, optionally with one index pinned first
#[derive(Clone, Debug)]
pub struct Permutations {
    current: Option<Vec<usize>>,
    /// Leading positions that never move
    fixed: usize,
    remaining: usize,
}

impl Permutations {
    /// Every ordering of `0..n`. Empty when `n == 0`.
    pub fn new(n: usize) -> Self {
        if n == 0 {
            return Self::empty();
        }
        Self {
            current: Some((0..n).collect()),
            fixed: 0,
            remaining: factorial(n),
        }
    }

    /// Orderings of `0..n` that open with `first`. Empty if `first >= n`.
    ///
    /// The tail is enumerated lexicographically, so the sequence is the
    /// unpinned sequence filtered to orderings starting with `first`.
    pub fn with_first(n: usize, first: usize) -> Self {
        if first >= n {
            return Self::empty();
        }
        let mut start = Vec::with_capacity(n);
        start.push(first);
        start.extend((0..n).filter(|&i| i != first));
        Self {
            current: Some(start),
            fixed: 1,
            remaining: factorial(n - 1),
        }
    }

    fn empty() -> Self {
        Self { current: None, fixed: 0, remaining: 0 }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        let mut following = current.clone();
        if next_permutation(&mut following[self.fixed..]) {
            self.current = Some(following);
        }
        self.remaining = self.remaining.saturating_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Permutations {}

/// Rearrange into the next lexicographic permutation. Returns false (and
/// leaves the slice untouched) when it is already the last one.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    // Longest non-increasing suffix starts at `pivot + 1`
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..items.len())
        .rev()
        .find(|&i| items[i] > items[pivot])
        .unwrap_or(pivot + 1);
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}
