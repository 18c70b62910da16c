use crate::bit_vec::BitVec;
use crate::critbit::node::Node;
use crate::critbit::trie::{CritBitTrie, PathLocation};
use crate::critbit::{Error, Result};
use std::cmp;

/// Longest span, in bits, returned by a single-segment extraction.
const POSTFIX_LIMIT: usize = 32;

/// Largest multiple of eight within `len`, clamped to `POSTFIX_LIMIT`.
fn aligned_span(len: usize) -> usize {
    cmp::min(len, POSTFIX_LIMIT) / 8 * 8
}

fn pick(node: &Node, prefer_one: bool) -> Option<&Node> {
    if prefer_one {
        node.one.as_deref().or_else(|| node.zero.as_deref())
    } else {
        node.zero.as_deref().or_else(|| node.one.as_deref())
    }
}

fn first_byte(key: &BitVec) -> Result<BitVec> {
    if key.is_empty() || key.len() % 8 != 0 {
        return Err(Error::InvalidLength(key.len()));
    }
    Ok(key.slice(0..8))
}

/// The greatest byte-aligned terminal path in the subtree strictly below `target`, with `path`
/// holding the bits accumulated above `node`.
fn greatest_below(node: &Node, path: &mut BitVec, target: &BitVec) -> Option<BitVec> {
    let mark = path.len();
    path.extend(node.segment.iter());
    let mut best = None;
    if node.is_terminal && path.len() % 8 == 0 && *path < *target {
        best = Some(path.clone());
    }
    for tree in &[&node.one, &node.zero] {
        if let Some(child) = tree.as_deref() {
            if let Some(candidate) = greatest_below(child, path, target) {
                let better = match best {
                    Some(ref best) => candidate > *best,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
    }
    path.truncate(mark);
    best
}

/// The least byte-aligned terminal path in the subtree strictly above `target`.
fn least_above(node: &Node, path: &mut BitVec, target: &BitVec) -> Option<BitVec> {
    let mark = path.len();
    path.extend(node.segment.iter());
    let mut best = None;
    if node.is_terminal && path.len() % 8 == 0 && *path > *target {
        best = Some(path.clone());
    }
    for tree in &[&node.zero, &node.one] {
        if let Some(child) = tree.as_deref() {
            if let Some(candidate) = least_above(child, path, target) {
                let better = match best {
                    Some(ref best) => candidate < *best,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
    }
    path.truncate(mark);
    best
}

/// Accumulates bits depth-first until `current` reaches eight bits, keeping the smallest
/// assembled byte strictly greater than `target`.
fn upper_byte(node: &Node, mut current: BitVec, target: &BitVec) -> Option<BitVec> {
    let take = cmp::min(node.segment.len(), 8 - current.len());
    current.extend(node.segment.iter().take(take));
    if current.len() == 8 {
        // descendants only repeat this byte, so the subtree is decided here
        if current > *target {
            return Some(current);
        }
        return None;
    }
    let mut best: Option<BitVec> = None;
    for tree in &[&node.one, &node.zero] {
        if let Some(child) = tree.as_deref() {
            if let Some(candidate) = upper_byte(child, current.clone(), target) {
                let better = match best {
                    Some(ref best) => candidate < *best,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
    }
    best
}

/// Accumulates bits depth-first until `current` reaches eight bits, keeping the largest
/// assembled byte strictly less than `target`.
fn lower_byte(node: &Node, mut current: BitVec, target: &BitVec) -> Option<BitVec> {
    let take = cmp::min(node.segment.len(), 8 - current.len());
    current.extend(node.segment.iter().take(take));
    if current.len() == 8 {
        if current < *target {
            return Some(current);
        }
        return None;
    }
    let mut best: Option<BitVec> = None;
    for tree in &[&node.zero, &node.one] {
        if let Some(child) = tree.as_deref() {
            if let Some(candidate) = lower_byte(child, current.clone(), target) {
                let better = match best {
                    Some(ref best) => candidate > *best,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
    }
    best
}

/// Ordered-neighbor and frontier queries over a trie or a subtree of one.
///
/// A finder is a borrowed view rooted at a node of an owning [`CritBitTrie`]: either the trie's
/// root ([`new`](#method.new)) or a node located by a path walk ([`at`](#method.at)). The borrow
/// keeps the view alive no longer than the trie and rules out mutation while the view exists.
///
/// Whole-key queries ([`upper`](#method.upper)/[`lower`](#method.lower)) compare complete stored
/// keys against a target. Byte-prefix queries ([`upper_prefix`](#method.upper_prefix),
/// [`lower_prefix`](#method.lower_prefix), [`left_branch`](#method.left_branch),
/// [`right_branch`](#method.right_branch)) assemble the next byte-aligned prefix on the fly by
/// walking compressed segments, which lets callers steer through the structure one byte at a
/// time even though segments end at arbitrary bit boundaries.
///
/// [`CritBitTrie`]: struct.CritBitTrie.html
///
/// # Examples
///
/// ```
/// use critbit_trie::bit_vec::BitVec;
/// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
///
/// let mut trie = CritBitTrie::new();
/// trie.insert(&BitVec::from_bytes(b"AB"));
/// trie.insert(&BitVec::from_bytes(b"EB"));
///
/// let finder = BoundaryFinder::new(&trie);
/// assert_eq!(
///     finder.upper_prefix(&BitVec::from_bytes(b"C"), 0).unwrap(),
///     Some(BitVec::from_bytes(b"E")),
/// );
/// assert_eq!(finder.left_branch(0), Some(BitVec::from_bytes(b"A")));
/// ```
pub struct BoundaryFinder<'a> {
    root: &'a Node,
}

impl<'a> BoundaryFinder<'a> {
    /// Constructs a finder viewing the whole trie.
    pub fn new(trie: &'a CritBitTrie) -> Self {
        BoundaryFinder { root: &trie.root }
    }

    /// Constructs a finder viewing the subtree at a located node.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"AC"));
    ///
    /// let location = trie.locate(&BitVec::from_bytes(b"A"), 0).unwrap();
    /// let finder = BoundaryFinder::at(&location);
    /// assert_eq!(
    ///     finder.right_branch(location.occupied()),
    ///     Some(BitVec::from_bytes(b"C")),
    /// );
    /// ```
    pub fn at(location: &PathLocation<'a>) -> Self {
        BoundaryFinder {
            root: location.node,
        }
    }

    /// Returns the greatest stored byte-aligned key in the view strictly less than `target`, or
    /// `None` if every stored key is greater or equal. The target must be byte-aligned.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"AC"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(
    ///     finder.upper(&BitVec::from_bytes(b"AC")).unwrap(),
    ///     Some(BitVec::from_bytes(b"AB")),
    /// );
    /// assert_eq!(finder.upper(&BitVec::from_bytes(b"AB")).unwrap(), None);
    /// ```
    pub fn upper(&self, target: &BitVec) -> Result<Option<BitVec>> {
        if target.len() % 8 != 0 {
            return Err(Error::InvalidLength(target.len()));
        }
        let mut path = BitVec::new();
        Ok(greatest_below(self.root, &mut path, target))
    }

    /// Returns the least stored byte-aligned key in the view strictly greater than `target`, or
    /// `None` if every stored key is smaller or equal. The target must be byte-aligned.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"AC"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(
    ///     finder.lower(&BitVec::from_bytes(b"AB")).unwrap(),
    ///     Some(BitVec::from_bytes(b"AC")),
    /// );
    /// assert_eq!(finder.lower(&BitVec::from_bytes(b"AC")).unwrap(), None);
    /// ```
    pub fn lower(&self, target: &BitVec) -> Result<Option<BitVec>> {
        if target.len() % 8 != 0 {
            return Err(Error::InvalidLength(target.len()));
        }
        let mut path = BitVec::new();
        Ok(least_above(self.root, &mut path, target))
    }

    /// Returns the smallest byte-aligned prefix reachable in the view that is strictly greater
    /// than the first byte of `key`, with `took_from_root` bits of the view root's segment
    /// already consumed. `key` must be byte-aligned and non-empty. A root segment carrying eight
    /// or more unconsumed bits short-circuits to a multiple-of-eight slice of itself, clamped to
    /// a bounded span, since it is the only continuation.
    ///
    /// # Panics
    /// Panics if `took_from_root` exceeds the view root's segment length.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"EB"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(
    ///     finder.upper_prefix(&BitVec::from_bytes(b"C"), 0).unwrap(),
    ///     Some(BitVec::from_bytes(b"E")),
    /// );
    /// assert_eq!(finder.upper_prefix(&BitVec::from_bytes(b"E"), 0).unwrap(), None);
    /// ```
    pub fn upper_prefix(&self, key: &BitVec, took_from_root: usize) -> Result<Option<BitVec>> {
        let target = first_byte(key)?;
        let current = self.leftover(took_from_root);
        if current.len() >= 8 {
            return Ok(Some(current.slice(0..aligned_span(current.len()))));
        }
        let priority = match pick(self.root, true) {
            Some(child) => child,
            None => return Ok(None),
        };
        if current.is_empty() && priority.segment.len() >= 8 {
            return Ok(Some(
                priority.segment.slice(0..aligned_span(priority.segment.len())),
            ));
        }
        let mut best: Option<BitVec> = None;
        for tree in &[&self.root.one, &self.root.zero] {
            if let Some(child) = tree.as_deref() {
                if let Some(candidate) = upper_byte(child, current.clone(), &target) {
                    let better = match best {
                        Some(ref best) => candidate < *best,
                        None => true,
                    };
                    if better {
                        best = Some(candidate);
                    }
                }
            }
        }
        Ok(best)
    }

    /// Returns the largest byte-aligned prefix reachable in the view that is strictly less than
    /// the first byte of `key`, with `took_from_root` bits of the view root's segment already
    /// consumed. `key` must be byte-aligned and non-empty.
    ///
    /// # Panics
    /// Panics if `took_from_root` exceeds the view root's segment length.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"EB"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(
    ///     finder.lower_prefix(&BitVec::from_bytes(b"C"), 0).unwrap(),
    ///     Some(BitVec::from_bytes(b"A")),
    /// );
    /// assert_eq!(finder.lower_prefix(&BitVec::from_bytes(b"A"), 0).unwrap(), None);
    /// ```
    pub fn lower_prefix(&self, key: &BitVec, took_from_root: usize) -> Result<Option<BitVec>> {
        let target = first_byte(key)?;
        let current = self.leftover(took_from_root);
        if current.len() >= 8 {
            return Ok(Some(current.slice(0..aligned_span(current.len()))));
        }
        let priority = match pick(self.root, false) {
            Some(child) => child,
            None => return Ok(None),
        };
        if current.is_empty() && priority.segment.len() >= 8 {
            return Ok(Some(
                priority.segment.slice(0..aligned_span(priority.segment.len())),
            ));
        }
        let mut best: Option<BitVec> = None;
        for tree in &[&self.root.zero, &self.root.one] {
            if let Some(child) = tree.as_deref() {
                if let Some(candidate) = lower_byte(child, current.clone(), &target) {
                    let better = match best {
                        Some(ref best) => candidate > *best,
                        None => true,
                    };
                    if better {
                        best = Some(candidate);
                    }
                }
            }
        }
        Ok(best)
    }

    /// Returns the leftmost reachable byte-aligned prefix, following zero children wherever
    /// possible, or `None` if the view root has no child at the first step.
    ///
    /// # Panics
    /// Panics if `took_from_root` exceeds the view root's segment length.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"EB"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(finder.left_branch(0), Some(BitVec::from_bytes(b"A")));
    /// ```
    pub fn left_branch(&self, took_from_root: usize) -> Option<BitVec> {
        self.branch(took_from_root, false)
    }

    /// Returns the rightmost reachable byte-aligned prefix, following one children wherever
    /// possible, or `None` if the view root has no child at the first step.
    ///
    /// # Panics
    /// Panics if `took_from_root` exceeds the view root's segment length.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::{BoundaryFinder, CritBitTrie};
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"EB"));
    ///
    /// let finder = BoundaryFinder::new(&trie);
    /// assert_eq!(finder.right_branch(0), Some(BitVec::from_bytes(b"E")));
    /// ```
    pub fn right_branch(&self, took_from_root: usize) -> Option<BitVec> {
        self.branch(took_from_root, true)
    }

    fn branch(&self, took_from_root: usize, prefer_one: bool) -> Option<BitVec> {
        let mut current = self.leftover(took_from_root);
        let mut node = match pick(self.root, prefer_one) {
            Some(child) => child,
            None => return None,
        };
        if current.len() >= 8 {
            return Some(current.slice(0..aligned_span(current.len())));
        }
        if current.is_empty() && node.segment.len() >= 8 {
            return Some(node.segment.slice(0..aligned_span(node.segment.len())));
        }
        loop {
            let take = cmp::min(node.segment.len(), 8 - current.len());
            current.extend(node.segment.iter().take(take));
            if current.len() == 8 {
                return Some(current);
            }
            node = match pick(node, prefer_one) {
                Some(child) => child,
                None => return None,
            };
        }
    }

    fn leftover(&self, took_from_root: usize) -> BitVec {
        assert!(took_from_root <= self.root.segment.len());
        self.root
            .segment
            .slice(took_from_root..self.root.segment.len())
    }
}

#[cfg(test)]
mod tests {
    use super::BoundaryFinder;
    use crate::bit_vec::BitVec;
    use crate::critbit::{CritBitTrie, Error};

    fn bits(text: &str) -> BitVec {
        BitVec::from_bytes(text.as_bytes())
    }

    fn trie_of(keys: &[&str]) -> CritBitTrie {
        let mut trie = CritBitTrie::new();
        for key in keys {
            trie.insert(&bits(key));
        }
        trie
    }

    #[test]
    fn test_upper_lower_empty_trie() {
        let trie = CritBitTrie::new();
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(finder.upper(&bits("A")).unwrap(), None);
        assert_eq!(finder.lower(&bits("A")).unwrap(), None);
    }

    #[test]
    fn test_upper_lower_single_key() {
        let trie = trie_of(&["B"]);
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(finder.upper(&bits("C")).unwrap(), Some(bits("B")));
        assert_eq!(finder.upper(&bits("B")).unwrap(), None);
        assert_eq!(finder.lower(&bits("A")).unwrap(), Some(bits("B")));
        assert_eq!(finder.lower(&bits("B")).unwrap(), None);
    }

    #[test]
    fn test_upper_lower_prefix_related_keys() {
        let trie = trie_of(&["A", "AB", "ABC"]);
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(finder.upper(&bits("AB")).unwrap(), Some(bits("A")));
        assert_eq!(finder.upper(&bits("ABC")).unwrap(), Some(bits("AB")));
        assert_eq!(finder.lower(&bits("A")).unwrap(), Some(bits("AB")));
        assert_eq!(finder.lower(&bits("AB")).unwrap(), Some(bits("ABC")));
    }

    #[test]
    fn test_upper_lower_empty_target() {
        let trie = trie_of(&["A", "B"]);
        let finder = BoundaryFinder::new(&trie);

        // nothing orders below the empty string; the minimum key orders above it
        assert_eq!(finder.upper(&BitVec::new()).unwrap(), None);
        assert_eq!(finder.lower(&BitVec::new()).unwrap(), Some(bits("A")));
    }

    #[test]
    fn test_upper_invalid_length() {
        let trie = trie_of(&["A"]);
        let finder = BoundaryFinder::new(&trie);
        let mut unaligned = bits("A");
        unaligned.push(true);

        assert_eq!(finder.upper(&unaligned), Err(Error::InvalidLength(9)));
        assert_eq!(finder.lower(&unaligned), Err(Error::InvalidLength(9)));
    }

    #[test]
    fn test_prefix_queries_from_root() {
        let trie = trie_of(&["AB", "BB", "DB", "EB"]);
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(
            finder.upper_prefix(&bits("C"), 0).unwrap(),
            Some(bits("D")),
        );
        assert_eq!(
            finder.lower_prefix(&bits("C"), 0).unwrap(),
            Some(bits("B")),
        );
        assert_eq!(finder.upper_prefix(&bits("E"), 0).unwrap(), None);
        assert_eq!(finder.lower_prefix(&bits("A"), 0).unwrap(), None);
    }

    #[test]
    fn test_prefix_queries_empty_trie() {
        let trie = CritBitTrie::new();
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(finder.upper_prefix(&bits("A"), 0).unwrap(), None);
        assert_eq!(finder.lower_prefix(&bits("A"), 0).unwrap(), None);
        assert_eq!(finder.left_branch(0), None);
        assert_eq!(finder.right_branch(0), None);
    }

    #[test]
    fn test_prefix_invalid_length() {
        let trie = trie_of(&["A"]);
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(
            finder.upper_prefix(&BitVec::new(), 0),
            Err(Error::InvalidLength(0)),
        );
        let mut unaligned = bits("A");
        unaligned.push(false);
        assert_eq!(
            finder.lower_prefix(&unaligned, 0),
            Err(Error::InvalidLength(9)),
        );
    }

    #[test]
    fn test_branches_from_root() {
        let trie = trie_of(&["AB", "BB", "DB", "EB"]);
        let finder = BoundaryFinder::new(&trie);

        assert_eq!(finder.left_branch(0), Some(bits("A")));
        assert_eq!(finder.right_branch(0), Some(bits("E")));
    }

    #[test]
    fn test_view_at_located_node() {
        let trie = trie_of(&["AB", "AC"]);
        let location = trie.locate(&bits("A"), 0).unwrap();
        let finder = BoundaryFinder::at(&location);

        assert_eq!(
            finder.left_branch(location.occupied()),
            Some(bits("B")),
        );
        assert_eq!(
            finder.right_branch(location.occupied()),
            Some(bits("C")),
        );
        assert_eq!(
            finder.upper_prefix(&bits("B"), location.occupied()).unwrap(),
            Some(bits("C")),
        );
        assert_eq!(
            finder.lower_prefix(&bits("C"), location.occupied()).unwrap(),
            Some(bits("B")),
        );
        assert_eq!(
            finder.lower_prefix(&bits("B"), location.occupied()).unwrap(),
            None,
        );
    }

    #[test]
    fn test_root_spine_short_circuit() {
        // a single long key leaves one compressed spine below the root
        let trie = trie_of(&["ABCDEF"]);
        let location = trie.locate(&bits("A"), 0).unwrap();
        let finder = BoundaryFinder::at(&location);

        // forty unconsumed spine bits clamp to a four-byte span
        assert_eq!(
            finder.upper_prefix(&bits("Z"), location.occupied()).unwrap(),
            Some(bits("BCDE")),
        );
        assert_eq!(
            finder.lower_prefix(&bits("Z"), location.occupied()).unwrap(),
            Some(bits("BCDE")),
        );
    }

    #[test]
    fn test_long_first_child_short_circuit() {
        let trie = trie_of(&["AB", "EB", "EBCDEFGH"]);
        let location = trie.locate(&bits("EB"), 0).unwrap();
        let finder = BoundaryFinder::at(&location);

        // the path ends exactly on the node boundary, and the only child is a long spine
        assert_eq!(location.occupied(), location.segment_len());
        assert_eq!(
            finder.right_branch(location.occupied()),
            Some(bits("CDEF")),
        );
        assert_eq!(
            finder.left_branch(location.occupied()),
            Some(bits("CDEF")),
        );
    }
}
