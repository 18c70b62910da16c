use crate::bit_vec::BitVec;
use crate::critbit::boundary::BoundaryFinder;
use crate::critbit::node::Node;
use crate::critbit::tree;
use crate::critbit::{Error, Result};

/// A binary crit-bit trie storing bit-string keys.
///
/// Edges carry compressed bit segments, so a path is spelled by concatenating segments from the
/// root down. Each node has at most two children, keyed by the first bit of the child's segment.
/// Insertion splits segments at the first mismatching bit; keys are never deleted. Externally
/// meaningful keys are byte-aligned (a multiple of eight bits), while internal segments may end
/// at any bit boundary.
///
/// # Examples
///
/// ```
/// use critbit_trie::bit_vec::BitVec;
/// use critbit_trie::critbit::CritBitTrie;
///
/// let mut trie = CritBitTrie::new();
/// trie.insert(&BitVec::from_bytes(b"AB"));
/// trie.insert(&BitVec::from_bytes(b"ABC"));
/// trie.insert(&BitVec::from_bytes(b"E"));
///
/// assert!(trie.search(&BitVec::from_bytes(b"AB")));
/// assert!(!trie.search(&BitVec::from_bytes(b"A")));
/// assert!(trie.substring_exists(&BitVec::from_bytes(b"A")).unwrap());
/// assert_eq!(trie.len(), 3);
///
/// assert_eq!(
///     trie.upper(&BitVec::from_bytes(b"E")).unwrap(),
///     Some(BitVec::from_bytes(b"ABC")),
/// );
/// assert_eq!(
///     trie.lower(&BitVec::from_bytes(b"AB")).unwrap(),
///     Some(BitVec::from_bytes(b"ABC")),
/// );
/// ```
pub struct CritBitTrie {
    pub(crate) root: Node,
    len: usize,
}

impl CritBitTrie {
    /// Constructs a new, empty `CritBitTrie`.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let trie = CritBitTrie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        CritBitTrie {
            root: Node::new(BitVec::new()),
            len: 0,
        }
    }

    /// Inserts a key into the trie, splitting segments as needed. Returns `true` if the key was
    /// newly added and `false` if it was already stored; inserting an already stored key leaves
    /// the trie unchanged. The empty bit-vector denotes the root and is never stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// assert!(trie.insert(&BitVec::from_bytes(b"AB")));
    /// assert!(!trie.insert(&BitVec::from_bytes(b"AB")));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn insert(&mut self, bits: &BitVec) -> bool {
        if bits.is_empty() {
            return false;
        }
        let newly = tree::insert(&mut self.root, bits, 0);
        if newly {
            self.len += 1;
        }
        newly
    }

    /// Checks if a key exists in the trie. Only exact matches count: the input must be consumed
    /// exactly at a node that terminates a stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    ///
    /// assert!(trie.search(&BitVec::from_bytes(b"AB")));
    /// assert!(!trie.search(&BitVec::from_bytes(b"A")));
    /// assert!(!trie.search(&BitVec::from_bytes(b"ABC")));
    /// ```
    pub fn search(&self, bits: &BitVec) -> bool {
        if bits.is_empty() {
            return false;
        }
        tree::search(&self.root, bits, 0)
    }

    /// Checks if the bits spell a valid path prefix of the structure, including a point strictly
    /// inside a compressed segment. The input must be byte-aligned.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    ///
    /// assert!(trie.substring_exists(&BitVec::from_bytes(b"A")).unwrap());
    /// assert!(!trie.substring_exists(&BitVec::from_bytes(b"B")).unwrap());
    /// assert!(trie.substring_exists(&BitVec::from_bytes(b"AB")).unwrap());
    /// ```
    pub fn substring_exists(&self, bits: &BitVec) -> Result<bool> {
        if bits.len() % 8 != 0 {
            return Err(Error::InvalidLength(bits.len()));
        }
        Ok(tree::substring_exists(&self.root, bits, 0))
    }

    /// Returns the deepest node on the path spelled by `bits`, with `consumed` bits of the root's
    /// segment already known to match. The bits must be byte-aligned and reachable; callers
    /// establish reachability with [`substring_exists`](#method.substring_exists) first, and an
    /// unreachable path is reported as [`Error::PathNotFound`](enum.Error.html).
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"AC"));
    ///
    /// let location = trie.locate(&BitVec::from_bytes(b"A"), 0).unwrap();
    /// assert_eq!(location.occupied(), 8);
    /// assert!(location.segment_len() > 8);
    /// ```
    pub fn locate(&self, bits: &BitVec, consumed: usize) -> Result<PathLocation> {
        if bits.len() % 8 != 0 {
            return Err(Error::InvalidLength(bits.len()));
        }
        tree::find_last_node_in_path(&self.root, bits, consumed)
            .map(|(node, occupied)| PathLocation { node, occupied })
    }

    /// Returns the greatest stored byte-aligned key strictly less than `target`, or `None` if no
    /// stored key is smaller. The target must be byte-aligned but does not have to be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"A"));
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    ///
    /// assert_eq!(
    ///     trie.upper(&BitVec::from_bytes(b"AB")).unwrap(),
    ///     Some(BitVec::from_bytes(b"A")),
    /// );
    /// assert_eq!(trie.upper(&BitVec::from_bytes(b"A")).unwrap(), None);
    /// ```
    pub fn upper(&self, target: &BitVec) -> Result<Option<BitVec>> {
        BoundaryFinder::new(self).upper(target)
    }

    /// Returns the least stored byte-aligned key strictly greater than `target`, or `None` if no
    /// stored key is larger. The target must be byte-aligned but does not have to be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"A"));
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    ///
    /// assert_eq!(
    ///     trie.lower(&BitVec::from_bytes(b"A")).unwrap(),
    ///     Some(BitVec::from_bytes(b"AB")),
    /// );
    /// assert_eq!(trie.lower(&BitVec::from_bytes(b"AB")).unwrap(), None);
    /// ```
    pub fn lower(&self, target: &BitVec) -> Result<Option<BitVec>> {
        BoundaryFinder::new(self).lower(target)
    }

    /// Returns an iterator over the stored keys in lexicographic order.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"B"));
    /// trie.insert(&BitVec::from_bytes(b"AB"));
    /// trie.insert(&BitVec::from_bytes(b"A"));
    ///
    /// assert_eq!(
    ///     trie.keys().map(|key| key.to_bytes()).collect::<Vec<_>>(),
    ///     vec![b"A".to_vec(), b"AB".to_vec(), b"B".to_vec()],
    /// );
    /// ```
    pub fn keys(&self) -> Keys {
        Keys {
            prefix: BitVec::new(),
            stack: vec![Walk::Node(&self.root)],
        }
    }

    /// Returns the number of stored keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"A"));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the trie stores no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let trie = CritBitTrie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the trie, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_trie::bit_vec::BitVec;
    /// use critbit_trie::critbit::CritBitTrie;
    ///
    /// let mut trie = CritBitTrie::new();
    /// trie.insert(&BitVec::from_bytes(b"A"));
    /// trie.clear();
    /// assert!(trie.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.root = Node::new(BitVec::new());
        self.len = 0;
    }
}

impl Default for CritBitTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// The deepest node reached by a path walk, together with how many bits of that node's own
/// segment the path occupies. A location borrows the trie it was produced from and can seed a
/// [`BoundaryFinder`](struct.BoundaryFinder.html) restricted to the located subtree.
pub struct PathLocation<'a> {
    pub(crate) node: &'a Node,
    pub(crate) occupied: usize,
}

impl<'a> PathLocation<'a> {
    /// Returns the number of bits of the located node's segment covered by the path.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Returns the full length of the located node's segment.
    pub fn segment_len(&self) -> usize {
        self.node.segment.len()
    }

    /// Returns `true` if the located node terminates a stored key.
    pub fn is_terminal(&self) -> bool {
        self.node.is_terminal
    }

    /// Returns `true` if the located node has no children, so no longer key continues the path.
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }
}

enum Walk<'a> {
    Node(&'a Node),
    Ascend(usize),
}

/// An iterator over the keys of a `CritBitTrie`.
///
/// This iterator yields stored keys in lexicographic order.
pub struct Keys<'a> {
    prefix: BitVec,
    stack: Vec<Walk<'a>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = BitVec;

    fn next(&mut self) -> Option<BitVec> {
        while let Some(step) = self.stack.pop() {
            match step {
                Walk::Ascend(len) => self.prefix.truncate(len),
                Walk::Node(node) => {
                    let mark = self.prefix.len();
                    self.prefix.extend(node.segment.iter());
                    self.stack.push(Walk::Ascend(mark));
                    if let Some(ref one) = node.one {
                        self.stack.push(Walk::Node(one));
                    }
                    if let Some(ref zero) = node.zero {
                        self.stack.push(Walk::Node(zero));
                    }
                    if node.is_terminal {
                        return Some(self.prefix.clone());
                    }
                },
            }
        }
        None
    }
}
