//! Binary crit-bit trie over bit-string keys.

mod boundary;
mod node;
mod tree;
mod trie;

pub use self::boundary::BoundaryFinder;
pub use self::trie::{CritBitTrie, Keys, PathLocation};

use std::error;
use std::fmt;
use std::result;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// A bit-vector length that is not a multiple of eight was passed to an operation requiring
    /// byte alignment.
    InvalidLength(usize),
    /// The path locator was handed bits that are not reachable in the trie. Callers are expected
    /// to establish reachability with `substring_exists` first.
    PathNotFound,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidLength(len) => {
                write!(f, "bit string length must be a multiple of 8, got {}", len)
            },
            Error::PathNotFound => write!(f, "path not found despite a reachability check"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
