use crate::bit_vec::BitVec;
use crate::critbit::node::Node;
use crate::critbit::{Error, Result};
use std::cmp;

/// Returns the number of matching bits between `bits[start..]` and `segment[seg_start..]`.
pub fn common_prefix(bits: &BitVec, start: usize, segment: &BitVec, seg_start: usize) -> usize {
    let max = cmp::min(
        bits.len().saturating_sub(start),
        segment.len().saturating_sub(seg_start),
    );
    let mut count = 0;
    while count < max && bits.get(start + count) == segment.get(seg_start + count) {
        count += 1;
    }
    count
}

pub fn insert(node: &mut Node, bits: &BitVec, index: usize) -> bool {
    let bit = match bits.get(index) {
        Some(bit) => bit,
        None => {
            // the key ends exactly on this node's boundary
            let newly = !node.is_terminal;
            node.is_terminal = true;
            return newly;
        },
    };
    let tree = node.child_mut(bit);
    match *tree {
        Some(ref mut child) => {
            let common = common_prefix(bits, index, &child.segment, 0);
            if common == child.segment.len() {
                insert(child, bits, index + common)
            } else {
                child.split(common);
                match bits.get(index + common) {
                    Some(_) => child.attach(Node::leaf(bits.slice(index + common..bits.len()))),
                    None => child.is_terminal = true,
                }
                true
            }
        },
        None => {
            *tree = Some(Box::new(Node::leaf(bits.slice(index..bits.len()))));
            true
        },
    }
}

pub fn search(node: &Node, bits: &BitVec, index: usize) -> bool {
    let common = common_prefix(bits, index, &node.segment, 0);
    if common < node.segment.len() {
        return false;
    }
    let index = index + common;
    match bits.get(index) {
        None => node.is_terminal,
        Some(bit) => match node.child(bit) {
            Some(ref child) => search(child, bits, index),
            None => false,
        },
    }
}

pub fn substring_exists(node: &Node, bits: &BitVec, index: usize) -> bool {
    let common = common_prefix(bits, index, &node.segment, 0);
    if common == node.segment.len() {
        let index = index + common;
        match bits.get(index) {
            None => true,
            Some(bit) => match node.child(bit) {
                Some(ref child) => substring_exists(child, bits, index),
                None => false,
            },
        }
    } else {
        // the bits may still end strictly inside this node's segment
        index + common == bits.len()
    }
}

/// Walks the exclusively-matching branch for `bits`, starting with `consumed` bits of the root's
/// segment already matched. Returns the deepest node reached and how many bits of that node's
/// segment the path occupies.
pub fn find_last_node_in_path<'a>(
    root: &'a Node,
    bits: &BitVec,
    consumed: usize,
) -> Result<(&'a Node, usize)> {
    if consumed > root.segment.len() {
        return Err(Error::PathNotFound);
    }
    let mut node = root;
    let mut offset = consumed;
    let mut index = 0;
    loop {
        let common = common_prefix(bits, index, &node.segment, offset);
        index += common;
        offset += common;
        if offset == node.segment.len() {
            let bit = match bits.get(index) {
                Some(bit) => bit,
                None => return Ok((node, offset)),
            };
            node = match node.child(bit).as_deref() {
                Some(child) => child,
                None => return Err(Error::PathNotFound),
            };
            offset = 0;
        } else if index == bits.len() {
            return Ok((node, offset));
        } else {
            return Err(Error::PathNotFound);
        }
    }
}
