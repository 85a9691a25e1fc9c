//! RLP encoding of trie nodes, and the "inline node < 32 bytes" rule.
//!
//! A node's RLP list mixes two kinds of items: byte strings (compact paths,
//! values, and the 32-byte hash of a large child) and verbatim sub-lists (a
//! small child's own RLP, spliced in untouched). [`Encoder::encode_raw`]
//! splices the latter in untouched; a generic `Vec<T>: RLPEncode` list
//! encoder would silently re-wrap them as RLP strings and produce the wrong
//! root.

use ethereum_types::H256;
use ferrite_rlp::structs::Encoder;
use sha3::{Digest, Keccak256};

/// Appends `node`'s item to an in-progress node list: verbatim for an inlined
/// child, RLP-string-encoded for a hashed one.
fn encode_child<'a>(encoder: Encoder<'a>, node: &NodeRef) -> Encoder<'a> {
    match node {
        NodeRef::Inline(rlp) => encoder.encode_raw(rlp),
        NodeRef::Hashed(hash) => encoder.encode_bytes(hash.as_bytes()),
    }
}

/// How a node is referenced from its parent: inlined verbatim if its RLP
/// encoding is strictly less than 32 bytes, otherwise by its Keccak-256 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Inline(Vec<u8>),
    Hashed(H256),
}

impl NodeRef {
    /// Wraps a node's completed RLP encoding, applying the inlining rule.
    fn from_encoding(rlp: Vec<u8>) -> Self {
        if rlp.len() < 32 {
            NodeRef::Inline(rlp)
        } else {
            NodeRef::Hashed(keccak256(&rlp))
        }
    }

    /// The empty node: the RLP empty string, always inlined (1 byte).
    pub fn empty() -> Self {
        NodeRef::Inline(vec![ferrite_rlp::RLP_NULL])
    }

    /// Resolves this reference to the 32-byte hash a caller actually wants,
    /// applying the same "< 32 bytes ⇒ hash the encoding" rule used for
    /// every non-root node. This is also the rule §4.1 states for the root.
    pub fn resolve_hash(&self) -> H256 {
        match self {
            NodeRef::Inline(rlp) => keccak256(rlp),
            NodeRef::Hashed(hash) => *hash,
        }
    }
}

pub fn keccak256(bytes: &[u8]) -> H256 {
    H256::from_slice(Keccak256::new().chain_update(bytes).finalize().as_slice())
}

/// Builds a leaf node: `[compact_path, value]`.
pub fn leaf(compact_path: &[u8], value: &[u8]) -> NodeRef {
    let mut rlp = Vec::new();
    Encoder::new(&mut rlp)
        .encode_bytes(compact_path)
        .encode_bytes(value)
        .finish();
    NodeRef::from_encoding(rlp)
}

/// Builds an extension node: `[compact_path, child]`.
pub fn extension(compact_path: &[u8], child: &NodeRef) -> NodeRef {
    let mut rlp = Vec::new();
    let encoder = Encoder::new(&mut rlp).encode_bytes(compact_path);
    encode_child(encoder, child).finish();
    NodeRef::from_encoding(rlp)
}

/// Builds a branch node: 16 children followed by the branch value.
pub fn branch(children: &[NodeRef; 16], value: &[u8]) -> NodeRef {
    let mut rlp = Vec::new();
    let mut encoder = Encoder::new(&mut rlp);
    for child in children {
        encoder = encode_child(encoder, child);
    }
    encoder.encode_bytes(value).finish();
    NodeRef::from_encoding(rlp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_node_is_the_rlp_empty_string() {
        assert_eq!(NodeRef::empty(), NodeRef::Inline(vec![0x80]));
    }

    #[test]
    fn small_leaf_is_inlined() {
        let node = leaf(&[0x20], b"hi");
        assert!(matches!(node, NodeRef::Inline(_)));
    }

    #[test]
    fn large_leaf_is_hashed() {
        let big_value = vec![0x61u8; 40];
        let node = leaf(&[0x20], &big_value);
        assert!(matches!(node, NodeRef::Hashed(_)));
    }

    #[test]
    fn branch_with_all_empty_children_encodes_empty_strings() {
        let children: [NodeRef; 16] = std::array::from_fn(|_| NodeRef::empty());
        let node = branch(&children, b"");
        // 16 empty strings (0x80 each) + 1 empty value string = 17 bytes payload
        if let NodeRef::Inline(rlp) = node {
            assert_eq!(rlp.len(), 1 + 17);
            assert_eq!(&rlp[1..], &[0x80; 17][..]);
        } else {
            panic!("expected inline branch");
        }
    }
}
