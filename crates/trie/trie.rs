//! A pure, deterministic Modified Merkle Patricia Trie root hasher.
//!
//! `trie_root` implements the Ethereum execution specification's
//! `patricialize` algorithm exactly: given an unordered set of key/value byte
//! pairs, it produces the 32-byte root hash used for state, transaction, and
//! receipt roots. There is no incremental trie and no node persistence here —
//! every call recomputes the root from scratch from a full key/value
//! snapshot, by design.

pub mod nibbles;
pub mod node;

use ethereum_types::H256;
use lazy_static::lazy_static;
use node::{keccak256, NodeRef};

lazy_static! {
    /// `keccak256(0x80)`, the root of a trie with no entries.
    pub static ref EMPTY_TRIE_HASH: H256 = keccak256(&[ferrite_rlp::RLP_NULL]);
}

/// Computes the Merkle Patricia Trie root for a set of key/value pairs.
///
/// `keys` and `values` are parallel sequences: `values[i]` is the value
/// stored at `keys[i]`. Keys are taken as already in final form — for a
/// secure trie, callers are expected to have pre-hashed them. If the same
/// key appears more than once, the later entry wins, mirroring the
/// last-write overwrite semantics of `patricialize`'s branch-value rule.
///
/// `keys.len()` must equal `values.len()`; this is checked with a debug
/// assertion rather than a `Result`, since mismatched slice lengths are a
/// caller bug and not a runtime failure this pure function can recover from.
pub fn trie_root<K: AsRef<[u8]>, V: AsRef<[u8]>>(keys: &[K], values: &[V]) -> H256 {
    debug_assert_eq!(keys.len(), values.len(), "trie_root: keys/values length mismatch");

    if keys.is_empty() {
        return *EMPTY_TRIE_HASH;
    }

    let nibble_keys: Vec<Vec<u8>> = keys.iter().map(|k| nibbles::bytes_to_nibbles(k.as_ref())).collect();
    let entries: Vec<(&[u8], &[u8])> = nibble_keys
        .iter()
        .map(Vec::as_slice)
        .zip(values.iter().map(AsRef::as_ref))
        .collect();

    patricialize(&entries, 0).resolve_hash()
}

/// Recursively builds the trie for the nibble-keyed entries remaining at
/// `level`, returning how the resulting node should be referenced by its
/// parent (inlined verbatim, or by hash — see [`node::NodeRef`]).
///
/// `entries` may contain duplicate keys; per §4.1 rule 4 the later one in
/// the slice wins when two keys end exactly at `level`.
fn patricialize(entries: &[(&[u8], &[u8])], level: usize) -> NodeRef {
    if entries.is_empty() {
        return NodeRef::empty();
    }

    if entries.len() == 1 {
        let (key, value) = entries[0];
        let path = &key[level..];
        return node::leaf(&nibbles::encode_compact(path, true), value);
    }

    let prefix_len = longest_common_prefix(entries, level);
    if prefix_len > 0 {
        let (first_key, _) = entries[0];
        let path = &first_key[level..level + prefix_len];
        let child = patricialize(entries, level + prefix_len);
        return node::extension(&nibbles::encode_compact(path, false), &child);
    }

    let mut buckets: [Vec<(&[u8], &[u8])>; 16] = std::array::from_fn(|_| Vec::new());
    let mut branch_value: &[u8] = &[];
    for &(key, value) in entries {
        if key.len() == level {
            // Later entries win (last-write-wins on duplicate keys).
            branch_value = value;
        } else {
            let nibble = key[level] as usize;
            buckets[nibble].push((key, value));
        }
    }

    let children: [NodeRef; 16] = std::array::from_fn(|i| {
        if buckets[i].is_empty() {
            NodeRef::empty()
        } else {
            patricialize(&buckets[i], level + 1)
        }
    });

    node::branch(&children, branch_value)
}

/// Length of the nibble prefix shared by every entry's key (from `level` on).
fn longest_common_prefix(entries: &[(&[u8], &[u8])], level: usize) -> usize {
    let (first_key, _) = entries[0];
    let mut len = first_key.len() - level;
    for &(key, _) in &entries[1..] {
        let max = (key.len() - level).min(len);
        let mut matched = 0;
        while matched < max && key[level + matched] == first_key[level + matched] {
            matched += 1;
        }
        len = matched;
        if len == 0 {
            break;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn h(hex_str: &str) -> H256 {
        H256::from_slice(&hex::decode(hex_str.trim_start_matches("0x")).unwrap())
    }

    #[test]
    fn empty_trie() {
        let keys: Vec<&[u8]> = vec![];
        let values: Vec<&[u8]> = vec![];
        assert_eq!(
            trie_root(&keys, &values),
            h("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421")
        );
        assert_eq!(trie_root(&keys, &values), *EMPTY_TRIE_HASH);
    }

    #[test]
    fn single_item() {
        let keys: Vec<&[u8]> = vec![b"A"];
        let values: Vec<&[u8]> = vec![b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"];
        assert_eq!(
            trie_root(&keys, &values),
            h("d23786fb4a010da3ce639d66d5e904a11dbc02746d1ce25029e53290cabf28ab")
        );
    }

    #[test]
    fn dogs() {
        let keys: Vec<&[u8]> = vec![b"doe", b"dog", b"dogglesworth"];
        let values: Vec<&[u8]> = vec![b"reindeer", b"puppy", b"cat"];
        assert_eq!(
            trie_root(&keys, &values),
            h("8aad789dff2f538bca5d8ea56e8abe10f4c7ba3a5dea95fea4cd6e7c3a1168d3")
        );
    }

    #[test]
    fn puppy() {
        let keys: Vec<&[u8]> = vec![b"do", b"horse", b"doge", b"dog"];
        let values: Vec<&[u8]> = vec![b"verb", b"stallion", b"coin", b"puppy"];
        assert_eq!(
            trie_root(&keys, &values),
            h("5991bb8c6514148a29db676a14ac506cd2cd5775ace63c30a4fe457715e9ac84")
        );
    }

    #[test]
    fn hex_keys() {
        let keys: Vec<Vec<u8>> = vec![hex!("0045").to_vec(), hex!("4500").to_vec()];
        let values: Vec<Vec<u8>> = vec![hex!("0123456789").to_vec(), hex!("9876543210").to_vec()];
        assert_eq!(
            trie_root(&keys, &values),
            h("285505fcabe84badc8aa310e2aae17eddc7d120aabec8a476902c8184b3a3503")
        );
    }

    #[test]
    fn testy() {
        let keys: Vec<&[u8]> = vec![b"test", b"te"];
        let values: Vec<&[u8]> = vec![b"test", b"testy"];
        assert_eq!(
            trie_root(&keys, &values),
            h("8452568af70d8d140f58d941338542f645fcca50094b20f3c3d8c3df49337928")
        );
    }

    #[test]
    fn duplicate_keys_last_value_wins() {
        let keys: Vec<&[u8]> = vec![b"dup", b"dup"];
        let values: Vec<&[u8]> = vec![b"first", b"second"];
        let with_dup = trie_root(&keys, &values);

        let keys_single: Vec<&[u8]> = vec![b"dup"];
        let values_single: Vec<&[u8]> = vec![b"second"];
        let single = trie_root(&keys_single, &values_single);

        assert_eq!(with_dup, single);
    }

    #[test]
    fn prefix_keys_produce_an_extension_and_a_branch_value() {
        // "do" is a strict prefix of "dog"; this exercises the branch
        // value slot carrying the shorter key's value.
        let keys: Vec<&[u8]> = vec![b"do", b"dog"];
        let values: Vec<&[u8]> = vec![b"verb", b"puppy"];
        // Must not panic and must be deterministic / order-independent.
        let root_a = trie_root(&keys, &values);
        let keys_b: Vec<&[u8]> = vec![b"dog", b"do"];
        let values_b: Vec<&[u8]> = vec![b"puppy", b"verb"];
        let root_b = trie_root(&keys_b, &values_b);
        assert_eq!(root_a, root_b);
    }
}
