//! Prefix filtering and seek/next semantics shared by every engine that
//! stores entries in memory (§4.5, §9). These functions operate on a slice
//! already sorted ascending by [`compare_bytes`]; each engine (in-memory
//! store, overlay, snapshots of either) is responsible for producing that
//! sorted view and calling through here rather than re-deriving the rules.

use crate::bytes::compare_bytes;
use std::cmp::Ordering;

type Entry = (Vec<u8>, Vec<u8>);

/// Sorts `entries` ascending by [`compare_bytes`] on the key.
pub fn sort_by_key_order(entries: &mut [Entry]) {
    entries.sort_by(|a, b| compare_bytes(&a.0, &b.0));
}

/// Entries whose key starts with `prefix`, preserving relative order.
/// `prefix: None` returns every entry. An empty result is normal (§4.5).
pub fn filter_prefix(entries: &[Entry], prefix: Option<&[u8]>) -> Vec<Entry> {
    match prefix {
        None => entries.to_vec(),
        Some(p) => entries
            .iter()
            .filter(|(k, _)| k.starts_with(p))
            .cloned()
            .collect(),
    }
}

/// `range({prefix})`: all entries under `prefix` (or all entries, if
/// `prefix` is `None`), in ascending key order. `entries` must already be
/// sorted.
pub fn range(entries_sorted: &[Entry], prefix: Option<&[u8]>) -> Vec<Entry> {
    filter_prefix(entries_sorted, prefix)
}

/// `seek(k, {prefix})`: the first entry in the (optionally prefix-filtered)
/// ordered view with key ≥ `k`, honoring the prefix-window edge cases of
/// §4.5. `entries` must already be sorted.
pub fn seek(entries_sorted: &[Entry], key: &[u8], prefix: Option<&[u8]>) -> Option<Entry> {
    let window = filter_prefix(entries_sorted, prefix);
    let Some(p) = prefix else {
        return first_at_or_after(&window, key);
    };

    if !key.starts_with(p) {
        // k is outside the prefix window: its position relative to the
        // window is decided by plain byte order, not window membership.
        return match compare_bytes(key, p) {
            Ordering::Less => window.first().cloned(),
            _ => None,
        };
    }

    match first_at_or_after(&window, key) {
        Some(found) => Some(found),
        // k == p exactly but nothing in the window equals p: every
        // extension of p sorts *before* p under the longer-prefix tie-break
        // (§3), so the naive ">= k" scan finds nothing even though the
        // window itself is non-empty. Fall back to the window's first
        // element in that case (§4.5 edge case).
        None if key == p => window.first().cloned(),
        None => None,
    }
}

/// `next(k, {prefix})`: the first entry in the (optionally prefix-filtered)
/// ordered view strictly greater than `k`. `entries` must already be sorted.
pub fn next(entries_sorted: &[Entry], key: &[u8], prefix: Option<&[u8]>) -> Option<Entry> {
    let window = filter_prefix(entries_sorted, prefix);
    window
        .into_iter()
        .find(|(k, _)| compare_bytes(k, key) == Ordering::Greater)
}

fn first_at_or_after(window: &[Entry], key: &[u8]) -> Option<Entry> {
    window
        .iter()
        .find(|(k, _)| compare_bytes(k, key) != Ordering::Less)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(k: &[u8], v: &[u8]) -> Entry {
        (k.to_vec(), v.to_vec())
    }

    #[test]
    fn scenario_10_prefix_iterator() {
        let mut entries = vec![
            entry(&[0x10, 0x00, 0x01], b"a"),
            entry(&[0x10, 0x00, 0xff, 0xff], b"b"),
            entry(&[0x10, 0xff], b"c"),
        ];
        sort_by_key_order(&mut entries);
        let result = range(&entries, Some(&[0x10, 0x00]));
        assert_eq!(
            result.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(),
            vec![vec![0x10, 0x00, 0x01], vec![0x10, 0x00, 0xff, 0xff]]
        );
    }

    #[test]
    fn scenario_11_next_with_prefix_tie_break() {
        let mut entries = vec![
            entry(&[0x20, 0x00, 0x01], b"a"),
            entry(&[0x20, 0x00], b"b"),
            entry(&[0x20, 0x00, 0xff], b"c"),
        ];
        sort_by_key_order(&mut entries);
        let found = next(&entries, &[0x20, 0x00, 0xff], Some(&[0x20, 0x00]));
        assert_eq!(found, Some(entry(&[0x20, 0x00], b"b")));
    }

    #[test]
    fn seek_falls_back_to_window_start_when_prefix_itself_is_absent() {
        let mut entries = vec![
            entry(&[0x10, 0x00, 0x01], b"a"),
            entry(&[0x10, 0x00, 0xff, 0xff], b"b"),
        ];
        sort_by_key_order(&mut entries);
        // 0x1000 itself is never stored.
        let found = seek(&entries, &[0x10, 0x00], Some(&[0x10, 0x00]));
        assert_eq!(found, Some(entry(&[0x10, 0x00, 0x01], b"a")));
    }

    #[test]
    fn seek_outside_window_before_returns_window_start() {
        let mut entries = vec![entry(&[0x20, 0x01], b"a"), entry(&[0x20, 0x02], b"b")];
        sort_by_key_order(&mut entries);
        let found = seek(&entries, &[0x10], Some(&[0x20]));
        assert_eq!(found, Some(entry(&[0x20, 0x01], b"a")));
    }

    #[test]
    fn seek_outside_window_after_returns_none() {
        let mut entries = vec![entry(&[0x20, 0x01], b"a")];
        sort_by_key_order(&mut entries);
        assert_eq!(seek(&entries, &[0x30], Some(&[0x20])), None);
    }

    #[test]
    fn seek_without_prefix_is_a_plain_lower_bound() {
        let mut entries = vec![entry(&[0x01], b"a"), entry(&[0x05], b"b")];
        sort_by_key_order(&mut entries);
        assert_eq!(seek(&entries, &[0x03], None), Some(entry(&[0x05], b"b")));
        assert_eq!(seek(&entries, &[0x06], None), None);
    }
}
