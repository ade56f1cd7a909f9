//! Subtable partitioning.
//!
//! A lookup's rules are split across several subtables so no single
//! subtable exceeds the binary format's size limit. The limit used here
//! is conservative, well under the true ceiling.

/// Maximum entries per synthesized subtable.
pub const SUBTABLE_MAX_COUNT: usize = 4000;

/// Split `items` into consecutive groups of at most `limit` entries.
///
/// Order is preserved; only the final group may be short.
///
/// ```
/// use hanconv_core::chunk::chunk;
///
/// let groups: Vec<&[i32]> = chunk(&[1, 2, 3, 4, 5], 2).collect();
/// assert_eq!(groups, [&[1, 2][..], &[3, 4], &[5]]);
/// ```
pub fn chunk<T>(items: &[T], limit: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(limit)
}

/// Split `items` into groups of at most `limit` entries without mixing
/// two key values in one group.
///
/// Items are assumed already clustered by key (consecutive equal-key
/// runs), the ordering the conversion-table loader guarantees.
///
/// ```
/// use hanconv_core::chunk::chunk_by_key;
///
/// let items = ["AA", "BBB", "CCC", "DDD", "EE"];
/// let groups: Vec<&[&str]> = chunk_by_key(&items, 3, |s| s.len()).collect();
/// assert_eq!(groups, [&["AA"][..], &["BBB", "CCC", "DDD"], &["EE"]]);
/// ```
pub fn chunk_by_key<T, K, F>(items: &[T], limit: usize, key: F) -> impl Iterator<Item = &[T]>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    items
        .chunk_by(move |a, b| key(a) == key(b))
        .flat_map(move |run| run.chunks(limit))
}
