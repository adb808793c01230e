//! Slice chunking

/// Split `items` into consecutive chunks of `size` elements
///
/// The last chunk holds the remainder and may be shorter. A `size` of 0 is
/// treated as 1.
pub fn arr_chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}
