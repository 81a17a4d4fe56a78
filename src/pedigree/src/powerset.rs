use itertools::Itertools;

/// Enumerate every subset of `set`, from the empty set up to `set` itself.
/// 
/// Elements of `set` are expected to be distinct. Each of the `2^n` subsets is yielded
/// exactly once, with elements kept in their original relative order.
pub fn powerset<T: Clone>(set: &[T]) -> impl Iterator<Item = Vec<T>> + '_ {
    set.iter().cloned().powerset()
}

/// Elements of `set` which are not part of `subset`.
pub fn complement<T: Clone + PartialEq>(set: &[T], subset: &[T]) -> Vec<T> {
    set.iter().filter(|item| !subset.contains(item)).cloned().collect()
}
