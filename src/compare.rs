//! Ordering predicates for [`Heap`](crate::Heap).
//!
//! A comparator answers a single question: must `a` sit nearer the root
//! than `b`? Any `Fn(&T, &T) -> bool` closure qualifies, and [`MinOrder`] /
//! [`MaxOrder`] cover the common cases for [`Ord`] types.

/// A strict weak ordering used to arrange a heap.
///
/// `prefers(a, b)` returns `true` when `a` must be nearer the root than `b`.
/// The relation has to be irreflexive, transitive and consistent over the
/// elements stored in one heap. A comparator that breaks these rules yields
/// an unspecified pop order, but never memory unsafety.
///
/// # Examples
///
/// ```
/// use pred_heap::{Compare, Heap};
///
/// struct ByLen;
///
/// impl Compare<String> for ByLen {
///     fn prefers(&self, a: &String, b: &String) -> bool {
///         a.len() < b.len()
///     }
/// }
///
/// let mut heap = Heap::new(ByLen);
/// heap.push("three".to_string());
/// heap.push("a".to_string());
/// assert_eq!(heap.pop().as_deref(), Some("a"));
/// ```
pub trait Compare<T: ?Sized> {
    fn prefers(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn prefers(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Smallest element first (`a < b`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MinOrder;

impl<T: Ord + ?Sized> Compare<T> for MinOrder {
    #[inline]
    fn prefers(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Greatest element first (`a > b`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaxOrder;

impl<T: Ord + ?Sized> Compare<T> for MaxOrder {
    #[inline]
    fn prefers(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_comparators() {
        let descending = |a: &i32, b: &i32| a > b;
        assert!(descending.prefers(&3, &2));
        assert!(!descending.prefers(&2, &3));
    }

    #[test]
    fn builtin_orders_are_irreflexive() {
        assert!(!MinOrder.prefers(&5, &5));
        assert!(!MaxOrder.prefers(&5, &5));
        assert!(MinOrder.prefers(&1, &5));
        assert!(MaxOrder.prefers(&5, &1));
    }

    #[test]
    fn builtin_orders_work_on_unsized_values() {
        assert!(MinOrder.prefers("apple", "banana"));
        assert!(MaxOrder.prefers("banana", "apple"));
    }
}
