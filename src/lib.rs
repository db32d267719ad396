#![allow(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

//! A binary heap whose order is fixed by a caller-supplied predicate.
//!
//! [`Heap`] stores its elements in a `Vec` laid out as a complete binary
//! tree. The comparator decides what "top" means: `|a, b| a < b` gives a
//! min-heap, `|a, b| a > b` a max-heap, and any strict weak ordering over
//! the element type works in between.

use core::fmt;
use core::mem::{swap, ManuallyDrop};
use core::ptr;

use std::collections::TryReserveError;

use log::trace;

mod compare;

pub use compare::{Compare, MaxOrder, MinOrder};

/// A priority queue implemented with a binary heap and an ordering predicate.
///
/// The element at the top is always the one the comparator prefers over all
/// others. When several elements are equivalent under the comparator, which
/// of them surfaces first is decided by the tree shape and is not stable.
///
/// It is a logic error for an item to be modified in such a way that its
/// ordering relative to any other item changes while it is in the heap. This
/// is normally only possible through [`Cell`], [`RefCell`], global state or
/// unsafe code. The resulting pop order is unspecified, but the heap stays
/// memory safe.
///
/// `Heap` does no locking of its own: sharing one across threads needs
/// external synchronisation, as for any `&mut`-mutated collection.
///
/// # Examples
///
/// ```
/// use pred_heap::Heap;
///
/// let mut heap = Heap::new(|a: &i32, b: &i32| a < b);
///
/// // Nothing in there yet.
/// assert_eq!(heap.peek(), None);
///
/// heap.push(7);
/// heap.push(1);
/// heap.push(5);
///
/// // Peek shows the element the comparator prefers.
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.len(), 3);
///
/// // Popping hands the elements back in comparator order.
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.pop(), Some(5));
/// assert_eq!(heap.pop(), Some(7));
/// assert_eq!(heap.pop(), None);
/// assert!(heap.is_empty());
/// ```
///
/// ## Records
///
/// ```
/// use pred_heap::Heap;
///
/// struct Task {
///     name: &'static str,
///     priority: u32,
/// }
///
/// let mut heap = Heap::new(|a: &Task, b: &Task| a.priority > b.priority);
/// heap.push(Task { name: "low", priority: 10 });
/// heap.push(Task { name: "urgent", priority: 100 });
///
/// assert_eq!(heap.pop().map(|t| t.name), Some("urgent"));
/// ```
///
/// # Time complexity
///
/// | [push]        | [pop]         | [peek] |
/// |---------------|---------------|--------|
/// | *O*(log(*n*)) | *O*(log(*n*)) | *O*(1) |
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
/// [push]: Heap::push
/// [pop]: Heap::pop
/// [peek]: Heap::peek
pub struct Heap<T, C> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Clone, C: Clone> Clone for Heap<T, C> {
    fn clone(&self) -> Self {
        Heap {
            data: self.data.clone(),
            cmp: self.cmp.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.data.clone_from(&source.data);
        self.cmp.clone_from(&source.cmp);
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Heap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: Ord> Heap<T, MinOrder> {
    /// Creates an empty heap that yields the smallest element first.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::min_heap();
    /// heap.push(2);
    /// heap.push(1);
    /// assert_eq!(heap.pop(), Some(1));
    /// ```
    #[must_use]
    pub fn min_heap() -> Self {
        Heap::new(MinOrder)
    }
}

impl<T: Ord> Heap<T, MaxOrder> {
    /// Creates an empty heap that yields the greatest element first.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::max_heap();
    /// heap.push(1);
    /// heap.push(2);
    /// assert_eq!(heap.pop(), Some(2));
    /// ```
    #[must_use]
    pub fn max_heap() -> Self {
        Heap::new(MaxOrder)
    }
}

impl<T: Ord> Default for Heap<T, MinOrder> {
    #[inline]
    fn default() -> Self {
        Heap::min_heap()
    }
}

impl<T: Ord> Default for Heap<T, MaxOrder> {
    #[inline]
    fn default() -> Self {
        Heap::max_heap()
    }
}

impl<T, C: Compare<T>> Heap<T, C> {
    /// Creates an empty heap ordered by `cmp`.
    ///
    /// The comparator is fixed for the lifetime of the heap.
    ///
    /// # Examples
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::new(|a: &i32, b: &i32| a > b);
    /// heap.push(4);
    /// ```
    #[must_use]
    pub fn new(cmp: C) -> Self {
        Heap { data: vec![], cmp }
    }

    /// Creates an empty heap ordered by `cmp` with room for at least
    /// `capacity` elements before reallocating.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::with_capacity(10, |a: &u8, b: &u8| a < b);
    /// assert!(heap.capacity() >= 10);
    /// heap.push(4);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        Heap {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Pushes an item onto the heap.
    ///
    /// The item is appended as the last leaf and moved toward the root for as
    /// long as the comparator strictly prefers it over its parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::max_heap();
    /// heap.push(3);
    /// heap.push(5);
    /// heap.push(1);
    ///
    /// assert_eq!(heap.len(), 3);
    /// assert_eq!(heap.peek(), Some(&5));
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(log(*n*)) comparisons. A single call can cost *O*(*n*) when the
    /// backing vector has to grow; that cost is amortised over earlier pushes.
    pub fn push(&mut self, item: T) {
        let old_len = self.len();
        self.data.push(item);
        // SAFETY: we just pushed, so old_len == self.len() - 1 < self.len().
        let pos = unsafe { self.sift_up(old_len) };
        trace!("push: settled at slot {} of {}", pos, self.len());
    }

    /// Removes the top item and returns it, or `None` if the heap is empty.
    ///
    /// The returned value is moved out of the backing vector, which shrinks
    /// by one; the heap keeps no copy of it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::min_heap();
    /// heap.push(3);
    /// heap.push(1);
    ///
    /// assert_eq!(heap.pop(), Some(1));
    /// assert_eq!(heap.pop(), Some(3));
    /// assert_eq!(heap.pop(), None);
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(log(*n*)) comparisons.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.data.pop().map(|mut item| {
            if !self.is_empty() {
                // The old last leaf takes the root slot and the old root
                // becomes the value handed back.
                swap(&mut item, &mut self.data[0]);
                // SAFETY: !self.is_empty() means 0 < self.len().
                let pos = unsafe { self.sift_down(0) };
                trace!("pop: root replacement settled at slot {}", pos);
            }
            item
        });
        trace!("pop: {} element(s) left", self.len());
        item
    }

    /// Checks that no element is preferred over its parent.
    ///
    /// This holds after every public call; it exists for tests and debug
    /// assertions in calling code.
    pub fn check_integrity(&self) -> bool {
        (1..self.data.len()).all(|i| {
            let parent = (i - 1) / 2;
            !self.cmp.prefers(&self.data[i], &self.data[parent])
        })
    }

    // The sift routines move an element out of the vector (leaving a hole),
    // shift the others along and write the element back where the hole ends
    // up. `Hole` refills the slot when dropped, so a comparator that panics
    // leaves every element in the vector exactly once.

    /// Moves the element at `pos` toward the root while it is strictly
    /// preferred over its parent. Returns its final position.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_up(&mut self, pos: usize) -> usize {
        // SAFETY: the caller guarantees that pos < self.len().
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };

        while hole.pos() > 0 {
            let parent = (hole.pos() - 1) / 2;

            // SAFETY: hole.pos() > 0, so parent < hole.pos() is in bounds
            //  and differs from hole.pos().
            if !self.cmp.prefers(hole.element(), unsafe { hole.get(parent) }) {
                break;
            }

            // SAFETY: same as above.
            unsafe { hole.move_to(parent) };
        }

        hole.pos()
    }

    /// Moves the element at `pos` toward the leaves while its preferred child
    /// is strictly preferred over it. Returns its final position.
    ///
    /// The preferred child is the left one unless the right child exists and
    /// the comparator prefers it over the left.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_down(&mut self, pos: usize) -> usize {
        let end = self.len();
        // SAFETY: the caller guarantees that pos < self.len().
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };

        while let Some(left) = first_child(hole.pos()).filter(|&left| left < end) {
            let mut child = left;
            if let Some(right) = left.checked_add(1).filter(|&right| right < end) {
                // SAFETY: left < right < end == self.len() and both are
                //  children of hole.pos(), so neither equals it.
                if self
                    .cmp
                    .prefers(unsafe { hole.get(right) }, unsafe { hole.get(left) })
                {
                    child = right;
                }
            }

            // SAFETY: child is one of the two in-bounds children checked above.
            if !self.cmp.prefers(unsafe { hole.get(child) }, hole.element()) {
                break;
            }

            // SAFETY: same as above.
            unsafe { hole.move_to(child) };
        }

        hole.pos()
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::min_heap();
    /// heap.reserve(100);
    /// assert!(heap.capacity() >= 100);
    /// heap.push(4);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements,
    /// reporting allocation failure instead of aborting.
    ///
    /// ```
    /// use pred_heap::Heap;
    /// use std::collections::TryReserveError;
    ///
    /// fn fill(data: &[u32]) -> Result<Heap<u32, pred_heap::MaxOrder>, TryReserveError> {
    ///     let mut heap = Heap::max_heap();
    ///     heap.try_reserve(data.len())?;
    ///     for &x in data {
    ///         heap.push(x);
    ///     }
    ///     Ok(heap)
    /// }
    /// # fill(&[1, 2, 3]).unwrap();
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve(additional)
    }
}

impl<T, C> Heap<T, C> {
    /// Returns the top item, or `None` if the heap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::max_heap();
    /// assert_eq!(heap.peek(), None);
    ///
    /// heap.push(1);
    /// heap.push(5);
    /// heap.push(2);
    /// assert_eq!(heap.peek(), Some(&5));
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(1).
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the number of elements in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the heap can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Discards as much spare capacity as possible.
    ///
    /// Popping never gives memory back on its own; call this after draining a
    /// large heap.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::with_capacity(100, |a: &i32, b: &i32| a < b);
    /// heap.push(1);
    /// heap.shrink_to_fit();
    /// assert!(heap.capacity() < 100);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
    }

    /// Returns the comparator the heap was built with.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Consumes the heap and returns its elements in storage order: index `i`
    /// has children `2i + 1` and `2i + 2`.
    ///
    /// ```
    /// use pred_heap::Heap;
    ///
    /// let mut heap = Heap::min_heap();
    /// heap.push(2);
    /// heap.push(1);
    /// assert_eq!(heap.into_vec(), [1, 2]);
    /// ```
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Index of the left child of `pos`, or `None` if it is not representable.
#[inline]
fn first_child(pos: usize) -> Option<usize> {
    pos.checked_mul(2)?.checked_add(1)
}

/// Hole represents a slot in a slice whose value has been moved out.
/// On drop the removed value is written back at the hole's current position.
struct Hole<'a, T: 'a> {
    data: &'a mut [T],
    elt: ManuallyDrop<T>,
    pos: usize,
}

impl<'a, T> Hole<'a, T> {
    /// # Safety
    ///
    /// `pos` must be within the data slice.
    #[inline]
    unsafe fn new(data: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos < data.len());
        // SAFETY: the caller guarantees pos is in bounds.
        let elt = unsafe { ptr::read(data.get_unchecked(pos)) };
        Hole {
            data,
            elt: ManuallyDrop::new(elt),
            pos,
        }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    /// The value taken out of the slice.
    #[inline]
    fn element(&self) -> &T {
        &self.elt
    }

    /// # Safety
    ///
    /// `index` must be within the data slice and differ from the hole.
    #[inline]
    unsafe fn get(&self, index: usize) -> &T {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        // SAFETY: the caller guarantees index is in bounds.
        unsafe { self.data.get_unchecked(index) }
    }

    /// Moves the value at `index` into the hole, leaving the hole at `index`.
    ///
    /// # Safety
    ///
    /// `index` must be within the data slice and differ from the hole.
    #[inline]
    unsafe fn move_to(&mut self, index: usize) {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        // SAFETY: both positions are in bounds and distinct, so the one-element
        //  regions cannot overlap.
        unsafe {
            let base = self.data.as_mut_ptr();
            ptr::copy_nonoverlapping(base.add(index), base.add(self.pos), 1);
        }
        self.pos = index;
    }
}

impl<T> Drop for Hole<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: pos is always in bounds and currently holds a moved-out
        //  (bitwise duplicated) value, so overwriting it without dropping
        //  restores the slice.
        unsafe {
            let pos = self.pos;
            ptr::copy_nonoverlapping(&*self.elt, self.data.get_unchecked_mut(pos), 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_child_stops_at_overflow() {
        assert_eq!(first_child(0), Some(1));
        assert_eq!(first_child(3), Some(7));
        assert_eq!(first_child(usize::MAX / 2), Some(usize::MAX));
        assert_eq!(first_child(usize::MAX / 2 + 1), None);
        assert_eq!(first_child(usize::MAX), None);
    }

    #[test]
    fn sift_down_prefers_left_on_ties() {
        // Root 9 with two equal children: the left one must move up.
        let mut heap = Heap::new(|a: &(u8, char), b: &(u8, char)| a.0 < b.0);
        heap.data = vec![(9, 'r'), (1, 'L'), (1, 'R')];
        // SAFETY: the heap is non-empty.
        let pos = unsafe { heap.sift_down(0) };
        assert_eq!(pos, 1);
        assert_eq!(heap.data, [(1, 'L'), (9, 'r'), (1, 'R')]);
    }

    #[test]
    fn sift_up_stops_at_equivalent_parent() {
        let mut heap = Heap::new(|a: &(u8, char), b: &(u8, char)| a.0 < b.0);
        heap.data = vec![(1, 'p'), (1, 'c')];
        // SAFETY: slot 1 is in bounds.
        let pos = unsafe { heap.sift_up(1) };
        assert_eq!(pos, 1);
        assert_eq!(heap.data, [(1, 'p'), (1, 'c')]);
    }

    #[test]
    fn check_integrity_spots_violations() {
        let mut heap = Heap::min_heap();
        heap.data = vec![1, 3, 2];
        assert!(heap.check_integrity());
        heap.data = vec![3, 1, 2];
        assert!(!heap.check_integrity());
    }
}
