use core::fmt;
use core::marker::PhantomData;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::boxed::Box;
        use alloc::vec::Vec;
    } else {
        use std::boxed::Box;
        use std::vec::Vec;
    }
}

use super::iter::{Cursor, CursorMut, IntoIter, Iter, IterMut};

pub type SequenceResult<T> = Result<T, SequenceError>;

/// the ways a call can violate the contract of a `LinkedSequence`
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SequenceError {
    /// front/back/pop_front/pop_back on a sequence with no elements
    #[error("sequence is empty")]
    EmptyContainer,
    /// insert/erase with an index outside of the operation's valid range
    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// an owning, doubly-linked sequence of `T`.
///
/// the forward chain is the ownership chain: the sequence owns `head` and
/// every node owns its `next`. `prev` pointers are plain back-references used
/// for backward traversal and relinking, never for freeing.
pub struct LinkedSequence<T> {
    /// first node, null iff the sequence is empty
    pub(super) head: *mut Node<T>,
    /// last node of the chain owned through `head`, null iff empty
    pub(super) tail: *mut Node<T>,
    pub(super) len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

pub(super) struct Node<T> {
    pub(super) prev: *mut Node<T>,
    pub(super) data: T,
    pub(super) next: *mut Node<T>,
}

impl<T> Node<T> {
    /// heap allocate an unlinked node
    fn alloc(data: T) -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            prev: core::ptr::null_mut(),
            data,
            next: core::ptr::null_mut(),
        }))
    }

    /// free a node, handing back its value
    /// # Safety
    /// `node` must have come from `Node::alloc`, must already be unlinked and
    /// must not be used again
    unsafe fn release(node: *mut Node<T>) -> T {
        Box::from_raw(node).data
    }
}

impl<T> LinkedSequence<T> {
    /// create an empty sequence
    pub const fn new() -> Self {
        Self {
            head: core::ptr::null_mut(),
            tail: core::ptr::null_mut(),
            len: 0,
            marker: PhantomData,
        }
    }

    /// the number of elements in the sequence
    pub fn len(&self) -> usize {
        self.len
    }

    /// returns true if the length of the sequence is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_front(&mut self, value: T) {
        let node = Node::alloc(value);
        if self.is_empty() {
            self.head = node;
            self.tail = node;
        } else {
            // SAFETY: the sequence is not empty so `head` is a live node
            unsafe {
                (*node).next = self.head;
                (*self.head).prev = node;
            }
            self.head = node;
        }
        self.len += 1;
    }

    pub fn push_back(&mut self, value: T) {
        let node = Node::alloc(value);
        if self.is_empty() {
            self.head = node;
            self.tail = node;
        } else {
            // SAFETY: the sequence is not empty so `tail` is a live node
            unsafe {
                (*node).prev = self.tail;
                (*self.tail).next = node;
            }
            self.tail = node;
        }
        self.len += 1;
    }

    /// remove the first element and return it
    pub fn pop_front(&mut self) -> SequenceResult<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: `head` is a live node of this sequence
        Ok(unsafe { self.unlink_node(self.head) })
    }

    /// remove the last element and return it
    pub fn pop_back(&mut self) -> SequenceResult<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: `tail` is a live node of this sequence
        Ok(unsafe { self.unlink_node(self.tail) })
    }

    pub fn front(&self) -> SequenceResult<&T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: we validated that the sequence is not empty
        Ok(unsafe { &(*self.head).data })
    }

    pub fn back(&self) -> SequenceResult<&T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: we validated that the sequence is not empty
        Ok(unsafe { &(*self.tail).data })
    }

    pub fn front_mut(&mut self) -> SequenceResult<&mut T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: we validated that the sequence is not empty
        Ok(unsafe { &mut (*self.head).data })
    }

    pub fn back_mut(&mut self) -> SequenceResult<&mut T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        // SAFETY: we validated that the sequence is not empty
        Ok(unsafe { &mut (*self.tail).data })
    }

    /// insert `value` so that it ends up at position `index`, shifting every
    /// element at or after `index` one position later. `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> SequenceResult<()> {
        if index > self.len {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        if index == 0 {
            self.push_front(value);
        } else if index == self.len {
            self.push_back(value);
        } else {
            let curr = self.node_at(index);
            // SAFETY: 0 < index < len so `curr` is a live interior node
            unsafe { self.link_before(curr, value) };
        }
        Ok(())
    }

    /// remove the element at position `index` and return it
    pub fn erase(&mut self, index: usize) -> SequenceResult<T> {
        if index >= self.len {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        if index == 0 {
            self.pop_front()
        } else if index == self.len - 1 {
            self.pop_back()
        } else {
            let curr = self.node_at(index);
            // SAFETY: index < len so `curr` is a live node of this sequence
            Ok(unsafe { self.unlink_node(curr) })
        }
    }

    /// borrow the element at position `index`, walking forward from the head
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len so the walk ends on a live node
        Some(unsafe { &(*self.node_at(index)).data })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len so the walk ends on a live node
        Some(unsafe { &mut (*self.node_at(index)).data })
    }

    /// release every node, leaving the sequence empty
    pub fn clear(&mut self) {
        let mut curr = self.head;
        self.head = core::ptr::null_mut();
        self.tail = core::ptr::null_mut();
        self.len = 0;

        while !curr.is_null() {
            // SAFETY: every node reachable through `next` is owned by the
            // chain we just detached and is freed exactly once here
            unsafe {
                let next = (*curr).next;
                drop(Node::release(curr));
                curr = next;
            }
        }
    }

    /// move the whole chain out of `self`, leaving `self` empty and usable
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }

    /// sort the values into non-decreasing order with a selection sort run
    /// directly over the links.
    ///
    /// values are swapped between nodes, nodes are never relinked, so node
    /// identity does not follow a value through the sort. not stable.
    pub fn selection_sort(&mut self)
    where
        T: PartialOrd,
    {
        let mut curr = self.head;
        while !curr.is_null() {
            // SAFETY: `curr` and every node reached from it through `next`
            // are live nodes of this sequence, and `min != curr` whenever we
            // swap so the two places never alias
            unsafe {
                let mut min = curr;
                let mut search = (*curr).next;
                while !search.is_null() {
                    if (*search).data < (*min).data {
                        min = search;
                    }
                    search = (*search).next;
                }

                if min != curr {
                    core::ptr::swap(
                        core::ptr::addr_of_mut!((*curr).data),
                        core::ptr::addr_of_mut!((*min).data),
                    );
                }
                curr = (*curr).next;
            }
        }
    }

    /// permute the values uniformly at random using a freshly seeded
    /// generator
    pub fn shuffle(&mut self) {
        let mut rng = StdRng::from_entropy();
        tracing::trace!(len = self.len, "shuffling with an entropy seeded generator");
        self.shuffle_with(&mut rng);
    }

    /// permute the values with a backward Fisher-Yates pass driven by `rng`.
    ///
    /// the pass runs over a scratch buffer holding one slot per node, so the
    /// values move while the nodes stay where they are.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut slots: Vec<&mut T> = self.iter_mut().collect();

        for i in (1..slots.len()).rev() {
            let j = rng.gen_range(0..=i);
            if i != j {
                let (lo, hi) = slots.split_at_mut(i);
                core::mem::swap(&mut *lo[j], &mut *hi[0]);
            }
        }
    }

    /// iterate head to tail. reverse with `.rev()`
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// a position on the first element, or on the end if the sequence is empty
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.head)
    }

    /// a position on the last element, to be walked backward to the head
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.tail)
    }

    /// the past-the-end position, the end marker for both directions
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, core::ptr::null_mut())
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let head = self.head;
        CursorMut::new(self, head)
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T> {
        let tail = self.tail;
        CursorMut::new(self, tail)
    }

    /// walk forward from the head `index` steps. caller guarantees
    /// `index < len`
    fn node_at(&self, index: usize) -> *mut Node<T> {
        debug_assert!(index < self.len);
        let mut curr = self.head;
        for _ in 0..index {
            // SAFETY: fewer than `len` steps from the head never leaves the chain
            curr = unsafe { (*curr).next };
        }
        curr
    }

    /// splice a new node holding `value` in front of `at`
    /// # Safety
    /// `at` must be a live node of this sequence
    pub(super) unsafe fn link_before(&mut self, at: *mut Node<T>, value: T) {
        let node = Node::alloc(value);
        let prev = (*at).prev;
        (*node).prev = prev;
        (*node).next = at;
        if prev.is_null() {
            self.head = node;
        } else {
            (*prev).next = node;
        }
        (*at).prev = node;
        self.len += 1;
    }

    /// splice a new node holding `value` right after `at`
    /// # Safety
    /// `at` must be a live node of this sequence
    pub(super) unsafe fn link_after(&mut self, at: *mut Node<T>, value: T) {
        let node = Node::alloc(value);
        let next = (*at).next;
        (*node).prev = at;
        (*node).next = next;
        if next.is_null() {
            self.tail = node;
        } else {
            (*next).prev = node;
        }
        (*at).next = node;
        self.len += 1;
    }

    /// detach `node`, reattach its neighbours to each other, free it
    /// # Safety
    /// `node` must be a live node of this sequence
    pub(super) unsafe fn unlink_node(&mut self, node: *mut Node<T>) -> T {
        let prev = (*node).prev;
        let next = (*node).next;
        if prev.is_null() {
            self.head = next;
        } else {
            (*prev).next = next;
        }
        if next.is_null() {
            self.tail = prev;
        } else {
            (*next).prev = prev;
        }
        self.len -= 1;
        Node::release(node)
    }

    /// walk the chain both ways and check every link against `len`
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        if self.len == 0 {
            assert!(self.head.is_null());
            assert!(self.tail.is_null());
            return;
        }

        unsafe {
            assert!((*self.head).prev.is_null());
            assert!((*self.tail).next.is_null());

            let mut forward = 0;
            let mut prev = core::ptr::null_mut();
            let mut curr = self.head;
            while !curr.is_null() {
                assert_eq!((*curr).prev, prev, "broken back link at {}", forward);
                prev = curr;
                curr = (*curr).next;
                forward += 1;
            }
            assert_eq!(prev, self.tail);
            assert_eq!(forward, self.len);

            let mut backward = 0;
            let mut curr = self.tail;
            while !curr.is_null() {
                curr = (*curr).prev;
                backward += 1;
            }
            assert_eq!(backward, self.len);
        }
    }
}

impl<T> Drop for LinkedSequence<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for LinkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedSequence<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

// SAFETY: the sequence exclusively owns its nodes, the raw pointers are never
// shared outside of borrows tied to the sequence
unsafe impl<T: Send> Send for LinkedSequence<T> {}
unsafe impl<T: Sync> Sync for LinkedSequence<T> {}

impl<T: fmt::Debug> fmt::Debug for LinkedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedSequence<T> {}

impl<T> FromIterator<T> for LinkedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl<T> Extend<T> for LinkedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> IntoIterator for LinkedSequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a LinkedSequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedSequence<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn seq_of<T: Clone>(values: &[T]) -> LinkedSequence<T> {
        values.iter().cloned().collect()
    }

    fn contents<T: Clone>(seq: &LinkedSequence<T>) -> Vec<T> {
        seq.iter().cloned().collect()
    }

    #[test]
    fn sequences_are_sendable() {
        fn send<S: Send>(_: S) {}
        send(LinkedSequence::<u32>::new());
    }

    #[test]
    fn new_sequence_is_empty() {
        let seq = LinkedSequence::<u32>::new();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        seq.assert_links();
    }

    #[test]
    fn front_on_empty_sequence_returns_err() {
        let seq = LinkedSequence::<u32>::new();
        assert_eq!(seq.front(), Err(SequenceError::EmptyContainer));
        assert_eq!(seq.back(), Err(SequenceError::EmptyContainer));
    }

    #[test]
    fn pop_on_empty_sequence_returns_err() {
        let mut seq = LinkedSequence::<u32>::new();
        assert_eq!(seq.pop_front(), Err(SequenceError::EmptyContainer));
        assert_eq!(seq.pop_back(), Err(SequenceError::EmptyContainer));
        assert!(seq.front_mut().is_err());
        assert!(seq.back_mut().is_err());
    }

    #[test]
    fn can_push_front() {
        let mut seq = LinkedSequence::new();
        seq.push_front(73);
        assert_eq!(seq.len(), 1);
        seq.push_front(42);
        assert_eq!(seq.len(), 2);
        assert_eq!(contents(&seq), vec![42, 73]);
        seq.assert_links();
    }

    #[test]
    fn can_push_back() {
        let mut seq = LinkedSequence::new();
        seq.push_back(73);
        assert_eq!(seq.len(), 1);
        seq.push_back(42);
        assert_eq!(seq.len(), 2);
        assert_eq!(contents(&seq), vec![73, 42]);
        seq.assert_links();
    }

    #[test]
    fn front_and_back_after_single_push_are_the_same_element() {
        let mut seq = LinkedSequence::new();
        seq.push_back(73);
        assert_eq!(seq.front(), Ok(&73));
        assert_eq!(seq.back(), Ok(&73));
    }

    #[test]
    fn front_mut_and_back_mut_write_through() {
        let mut seq = seq_of(&[1, 2, 3]);
        *seq.front_mut().expect("not empty") += 10;
        *seq.back_mut().expect("not empty") += 20;
        assert_eq!(contents(&seq), vec![11, 2, 23]);
    }

    #[test]
    fn popping_last_element_collapses_to_empty() {
        let mut seq = LinkedSequence::new();
        seq.push_back(73);
        assert_eq!(seq.pop_front(), Ok(73));
        assert!(seq.is_empty());
        seq.assert_links();

        seq.push_front(42);
        assert_eq!(seq.pop_back(), Ok(42));
        assert!(seq.is_empty());
        seq.assert_links();
    }

    #[test]
    fn smoke_test() {
        let mut seq = LinkedSequence::new();
        seq.push_back(73);
        seq.push_back(42);
        assert_eq!(seq.pop_front(), Ok(73));
        assert_eq!(seq.pop_front(), Ok(42));
        assert_eq!(seq.pop_front(), Err(SequenceError::EmptyContainer));

        seq.push_front(73);
        seq.push_front(42);
        assert_eq!(seq.pop_back(), Ok(73));
        assert_eq!(seq.pop_back(), Ok(42));
        assert_eq!(seq.pop_back(), Err(SequenceError::EmptyContainer));
        seq.assert_links();
    }

    #[test]
    fn fixed_walkthrough() {
        let mut seq = LinkedSequence::new();
        for i in [1, 10, 3, 8] {
            seq.push_back(i);
        }
        assert_eq!(contents(&seq), vec![1, 10, 3, 8]);
        assert_eq!(seq.len(), 4);

        seq.selection_sort();
        assert_eq!(contents(&seq), vec![1, 3, 8, 10]);

        seq.pop_front().expect("failed to pop_front");
        assert_eq!(contents(&seq), vec![3, 8, 10]);
        assert_eq!(seq.len(), 3);

        assert_eq!(seq.erase(1), Ok(8));
        assert_eq!(contents(&seq), vec![3, 10]);
        assert_eq!(seq.len(), 2);
        seq.assert_links();
    }

    #[test]
    fn empty_sequence_contract_violations() {
        let mut seq = LinkedSequence::new();
        assert_eq!(seq.front(), Err(SequenceError::EmptyContainer));
        assert_eq!(seq.pop_back(), Err(SequenceError::EmptyContainer));
        assert_eq!(
            seq.insert(1, 7),
            Err(SequenceError::IndexOutOfRange { index: 1, len: 0 })
        );
        assert!(seq.is_empty());

        seq.insert(0, 7).expect("index 0 is valid on an empty sequence");
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.front(), Ok(&7));
    }

    #[test]
    fn insert_then_erase_strings_in_the_middle() {
        let mut seq: LinkedSequence<String> = (0..10).map(|_| "old".to_string()).collect();
        seq.insert(5, "new".to_string()).expect("failed to insert");
        assert_eq!(seq.len(), 11);
        assert_eq!(seq.get(5).map(String::as_str), Some("new"));
        for (i, s) in seq.iter().enumerate() {
            if i != 5 {
                assert_eq!(s, "old");
            }
        }

        assert_eq!(seq.erase(5).as_deref(), Ok("new"));
        assert_eq!(seq.len(), 10);
        assert!(seq.iter().all(|s| s == "old"));
        seq.assert_links();
    }

    #[test]
    fn insert_at_len_appends() {
        let mut seq = seq_of(&[1, 2]);
        seq.insert(2, 3).expect("failed to insert");
        assert_eq!(contents(&seq), vec![1, 2, 3]);
        assert_eq!(seq.back(), Ok(&3));
        seq.assert_links();
    }

    #[test]
    fn insert_at_zero_prepends() {
        let mut seq = seq_of(&[1, 2]);
        seq.insert(0, 0).expect("failed to insert");
        assert_eq!(contents(&seq), vec![0, 1, 2]);
        assert_eq!(seq.front(), Ok(&0));
        seq.assert_links();
    }

    #[test]
    fn insert_past_len_does_not_mutate() {
        let mut seq = seq_of(&[1, 2]);
        assert_eq!(
            seq.insert(3, 9),
            Err(SequenceError::IndexOutOfRange { index: 3, len: 2 })
        );
        assert_eq!(contents(&seq), vec![1, 2]);
    }

    #[test]
    fn erase_at_len_is_out_of_range() {
        let mut seq = seq_of(&[1, 2]);
        assert_eq!(
            seq.erase(2),
            Err(SequenceError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(contents(&seq), vec![1, 2]);
    }

    #[test]
    fn erase_first_and_last() {
        let mut seq = seq_of(&[1, 2, 3, 4]);
        assert_eq!(seq.erase(0), Ok(1));
        assert_eq!(seq.erase(2), Ok(4));
        assert_eq!(contents(&seq), vec![2, 3]);
        seq.assert_links();
    }

    #[test]
    fn insert_then_erase_restores_every_position() {
        let original = seq_of(&[5, 6, 7, 8]);
        for i in 0..=original.len() {
            let mut seq = original.clone();
            seq.insert(i, 99).expect("failed to insert");
            assert_eq!(seq.get(i), Some(&99));
            assert_eq!(seq.erase(i), Ok(99));
            assert_eq!(seq, original);
            seq.assert_links();
        }
    }

    #[test]
    fn get_walks_to_index() {
        let mut seq = seq_of(&[10, 20, 30]);
        assert_eq!(seq.get(0), Some(&10));
        assert_eq!(seq.get(2), Some(&30));
        assert_eq!(seq.get(3), None);
        *seq.get_mut(1).expect("index in range") = 21;
        assert_eq!(contents(&seq), vec![10, 21, 30]);
        assert!(seq.get_mut(3).is_none());
    }

    #[test]
    fn clear_empties_and_sequence_stays_usable() {
        let mut seq = seq_of(&[1, 2, 3]);
        seq.clear();
        assert!(seq.is_empty());
        seq.assert_links();
        seq.push_back(4);
        assert_eq!(contents(&seq), vec![4]);
    }

    #[test]
    fn clone_is_deep() {
        let original = seq_of(&[1, 2, 3]);
        let mut copy = original.clone();
        for i in 0..original.len() {
            assert_eq!(copy.get(i), original.get(i));
        }

        copy.push_back(4);
        *copy.front_mut().expect("not empty") = 100;
        assert_eq!(contents(&original), vec![1, 2, 3]);
        assert_eq!(contents(&copy), vec![100, 2, 3, 4]);
        copy.assert_links();
    }

    #[test]
    fn clone_from_replaces_prior_contents() {
        let source = seq_of(&[7, 8]);
        let mut target = seq_of(&[1, 2, 3, 4]);
        target.clone_from(&source);
        assert_eq!(target, source);
        target.assert_links();
    }

    #[test]
    fn take_leaves_source_empty_and_usable() {
        let mut source = seq_of(&[1, 2, 3]);
        let moved = source.take();
        assert_eq!(contents(&moved), vec![1, 2, 3]);
        assert!(source.is_empty());
        assert_eq!(source.len(), 0);
        source.assert_links();

        source.push_back(9);
        assert_eq!(contents(&source), vec![9]);
    }

    #[test]
    fn self_move_assignment_keeps_contents() {
        let mut seq = seq_of(&[1, 2, 3]);
        seq = seq.take();
        assert_eq!(contents(&seq), vec![1, 2, 3]);
        seq.assert_links();
    }

    #[test]
    fn move_assignment_drops_prior_contents() {
        let mut target = seq_of(&["a".to_string(), "b".to_string()]);
        let mut source = seq_of(&["c".to_string()]);
        assert_eq!(target.len(), 2);
        target = source.take();
        assert_eq!(contents(&target), vec!["c".to_string()]);
        assert!(source.is_empty());
    }

    #[test]
    fn drop_releases_every_value_once() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        {
            let mut seq = LinkedSequence::new();
            for _ in 0..16 {
                seq.push_back(Rc::clone(&tracker));
            }
            seq.erase(8).expect("failed to erase");
            assert_eq!(Rc::strong_count(&tracker), 16);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn long_sequence_drops_without_recursion() {
        let seq: LinkedSequence<u32> = (0..200_000).collect();
        assert_eq!(seq.len(), 200_000);
        drop(seq);
    }

    #[test]
    fn selection_sort_empty_and_single() {
        let mut empty = LinkedSequence::<i32>::new();
        empty.selection_sort();
        assert!(empty.is_empty());

        let mut single = seq_of(&[5]);
        single.selection_sort();
        assert_eq!(contents(&single), vec![5]);
    }

    #[test]
    fn selection_sort_handles_duplicates_and_negatives() {
        let mut seq = seq_of(&[3, -1, 3, 0, -1000, 1000, 3]);
        seq.selection_sort();
        assert_eq!(contents(&seq), vec![-1000, -1, 0, 3, 3, 3, 1000]);
        seq.assert_links();
    }

    #[test]
    fn selection_sort_keeps_nodes_in_place() {
        let mut seq = seq_of(&[3, 1, 2]);
        let head = seq.head;
        let tail = seq.tail;
        seq.selection_sort();
        assert_eq!(seq.head, head);
        assert_eq!(seq.tail, tail);
        assert_eq!(contents(&seq), vec![1, 2, 3]);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut seq: LinkedSequence<u32> = (0..64).collect();
        seq.shuffle();
        assert_eq!(seq.len(), 64);
        let mut values = contents(&seq);
        values.sort();
        assert_eq!(values, (0..64).collect::<Vec<_>>());
        seq.assert_links();
    }

    #[test]
    fn shuffle_with_same_seed_is_deterministic() {
        let mut a: LinkedSequence<u32> = (0..32).collect();
        let mut b: LinkedSequence<u32> = (0..32).collect();
        a.shuffle_with(&mut StdRng::seed_from_u64(7));
        b.shuffle_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_of_tiny_sequences_is_a_no_op() {
        let mut empty = LinkedSequence::<u32>::new();
        empty.shuffle();
        assert!(empty.is_empty());

        let mut single = seq_of(&[1]);
        single.shuffle();
        assert_eq!(contents(&single), vec![1]);
    }

    #[test]
    fn shuffle_spreads_over_permutations() {
        use std::collections::HashMap;

        // 3! = 6 permutations, 6000 draws, ~1000 expected each
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts: HashMap<Vec<u32>, usize> = HashMap::new();
        for _ in 0..6000 {
            let mut seq = seq_of(&[1, 2, 3]);
            seq.shuffle_with(&mut rng);
            *counts.entry(contents(&seq)).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (perm, count) in counts {
            assert!(
                (800..1200).contains(&count),
                "permutation {:?} drawn {} times",
                perm,
                count
            );
        }
    }

    #[test]
    fn consecutive_shuffles_differ() {
        let original: LinkedSequence<u32> = (0..32).collect();
        let mut a = original.clone();
        let mut b = original.clone();
        a.shuffle();
        b.shuffle();
        // 32! permutations, a collision here means the seeding is broken
        assert_ne!(a, b);
    }

    #[test]
    fn debug_lists_values() {
        let seq = seq_of(&[1, 2]);
        assert_eq!(format!("{:?}", seq), "[1, 2]");
    }

    #[test]
    fn error_messages() {
        assert_eq!(SequenceError::EmptyContainer.to_string(), "sequence is empty");
        assert_eq!(
            SequenceError::IndexOutOfRange { index: 4, len: 2 }.to_string(),
            "index 4 is out of range for a sequence of length 2"
        );
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::prelude::*;
    use proptest::sample::Index;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn sequence_state_machine_test(
            sequential
            1..200
            =>
            LinkedSequence<u32>
        );
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        PushFront(u32),
        PopFront,
        PushBack(u32),
        PopBack,
        Insert(Index, u32),
        InsertPastEnd(u32),
        Erase(Index),
        Clear,
        Sort,
        Shuffle(u64),
    }

    pub struct SequenceStateMachine;

    /// the same backward Fisher-Yates pass, on a contiguous slice
    fn reference_shuffle(values: &mut [u32], seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for i in (1..values.len()).rev() {
            let j = rng.gen_range(0..=i);
            values.swap(i, j);
        }
    }

    impl ReferenceStateMachine for SequenceStateMachine {
        type State = VecDeque<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(VecDeque::new()).boxed()
        }

        fn transitions(_state: &Self::State) -> BoxedStrategy<Self::Transition> {
            prop_oneof![
                2 => any::<u32>().prop_map(Transition::PushFront),
                1 => Just(Transition::PopFront),
                2 => any::<u32>().prop_map(Transition::PushBack),
                1 => Just(Transition::PopBack),
                2 => (any::<Index>(), any::<u32>()).prop_map(|(i, v)| Transition::Insert(i, v)),
                1 => any::<u32>().prop_map(Transition::InsertPastEnd),
                2 => any::<Index>().prop_map(Transition::Erase),
                1 => Just(Transition::Clear),
                1 => Just(Transition::Sort),
                1 => any::<u64>().prop_map(Transition::Shuffle),
            ]
            .boxed()
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::PushFront(value) => state.push_front(*value),
                Transition::PopFront => {
                    state.pop_front();
                }
                Transition::PushBack(value) => state.push_back(*value),
                Transition::PopBack => {
                    state.pop_back();
                }
                Transition::Insert(index, value) => {
                    let at = index.index(state.len() + 1);
                    state.insert(at, *value);
                }
                Transition::InsertPastEnd(_) => {}
                Transition::Erase(index) => {
                    if !state.is_empty() {
                        let at = index.index(state.len());
                        state.remove(at);
                    }
                }
                Transition::Clear => state.clear(),
                Transition::Sort => state.make_contiguous().sort(),
                Transition::Shuffle(seed) => reference_shuffle(state.make_contiguous(), *seed),
            }
            state
        }
    }

    impl StateMachineTest for LinkedSequence<u32> {
        type SystemUnderTest = Self;
        type Reference = SequenceStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::PushFront(value) => state.push_front(value),
                Transition::PopFront => {
                    let was_empty = state.is_empty();
                    assert_eq!(state.pop_front().is_err(), was_empty);
                }
                Transition::PushBack(value) => state.push_back(value),
                Transition::PopBack => {
                    let was_empty = state.is_empty();
                    assert_eq!(state.pop_back().is_err(), was_empty);
                }
                Transition::Insert(index, value) => {
                    let at = index.index(state.len() + 1);
                    state.insert(at, value).expect("index within [0, len]");
                }
                Transition::InsertPastEnd(value) => {
                    let len = state.len();
                    assert_eq!(
                        state.insert(len + 1, value),
                        Err(SequenceError::IndexOutOfRange {
                            index: len + 1,
                            len
                        })
                    );
                }
                Transition::Erase(index) => {
                    if state.is_empty() {
                        assert_eq!(
                            state.erase(0),
                            Err(SequenceError::IndexOutOfRange { index: 0, len: 0 })
                        );
                    } else {
                        let at = index.index(state.len());
                        state.erase(at).expect("index within [0, len)");
                    }
                }
                Transition::Clear => state.clear(),
                Transition::Sort => state.selection_sort(),
                Transition::Shuffle(seed) => state.shuffle_with(&mut StdRng::seed_from_u64(seed)),
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            state.assert_links();
            assert_eq!(state.len(), ref_state.len());
            assert!(state.iter().eq(ref_state.iter()));
            assert!(state.iter().rev().eq(ref_state.iter().rev()));
        }
    }

    proptest! {
        #[test]
        fn selection_sort_matches_reference_sort(values in proptest::collection::vec(-1000i32..=1000, 0..128)) {
            let mut seq: LinkedSequence<i32> = values.iter().copied().collect();
            let mut snapshot: Vec<i32> = seq.iter().copied().collect();
            snapshot.sort();
            seq.selection_sort();
            prop_assert!(seq.iter().eq(snapshot.iter()));
        }

        #[test]
        fn shuffle_preserves_values(values in proptest::collection::vec(any::<u16>(), 0..128), seed in any::<u64>()) {
            let mut seq: LinkedSequence<u16> = values.iter().copied().collect();
            seq.shuffle_with(&mut StdRng::seed_from_u64(seed));
            let mut shuffled: Vec<u16> = seq.into_iter().collect();
            let mut expected = values.clone();
            shuffled.sort();
            expected.sort();
            prop_assert_eq!(shuffled, expected);
        }
    }
}
