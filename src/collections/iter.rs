use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::linked_list::{LinkedSequence, Node};

/// borrowing iterator over a `LinkedSequence`, head to tail
pub struct Iter<'a, T> {
    head: *mut Node<T>,
    tail: *mut Node<T>,
    remaining: usize,
    marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(seq: &'a LinkedSequence<T>) -> Self {
        Self {
            head: seq.head,
            tail: seq.tail,
            remaining: seq.len,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: `remaining` counts the live nodes between `head` and `tail`
        // inclusive, so `head` is live. the shared borrow of the sequence
        // keeps it alive for 'a
        unsafe {
            let node = &*self.head;
            self.head = node.next;
            self.remaining -= 1;
            Some(&node.data)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: see `next`
        unsafe {
            let node = &*self.tail;
            self.tail = node.prev;
            self.remaining -= 1;
            Some(&node.data)
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
            marker: PhantomData,
        }
    }
}

/// mutably borrowing iterator over a `LinkedSequence`, head to tail
pub struct IterMut<'a, T> {
    head: *mut Node<T>,
    tail: *mut Node<T>,
    remaining: usize,
    marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(seq: &'a mut LinkedSequence<T>) -> Self {
        Self {
            head: seq.head,
            tail: seq.tail,
            remaining: seq.len,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: each node is yielded at most once from either end, so the
        // returned mutable borrows never alias
        unsafe {
            let node = self.head;
            self.head = (*node).next;
            self.remaining -= 1;
            Some(&mut (*node).data)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: see `next`
        unsafe {
            let node = self.tail;
            self.tail = (*node).prev;
            self.remaining -= 1;
            Some(&mut (*node).data)
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// owning iterator, pops values off the sequence it consumed
pub struct IntoIter<T> {
    seq: LinkedSequence<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(seq: LinkedSequence<T>) -> Self {
        Self { seq }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.seq.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.seq.len(), Some(self.seq.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.seq.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

/// a read-only traversal position: either a node of the sequence or the
/// past-the-end position, which closes both the forward and the backward walk.
///
/// moving off the end position is a caller error. it trips a debug assertion
/// and otherwise leaves the cursor on the end.
pub struct Cursor<'a, T> {
    _seq: &'a LinkedSequence<T>,
    curr: *mut Node<T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(seq: &'a LinkedSequence<T>, curr: *mut Node<T>) -> Self {
        Self { _seq: seq, curr }
    }

    /// the value under the cursor, None on the end position
    pub fn current(&self) -> Option<&'a T> {
        if self.curr.is_null() {
            return None;
        }
        // SAFETY: non-null positions always point at a live node, the shared
        // borrow of the sequence prevents structural changes for 'a
        Some(unsafe { &(*self.curr).data })
    }

    pub fn is_end(&self) -> bool {
        self.curr.is_null()
    }

    /// move toward the tail. stepping forward from the tail lands on the end
    pub fn move_next(&mut self) {
        debug_assert!(!self.curr.is_null(), "cursor advanced from the end position");
        if !self.curr.is_null() {
            // SAFETY: checked non-null above
            self.curr = unsafe { (*self.curr).next };
        }
    }

    /// move toward the head. stepping back from the head lands on the end
    pub fn move_prev(&mut self) {
        debug_assert!(!self.curr.is_null(), "cursor retreated from the end position");
        if !self.curr.is_null() {
            // SAFETY: checked non-null above
            self.curr = unsafe { (*self.curr).prev };
        }
    }

    /// peek at the value after the cursor without moving
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut next = *self;
        if next.is_end() {
            return None;
        }
        next.move_next();
        next.current()
    }

    /// peek at the value before the cursor without moving
    pub fn peek_prev(&self) -> Option<&'a T> {
        let mut prev = *self;
        if prev.is_end() {
            return None;
        }
        prev.move_prev();
        prev.current()
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.curr, other.curr)
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.current()).finish()
    }
}

/// a traversal position that can write through to the value under it and
/// splice values in or out around it
pub struct CursorMut<'a, T> {
    seq: &'a mut LinkedSequence<T>,
    curr: *mut Node<T>,
}

impl<'a, T> CursorMut<'a, T> {
    pub(super) fn new(seq: &'a mut LinkedSequence<T>, curr: *mut Node<T>) -> Self {
        Self { seq, curr }
    }

    /// mutably borrow the value under the cursor, None on the end position
    pub fn current(&mut self) -> Option<&mut T> {
        if self.curr.is_null() {
            return None;
        }
        // SAFETY: non-null positions always point at a live node and we hold
        // the only borrow of the sequence
        Some(unsafe { &mut (*self.curr).data })
    }

    pub fn is_end(&self) -> bool {
        self.curr.is_null()
    }

    pub fn move_next(&mut self) {
        debug_assert!(!self.curr.is_null(), "cursor advanced from the end position");
        if !self.curr.is_null() {
            // SAFETY: checked non-null above
            self.curr = unsafe { (*self.curr).next };
        }
    }

    pub fn move_prev(&mut self) {
        debug_assert!(!self.curr.is_null(), "cursor retreated from the end position");
        if !self.curr.is_null() {
            // SAFETY: checked non-null above
            self.curr = unsafe { (*self.curr).prev };
        }
    }

    /// a read-only view of the same position, for comparisons
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&*self.seq, self.curr)
    }

    /// if the cursor is on the end position, do nothing
    ///
    /// otherwise unlink the current node, advance the cursor to its
    /// successor and return the removed value
    pub fn remove_current(&mut self) -> Option<T> {
        if self.curr.is_null() {
            return None;
        }

        let node = self.curr;
        // SAFETY: `node` is a live node of `seq`. we read its successor before
        // it is freed and never touch it again
        unsafe {
            self.curr = (*node).next;
            Some(self.seq.unlink_node(node))
        }
    }

    /// insert `value` in front of the current node. on the end position this
    /// appends. the cursor does not move
    pub fn insert_before(&mut self, value: T) {
        if self.curr.is_null() {
            self.seq.push_back(value);
        } else {
            // SAFETY: `curr` is a live node of `seq`
            unsafe { self.seq.link_before(self.curr, value) };
        }
    }

    /// insert `value` after the current node. on the end position this
    /// prepends. the cursor does not move
    pub fn insert_after(&mut self, value: T) {
        if self.curr.is_null() {
            self.seq.push_front(value);
        } else {
            // SAFETY: `curr` is a live node of `seq`
            unsafe { self.seq.link_after(self.curr, value) };
        }
    }
}



// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;

    use super::*;

    #[derive(Arbitrary, Clone, Debug)]
    enum CursorOp {
        Next,
        Prev,
        Write(u32),
        Remove,
        InsertBefore(u32),
        InsertAfter(u32),
    }

    proptest! {
        #[test]
        fn cursor_walk_matches_vec_model(
            initial in vec(any::<u32>(), 0..32),
            ops in vec(any::<CursorOp>(), 0..256),
        ) {
            let mut reference = initial.clone();
            let mut pos = if reference.is_empty() { None } else { Some(0) };
            let mut seq: LinkedSequence<u32> = initial.into_iter().collect();

            {
                let mut cursor = seq.cursor_front_mut();
                for op in ops.iter() {
                    match (op, pos) {
                        // stepping off the end position is out of contract
                        (CursorOp::Next, None) | (CursorOp::Prev, None) => continue,
                        (CursorOp::Next, Some(i)) => {
                            cursor.move_next();
                            pos = if i + 1 < reference.len() { Some(i + 1) } else { None };
                        }
                        (CursorOp::Prev, Some(i)) => {
                            cursor.move_prev();
                            pos = i.checked_sub(1);
                        }
                        (CursorOp::Write(v), Some(i)) => {
                            *cursor.current().expect("cursor on a node") = *v;
                            reference[i] = *v;
                        }
                        (CursorOp::Write(_), None) => {
                            prop_assert!(cursor.current().is_none());
                        }
                        (CursorOp::Remove, Some(i)) => {
                            prop_assert_eq!(cursor.remove_current(), Some(reference.remove(i)));
                            pos = if i < reference.len() { Some(i) } else { None };
                        }
                        (CursorOp::Remove, None) => {
                            prop_assert_eq!(cursor.remove_current(), None);
                        }
                        (CursorOp::InsertBefore(v), Some(i)) => {
                            cursor.insert_before(*v);
                            reference.insert(i, *v);
                            pos = Some(i + 1);
                        }
                        (CursorOp::InsertBefore(v), None) => {
                            cursor.insert_before(*v);
                            reference.push(*v);
                        }
                        (CursorOp::InsertAfter(v), Some(i)) => {
                            cursor.insert_after(*v);
                            reference.insert(i + 1, *v);
                        }
                        (CursorOp::InsertAfter(v), None) => {
                            cursor.insert_after(*v);
                            reference.insert(0, *v);
                        }
                    }
                    prop_assert_eq!(cursor.current().copied(), pos.map(|i| reference[i]));
                }
            }

            seq.assert_links();
            prop_assert!(seq.iter().eq(reference.iter()));
        }
    }
}
