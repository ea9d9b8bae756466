pub mod iter;
pub mod linked_list;

pub use iter::{Cursor, CursorMut, IntoIter, Iter, IterMut};
pub use linked_list::{LinkedSequence, SequenceError, SequenceResult};
