//! Cursors over the level-0 chain of a [`SkipList`].
//!
//! A cursor points at one entry or at the end position, which sits past both
//! ends of the list. Stepping off either end lands on the end position and
//! stepping from there stays put.
//!
//! ```
//! use skiplist::SkipList;
//!
//! let list: SkipList<u32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
//! let mut cursor = list.begin();
//! cursor.advance(2);
//! assert_eq!(cursor.key(), Some(&3));
//! cursor.move_prev();
//! assert_eq!(*cursor, "b");
//! cursor.advance(5);
//! assert!(cursor == list.end());
//! ```

use std::fmt::{self, Debug};
use std::ops::Deref;
use std::ptr;

use crate::skiplist::{NodeId, SkipList};

/// Read-only cursor, see [`SkipList::begin`] and [`SkipList::find`].
///
/// Two cursors are equal when they sit on the same node of the same list.
pub struct Cursor<'a, K, V, R> {
    list: &'a SkipList<K, V, R>,
    node: Option<NodeId>,
}

impl<'a, K, V, R> Cursor<'a, K, V, R> {
    pub(crate) fn new(list: &'a SkipList<K, V, R>, node: Option<NodeId>) -> Self {
        Self { list, node }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, v)| v)
    }

    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let list = self.list;
        self.node.map(|id| list.entry(id))
    }

    /// Number of levels the current node sits on.
    pub fn height(&self) -> Option<usize> {
        self.node.map(|id| self.list.height_of(id))
    }

    pub fn move_next(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.next_of(id);
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.prev_of(id);
        }
    }

    /// Steps forward `n` times, stopping at the end position.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.node.is_none() {
                break;
            }
            self.move_next();
        }
    }

    /// Steps backward `n` times, stopping at the end position.
    pub fn retreat(&mut self, n: usize) {
        for _ in 0..n {
            if self.node.is_none() {
                break;
            }
            self.move_prev();
        }
    }
}

impl<K, V, R> Clone for Cursor<'_, K, V, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, R> Copy for Cursor<'_, K, V, R> {}

impl<K, V, R> PartialEq for Cursor<'_, K, V, R> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.node == other.node
    }
}

impl<K, V, R> Eq for Cursor<'_, K, V, R> {}

impl<K, V, R> Deref for Cursor<'_, K, V, R> {
    type Target = V;

    /// # Panics
    ///
    /// Panics on the end cursor. Use [`Cursor::value`] when the position is
    /// not known to hold an entry.
    fn deref(&self) -> &V {
        match self.value() {
            Some(value) => value,
            None => panic!("dereferenced the end cursor"),
        }
    }
}

impl<K: Debug, V: Debug, R> Debug for Cursor<'_, K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("entry", &self.entry())
            .finish()
    }
}

/// Cursor holding the list exclusively, able to edit values and remove the
/// current entry. See [`SkipList::find_mut`] and [`SkipList::begin_mut`].
pub struct CursorMut<'a, K, V, R> {
    list: &'a mut SkipList<K, V, R>,
    node: Option<NodeId>,
}

impl<'a, K, V, R> CursorMut<'a, K, V, R> {
    pub(crate) fn new(list: &'a mut SkipList<K, V, R>, node: Option<NodeId>) -> Self {
        Self { list, node }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn key(&self) -> Option<&K> {
        self.node.map(|id| self.list.entry(id).0)
    }

    pub fn value(&self) -> Option<&V> {
        self.node.map(|id| self.list.entry(id).1)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        let id = self.node?;
        Some(self.list.entry_mut(id).1)
    }

    /// Borrows a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, R> {
        Cursor::new(&*self.list, self.node)
    }

    pub fn move_next(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.next_of(id);
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.prev_of(id);
        }
    }

    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.node.is_none() {
                break;
            }
            self.move_next();
        }
    }

    pub fn retreat(&mut self, n: usize) {
        for _ in 0..n {
            if self.node.is_none() {
                break;
            }
            self.move_prev();
        }
    }
}

impl<K: Ord, V, R> CursorMut<'_, K, V, R> {
    /// Removes the current entry, as `remove` with its key would, and consumes
    /// the cursor. Returns `None` at the end position.
    pub fn remove_current(self) -> Option<(K, V)> {
        let id = self.node?;
        Some(self.list.remove_node(id))
    }
}
