use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::mem;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slab::Slab;
use tracing::{debug, trace};

use crate::config::Config;
use crate::cursor::{Cursor, CursorMut};
use crate::error::ConfigError;
use crate::level::LevelGenerator;

/// Key of a node inside the list's slab.
pub(crate) type NodeId = usize;

pub(crate) const HEAD: NodeId = 0;
pub(crate) const TAIL: NodeId = 1;

struct SkipNode<K, V> {
    /// `None` only for the two sentinels.
    entry: Option<(K, V)>,
    /// One forward link per level, `next.len()` is the node height.
    next: Vec<NodeId>,
    /// Level-0 predecessor.
    prev: NodeId,
}

impl<K, V> SkipNode<K, V> {
    fn sentinel(max_level: usize) -> Self {
        Self {
            entry: None,
            next: vec![TAIL; max_level],
            prev: HEAD,
        }
    }

    fn into_entry(self) -> (K, V) {
        match self.entry {
            Some(entry) => entry,
            None => unreachable!("sentinels are never released"),
        }
    }
}

/// An ordered map built on a probabilistic multi-level linked list.
///
/// Every node sits on level 0, a doubly linked chain in key order. A node of
/// height `h` additionally sits on levels `1..h`, each a sparser subsequence
/// of the one below. Lookups descend from the highest active level and skip
/// ahead, giving O(log n) expected search, insert and remove.
///
/// ```text
/// 2: HEAD ───────────────► 30 ─────────► TAIL
/// 1: HEAD ──► 10 ────────► 30 ──► 40 ──► TAIL
/// 0: HEAD ◄─► 10 ◄─► 20 ◄─► 30 ◄─► 40 ◄─► TAIL
/// ```
///
/// Nodes live in a slab and link to each other by key. Node heights
/// are drawn from the injected random source `R`.
///
/// ```
/// use skiplist::SkipList;
///
/// let mut list = SkipList::new();
/// for k in [5, 1, 3, 2, 4] {
///     list.insert(k, k * 10);
/// }
/// assert_eq!(list.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
/// assert_eq!(list.remove(&3), Some(30));
/// assert_eq!(*list.get_or_insert_default(10), 0);
/// assert_eq!(list.len(), 5);
/// ```
pub struct SkipList<K, V, R = StdRng> {
    nodes: Slab<SkipNode<K, V>>,
    /// Highest level holding at least one node, 1 when empty.
    level: usize,
    len: usize,
    levels: LevelGenerator<R>,
}

impl<K, V> SkipList<K, V, StdRng> {
    /// Creates an empty list with the default [`Config`] and an entropy-seeded
    /// generator.
    pub fn new() -> Self {
        Self::from_parts(Config::default(), StdRng::from_entropy())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<K, V> Default for SkipList<K, V, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R: Rng> SkipList<K, V, R> {
    /// Creates an empty list drawing node heights from `rng`.
    ///
    /// A seeded generator makes the shape of the list reproducible.
    pub fn with_rng(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(config: Config, rng: R) -> Self {
        debug!(
            max_level = config.max_level,
            skip_probability = config.skip_probability,
            "creating skip list"
        );
        let mut nodes = Slab::new();
        let head = nodes.insert(SkipNode::sentinel(config.max_level));
        let tail = nodes.insert(SkipNode::sentinel(config.max_level));
        debug_assert_eq!((head, tail), (HEAD, TAIL));
        Self {
            nodes,
            level: 1,
            len: 0,
            levels: LevelGenerator::new(config.max_level, config.skip_probability, rng),
        }
    }
}

impl<K, V, R> SkipList<K, V, R> {
    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of active levels: the height of the tallest node, or 1
    /// when empty.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn config(&self) -> Config {
        Config::new(self.levels.max_level(), self.levels.skip_probability())
    }

    /// Drops every entry. Configuration and random source are kept.
    pub fn clear(&mut self) {
        debug!(len = self.len, "clearing skip list");
        self.nodes.retain(|id, _| id == HEAD || id == TAIL);
        self.node_mut(HEAD).next.fill(TAIL);
        self.node_mut(TAIL).prev = HEAD;
        self.level = 1;
        self.len = 0;
    }

    /// Cursor on the smallest entry, or the end cursor when empty.
    pub fn begin(&self) -> Cursor<'_, K, V, R> {
        Cursor::new(self, self.real(self.node(HEAD).next[0]))
    }

    /// The end cursor. Stepping past either end of the list lands here.
    pub fn end(&self) -> Cursor<'_, K, V, R> {
        Cursor::new(self, None)
    }

    /// Cursor on the largest entry, or the end cursor when empty.
    pub fn cursor_back(&self) -> Cursor<'_, K, V, R> {
        Cursor::new(self, self.real(self.node(TAIL).prev))
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V, R> {
        let first = self.real(self.node(HEAD).next[0]);
        CursorMut::new(self, first)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.real(self.node(HEAD).next[0]).map(|id| self.entry(id))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.real(self.node(TAIL).prev).map(|id| self.entry(id))
    }

    pub fn iter(&self) -> Iter<'_, K, V, R> {
        Iter {
            list: self,
            front: self.node(HEAD).next[0],
            back: self.node(TAIL).prev,
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, R> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, R> {
        Values { inner: self.iter() }
    }

    /// Removes the smallest entry. Every level it sits on starts at head, so
    /// no search is needed.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.real(self.node(HEAD).next[0])?;
        let prevs = vec![HEAD; self.node(id).next.len()];
        Some(self.unlink(id, &prevs))
    }

    // ------------------------------------------------------------------
    // slab

    #[inline]
    fn node(&self, id: NodeId) -> &SkipNode<K, V> {
        &self.nodes[id]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut SkipNode<K, V> {
        &mut self.nodes[id]
    }

    // ------------------------------------------------------------------
    // node access, used by cursors

    /// Maps the sentinels to `None`.
    #[inline]
    pub(crate) fn real(&self, id: NodeId) -> Option<NodeId> {
        if id == HEAD || id == TAIL {
            None
        } else {
            Some(id)
        }
    }

    pub(crate) fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.real(self.node(id).next[0])
    }

    pub(crate) fn prev_of(&self, id: NodeId) -> Option<NodeId> {
        self.real(self.node(id).prev)
    }

    pub(crate) fn height_of(&self, id: NodeId) -> usize {
        self.node(id).next.len()
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        match &self.node(id).entry {
            Some((key, value)) => (key, value),
            None => unreachable!("sentinel {} has no entry", id),
        }
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> (&K, &mut V) {
        match &mut self.node_mut(id).entry {
            Some((key, value)) => (&*key, value),
            None => unreachable!("sentinel {} has no entry", id),
        }
    }

    // ------------------------------------------------------------------
    // structure

    /// Splices `id` out of every level it owns. `prevs[l]` must be its
    /// predecessor on level `l` for each of those levels.
    fn unlink(&mut self, id: NodeId, prevs: &[NodeId]) -> (K, V) {
        let node = self.nodes.remove(id);
        for (l, &next) in node.next.iter().enumerate() {
            self.node_mut(prevs[l]).next[l] = next;
        }
        self.node_mut(node.next[0]).prev = node.prev;
        self.len -= 1;
        self.shrink_level();
        trace!(height = node.next.len(), len = self.len, "removed node");
        node.into_entry()
    }

    fn shrink_level(&mut self) {
        let before = self.level;
        while self.level > 1 && self.node(HEAD).next[self.level - 1] == TAIL {
            self.level -= 1;
        }
        if self.level != before {
            debug!(from = before, to = self.level, "lowered active level");
        }
    }
}

impl<K: Ord, V, R> SkipList<K, V, R> {
    #[inline]
    fn is_before<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match &self.node(id).entry {
            Some((k, _)) => <K as Borrow<Q>>::borrow(k) < key,
            None => false,
        }
    }

    #[inline]
    fn matches<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match &self.node(id).entry {
            Some((k, _)) => <K as Borrow<Q>>::borrow(k) == key,
            None => false,
        }
    }

    /// For each active level, the last node whose key is below `key` (head if
    /// none). One sweep from the top, never restarting from head.
    pub(crate) fn predecessors<Q>(&self, key: &Q) -> Vec<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut prevs = vec![HEAD; self.level];
        let mut prev = HEAD;
        for l in (0..self.level).rev() {
            let mut curr = self.node(prev).next[l];
            while self.is_before(curr, key) {
                prev = curr;
                curr = self.node(curr).next[l];
            }
            prevs[l] = prev;
        }
        prevs
    }

    fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut prev = HEAD;
        for l in (0..self.level).rev() {
            let mut curr = self.node(prev).next[l];
            while self.is_before(curr, key) {
                prev = curr;
                curr = self.node(curr).next[l];
            }
        }
        let curr = self.node(prev).next[0];
        if self.matches(curr, key) {
            Some(curr)
        } else {
            None
        }
    }

    /// Cursor on the entry for `key`, or the end cursor when absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V, R>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.find_node(key))
    }

    /// Mutable cursor on the entry for `key`, or the end cursor when absent.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, R>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.find_node(key);
        CursorMut::new(self, found)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| self.entry(id).1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(self.entry_mut(id).1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let prevs = self.predecessors(key);
        let id = self.node(prevs[0]).next[0];
        if !self.matches(id, key) {
            return None;
        }
        let (_, value) = self.unlink(id, &prevs);
        Some(value)
    }

    /// Removes a live node, locating its predecessors through its own key.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let prevs = self.predecessors(self.entry(id).0);
        self.unlink(id, &prevs)
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.real(self.node(TAIL).prev)?;
        Some(self.remove_node(id))
    }
}

impl<K: Ord, V, R: Rng> SkipList<K, V, R> {
    /// Inserts `key`, or overwrites its value in place if already present.
    ///
    /// Returns the previous value on overwrite. Keys are never duplicated.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prevs = self.predecessors(&key);
        let next = self.node(prevs[0]).next[0];
        if self.matches(next, &key) {
            trace!("updated value in place");
            return Some(mem::replace(self.entry_mut(next).1, value));
        }
        self.link(key, value, prevs);
        None
    }

    /// Returns the value for `key`, inserting `f()` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let prevs = self.predecessors(&key);
        let next = self.node(prevs[0]).next[0];
        let id = if self.matches(next, &key) {
            next
        } else {
            self.link(key, f(), prevs)
        };
        self.entry_mut(id).1
    }

    /// Returns the value for `key`, inserting `V::default()` first if absent.
    ///
    /// Note this mutates the list on what reads like a lookup.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Allocates a node of fresh random height and splices it after `prevs`.
    fn link(&mut self, key: K, value: V, mut prevs: Vec<NodeId>) -> NodeId {
        let height = self.levels.random_level();
        if height > self.level {
            debug!(from = self.level, to = height, "raised active level");
            prevs.resize(height, HEAD);
            self.level = height;
        }
        let id = self.nodes.insert(SkipNode {
            entry: Some((key, value)),
            next: vec![TAIL; height],
            prev: prevs[0],
        });
        for (l, &prev) in prevs.iter().enumerate().take(height) {
            let next = self.node(prev).next[l];
            self.node_mut(id).next[l] = next;
            self.node_mut(prev).next[l] = id;
        }
        // tail is a node too, so the last-position case needs no branch
        let next = self.node(id).next[0];
        self.node_mut(next).prev = id;
        self.len += 1;
        trace!(height, len = self.len, "inserted node");
        id
    }
}

impl<K, V, R> Debug for SkipList<K, V, R>
where
    K: Debug,
{
    /// One line per active level, top first: `2: 30`, `1: 10 30 40`, ...
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for l in (0..self.level).rev() {
            write!(f, "{}:", l)?;
            let mut curr = self.node(HEAD).next[l];
            while curr != TAIL {
                write!(f, " {:?}", self.entry(curr).0)?;
                curr = self.node(curr).next[l];
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V, StdRng> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<K: Ord, V, R: Rng> Extend<(K, V)> for SkipList<K, V, R> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Borrowing iterator in ascending key order, see [`SkipList::iter`].
pub struct Iter<'a, K, V, R> {
    list: &'a SkipList<K, V, R>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, K, V, R> Iterator for Iter<'a, K, V, R> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.list.node(id).next[0];
        self.remaining -= 1;
        Some(self.list.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, R> DoubleEndedIterator for Iter<'_, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back;
        self.back = self.list.node(id).prev;
        self.remaining -= 1;
        Some(self.list.entry(id))
    }
}

impl<K, V, R> ExactSizeIterator for Iter<'_, K, V, R> {}
impl<K, V, R> FusedIterator for Iter<'_, K, V, R> {}

pub struct Keys<'a, K, V, R> {
    inner: Iter<'a, K, V, R>,
}

impl<'a, K, V, R> Iterator for Keys<'a, K, V, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R> DoubleEndedIterator for Keys<'_, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, R> ExactSizeIterator for Keys<'_, K, V, R> {}
impl<K, V, R> FusedIterator for Keys<'_, K, V, R> {}

pub struct Values<'a, K, V, R> {
    inner: Iter<'a, K, V, R>,
}

impl<'a, K, V, R> Iterator for Values<'a, K, V, R> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R> DoubleEndedIterator for Values<'_, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, R> ExactSizeIterator for Values<'_, K, V, R> {}
impl<K, V, R> FusedIterator for Values<'_, K, V, R> {}

/// Owning iterator in ascending key order.
pub struct IntoIter<K, V, R> {
    list: SkipList<K, V, R>,
}

impl<K, V, R> Iterator for IntoIter<K, V, R> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<K: Ord, V, R> DoubleEndedIterator for IntoIter<K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_last()
    }
}

impl<K, V, R> ExactSizeIterator for IntoIter<K, V, R> {}

impl<'a, K, V, R> IntoIterator for &'a SkipList<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, R> IntoIterator for SkipList<K, V, R> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
