//! A doubly-linked list with first-class cursor iterators.
//!
//! Cursors ([`Cursor`]) are movable pointers into the list. A node whose
//! value is removed while cursors still reference it becomes a tombstone:
//! it stays linked (so those cursors remain valid, and skip it on
//! traversal) until the last cursor leaves, at which point it is
//! unlinked. Lists may be created with no lock, a private lock, or a
//! shared [`ListLock`]; operations spanning two lists acquire both locks
//! in ascending address order.

mod cursor;
mod node;

pub use cursor::{Cursor, Direction};
pub use node::{ListLock, LockMode};

use std::sync::Arc;

use parking_lot::Mutex;

use crate::ListError;
use node::{
    link_before, nodes_value_equal, remove_data_node, with_lock, with_two_locks, ListInner,
    ListState, Node, NodeKind,
};

pub struct LinkedList<T> {
    pub(crate) inner: Arc<ListInner<T>>,
}

impl<T> LinkedList<T> {
    /// An empty, unlocked list.
    pub fn new() -> LinkedList<T> {
        LinkedList::with_lock(LockMode::None)
    }

    pub fn with_lock(mode: LockMode) -> LinkedList<T> {
        let (lock, private) = match mode {
            LockMode::None | LockMode::Inherit => (None, false),
            LockMode::Private => (Some(ListLock::new()), true),
            LockMode::Shared(lock) => (Some(lock), false),
        };
        let inner = Arc::new_cyclic(|weak| {
            let head = Node::new(NodeKind::Head, None, weak.clone());
            let tail = Node::new(NodeKind::Tail, None, weak.clone());
            head.set_next(Some(Arc::clone(&tail)));
            tail.set_prev(Some(&head));
            ListInner {
                head,
                tail,
                state: Mutex::new(ListState {
                    length: 0,
                    lock,
                    private,
                }),
            }
        });
        LinkedList { inner }
    }

    /// The lock handle currently guarding this list, if any.
    pub fn lock_handle(&self) -> Option<ListLock> {
        self.inner.current_lock()
    }

    pub fn len(&self) -> usize {
        let lock = self.inner.current_lock();
        with_lock(lock.as_ref(), || self.inner.length())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let lock = self.inner.current_lock();
        with_lock(lock.as_ref(), f)
    }

    /// All data nodes in forward order. Callers hold the lock.
    fn data_nodes(&self) -> Vec<Arc<Node<T>>> {
        let mut nodes = Vec::with_capacity(self.inner.length());
        let mut cursor = self.inner.head.next();
        while let Some(node) = cursor {
            if Arc::ptr_eq(&node, &self.inner.tail) {
                break;
            }
            if node.is_data() {
                nodes.push(Arc::clone(&node));
            }
            cursor = node.next();
        }
        nodes
    }

    /// The node at a (possibly negative) data index. Index -1 resolves
    /// to HEAD and `length` to TAIL, to support slicing and insertion at
    /// the ends. Tombstones are invisible to indexing.
    fn node_at(&self, index: isize, clamp: bool) -> Result<Arc<Node<T>>, ListError> {
        let length = self.inner.length() as isize;
        let mut index = index;
        if index < 0 {
            index += length;
        }
        if !(-1..=length).contains(&index) {
            if !clamp {
                return Err(ListError::UndefinedIndex);
            }
            index = index.clamp(-1, length);
        }
        if index == -1 {
            return Ok(Arc::clone(&self.inner.head));
        }
        if index == length {
            return Ok(Arc::clone(&self.inner.tail));
        }

        if index > length / 2 {
            // Closer to the tail; walk backwards.
            let mut node = Arc::clone(&self.inner.tail);
            let mut remaining = length - index;
            while remaining > 0 {
                node = node.prev().ok_or(ListError::UndefinedIndex)?;
                if node.is_data() {
                    remaining -= 1;
                }
            }
            Ok(node)
        } else {
            let mut node = Arc::clone(&self.inner.head);
            let mut remaining = index + 1;
            while remaining > 0 {
                node = node.next().ok_or(ListError::UndefinedIndex)?;
                if node.is_data() {
                    remaining -= 1;
                }
            }
            Ok(node)
        }
    }

    pub fn append(&self, value: T) {
        self.locked(|| {
            link_before(&self.inner.tail, Some(value), NodeKind::Data);
        })
    }

    pub fn prepend(&self, value: T) {
        self.locked(|| {
            let first = self
                .inner
                .head
                .next()
                .unwrap_or_else(|| Arc::clone(&self.inner.tail));
            link_before(&first, Some(value), NodeKind::Data);
        })
    }

    pub fn extend(&self, values: impl IntoIterator<Item = T>) {
        self.locked(|| {
            for value in values {
                link_before(&self.inner.tail, Some(value), NodeKind::Data);
            }
        })
    }

    pub fn rextend(&self, values: impl IntoIterator<Item = T>) {
        self.locked(|| {
            let first = self
                .inner
                .head
                .next()
                .unwrap_or_else(|| Arc::clone(&self.inner.tail));
            for value in values {
                link_before(&first, Some(value), NodeKind::Data);
            }
        })
    }

    /// Prepend the elements, ending up in reverse order of iteration
    /// (deque-style `extendleft`).
    pub fn extend_front(&self, values: impl IntoIterator<Item = T>) {
        let collected: Vec<T> = values.into_iter().collect();
        self.rextend(collected.into_iter().rev());
    }

    pub fn insert(&self, index: isize, value: T) -> Result<(), ListError> {
        self.locked(|| {
            let mut node = self.node_at(index, true)?;
            if node.kind() == NodeKind::Head {
                node = node.next().ok_or(ListError::UndefinedIndex)?;
            }
            link_before(&node, Some(value), NodeKind::Data);
            Ok(())
        })
    }

    pub fn get(&self, index: isize) -> Result<T, ListError>
    where
        T: Clone,
    {
        self.locked(|| {
            let node = self.node_at(index, false)?;
            node.value_clone().ok_or(ListError::UndefinedIndex)
        })
    }

    pub fn set(&self, index: isize, value: T) -> Result<(), ListError> {
        self.locked(|| {
            let node = self.node_at(index, false)?;
            if !node.is_data() {
                return Err(ListError::UndefinedIndex);
            }
            node.set_value(value);
            Ok(())
        })
    }

    /// Remove and return the value at `index` (default last).
    pub fn pop(&self, index: isize) -> Result<T, ListError> {
        self.locked(|| {
            if self.inner.length() == 0 {
                return Err(ListError::EmptyList);
            }
            let node = self.node_at(index, false)?;
            if !node.is_data() {
                return Err(ListError::UndefinedIndex);
            }
            remove_data_node(&node).ok_or(ListError::UndefinedIndex)
        })
    }

    pub fn pop_last(&self) -> Result<T, ListError> {
        self.pop(-1)
    }

    pub fn pop_first(&self) -> Result<T, ListError> {
        self.pop(0)
    }

    pub fn remove_at(&self, index: isize) -> Result<T, ListError> {
        self.pop(index)
    }

    /// Remove every data node. Nodes still referenced by cursors are
    /// retained as a tombstone chain between head and tail, so those
    /// cursors stay valid.
    pub fn clear(&self) {
        self.locked(|| {
            let head = &self.inner.head;
            let tail = &self.inner.tail;
            let mut previous = Arc::clone(head);
            let mut cursor = head.next();
            while let Some(node) = cursor {
                if Arc::ptr_eq(&node, tail) {
                    break;
                }
                let next = node.next();
                if node.cursor_count() > 0 {
                    node.set_kind(NodeKind::Tombstone);
                    node.take_value();
                    previous.set_next(Some(Arc::clone(&node)));
                    node.set_prev(Some(&previous));
                    previous = node;
                } else {
                    node.set_next(None);
                    node.set_prev(None);
                    node.take_value();
                }
                cursor = next;
            }
            previous.set_next(Some(Arc::clone(tail)));
            tail.set_prev(Some(&previous));
            self.inner.set_length(0);
        })
    }

    /// Cursor at HEAD; the first `next` yields the first value.
    pub fn head(&self) -> Cursor<T> {
        Cursor::new(
            Arc::clone(&self.inner.head),
            Direction::Forward,
            Arc::clone(&self.inner),
        )
    }

    /// Cursor at TAIL.
    pub fn tail(&self) -> Cursor<T> {
        Cursor::new(
            Arc::clone(&self.inner.tail),
            Direction::Forward,
            Arc::clone(&self.inner),
        )
    }

    /// Forward value iteration.
    pub fn iter(&self) -> Cursor<T> {
        self.head()
    }

    /// Reverse cursor at TAIL; the first `next` yields the last value.
    pub fn reversed(&self) -> Cursor<T> {
        Cursor::new(
            Arc::clone(&self.inner.tail),
            Direction::Reverse,
            Arc::clone(&self.inner),
        )
    }

    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.locked(|| {
            self.data_nodes()
                .iter()
                .filter_map(|node| node.value_clone())
                .collect()
        })
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.locked(|| {
            self.data_nodes()
                .iter()
                .any(|node| node.inner_value_eq(value))
        })
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.locked(|| {
            self.data_nodes()
                .iter()
                .filter(|node| node.inner_value_eq(value))
                .count()
        })
    }

    /// The first index of `value` within `[start, stop)`.
    pub fn index_of(&self, value: &T, start: usize, stop: usize) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        self.locked(|| {
            for (index, node) in self.data_nodes().iter().enumerate() {
                if index >= stop {
                    break;
                }
                if index >= start && node.inner_value_eq(value) {
                    return Ok(index);
                }
            }
            Err(ListError::ValueNotFound)
        })
    }

    /// Cursor at the first node equal to `value`, or `None`.
    pub fn find(&self, value: &T) -> Option<Cursor<T>>
    where
        T: PartialEq,
    {
        self.head().find(value)
    }

    pub fn rfind(&self, value: &T) -> Option<Cursor<T>>
    where
        T: PartialEq,
    {
        self.tail().rfind(value)
    }

    pub fn match_first(&self, predicate: impl FnMut(&T) -> bool) -> Option<Cursor<T>> {
        self.head().match_first(predicate)
    }

    pub fn rmatch_first(&self, predicate: impl FnMut(&T) -> bool) -> Option<Cursor<T>> {
        self.tail().rmatch_first(predicate)
    }

    /// Remove the first node equal to `value` and return its value.
    pub fn remove(&self, value: &T) -> Result<T, ListError>
    where
        T: PartialEq,
    {
        self.locked(|| {
            for node in self.data_nodes() {
                if node.inner_value_eq(value) {
                    return remove_data_node(&node).ok_or(ListError::ValueNotFound);
                }
            }
            Err(ListError::ValueNotFound)
        })
    }

    pub fn rremove(&self, value: &T) -> Result<T, ListError>
    where
        T: PartialEq,
    {
        self.locked(|| {
            for node in self.data_nodes().into_iter().rev() {
                if node.inner_value_eq(value) {
                    return remove_data_node(&node).ok_or(ListError::ValueNotFound);
                }
            }
            Err(ListError::ValueNotFound)
        })
    }

    /// Reverse in place by swapping values end-to-end; nodes (and the
    /// cursors parked on them) stay where they are.
    pub fn reverse(&self) {
        self.locked(|| {
            let nodes = self.data_nodes();
            let n = nodes.len();
            for i in 0..n / 2 {
                let a = nodes[i].take_value();
                let b = nodes[n - 1 - i].take_value();
                if let Some(b) = b {
                    nodes[i].set_value(b);
                }
                if let Some(a) = a {
                    nodes[n - 1 - i].set_value(a);
                }
            }
        })
    }

    pub fn sort(&self)
    where
        T: Ord + Clone,
    {
        self.sort_by(Ord::cmp);
    }

    pub fn sort_by(&self, mut compare: impl FnMut(&T, &T) -> std::cmp::Ordering)
    where
        T: Clone,
    {
        self.locked(|| {
            let nodes = self.data_nodes();
            let mut values: Vec<T> = nodes.iter().filter_map(|n| n.value_clone()).collect();
            values.sort_by(&mut compare);
            for (node, value) in nodes.iter().zip(values) {
                node.set_value(value);
            }
        })
    }

    /// Rotate right by `n` (negative rotates left): the last `n` data
    /// nodes move, as nodes, to the front.
    pub fn rotate(&self, n: isize) {
        self.locked(|| {
            let length = self.inner.length();
            if length < 2 {
                return;
            }
            let shift = (n.unsigned_abs()) % length;
            if shift == 0 {
                return;
            }
            let split = if n < 0 { shift } else { length - shift };

            let nodes = self.data_nodes();
            let first_moved = &nodes[split];

            let head = &self.inner.head;
            let tail = &self.inner.tail;
            let a_head = head.next().unwrap_or_else(|| Arc::clone(tail));
            let a_tail = match first_moved.prev() {
                Some(prev) => prev,
                None => return,
            };
            let b_head = Arc::clone(first_moved);
            let b_tail = match tail.prev() {
                Some(prev) => prev,
                None => return,
            };

            head.set_next(Some(Arc::clone(&b_head)));
            b_head.set_prev(Some(head));
            tail.set_prev(Some(&a_tail));
            a_tail.set_next(Some(Arc::clone(tail)));
            b_tail.set_next(Some(Arc::clone(&a_head)));
            a_head.set_prev(Some(&b_tail));
        })
    }

    fn adjust_slice(
        length: isize,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<(isize, isize, isize, usize), ListError> {
        // Clamping slice semantics, copied from Python's list type.
        if step == 0 {
            return Err(ListError::ZeroStep);
        }
        let positive = step > 0;
        let last = length - 1;

        let start = match start {
            None => {
                if positive {
                    0
                } else {
                    last
                }
            }
            Some(mut s) => {
                if s < 0 {
                    s += length;
                    if s < 0 {
                        s = if positive { 0 } else { -1 };
                    }
                } else if s >= length {
                    s = if positive { length } else { last };
                }
                s
            }
        };
        let stop = match stop {
            None => {
                if positive {
                    length
                } else {
                    -1
                }
            }
            Some(mut s) => {
                if s < 0 {
                    s += length;
                    if s < 0 {
                        s = if positive { 0 } else { -1 };
                    }
                } else if s >= length {
                    s = if positive { length } else { last };
                }
                s
            }
        };

        let slice_length = if !positive && stop < start {
            ((start - stop - 1) / -step + 1) as usize
        } else if positive && start < stop {
            ((stop - start - 1) / step + 1) as usize
        } else {
            return Ok((start, start, step, 0));
        };
        Ok((start, stop, step, slice_length))
    }

    fn slice_indices(start: isize, stop: isize, step: isize) -> Vec<usize> {
        let mut indices = Vec::new();
        let mut i = start;
        if step > 0 {
            while i < stop {
                indices.push(i as usize);
                i += step;
            }
        } else {
            while i > stop {
                indices.push(i as usize);
                i += step;
            }
        }
        indices
    }

    /// The values selected by a clamping, extended slice, as a new
    /// (unlocked) list.
    pub fn get_slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<LinkedList<T>, ListError>
    where
        T: Clone,
    {
        self.locked(|| {
            let length = self.inner.length() as isize;
            let (start, stop, step, _) = LinkedList::<T>::adjust_slice(length, start, stop, step)?;
            let nodes = self.data_nodes();
            let result = LinkedList::new();
            for index in LinkedList::<T>::slice_indices(start, stop, step) {
                if let Some(value) = nodes[index].value_clone() {
                    result.append(value);
                }
            }
            Ok(result)
        })
    }

    /// Assign `values` to a slice. A unit-step slice may change the
    /// list's length; an extended slice requires exactly matching sizes.
    pub fn set_slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
        values: Vec<T>,
    ) -> Result<(), ListError> {
        self.locked(|| {
            let length = self.inner.length() as isize;
            let (start, stop, step, slice_length) =
                LinkedList::<T>::adjust_slice(length, start, stop, step)?;
            let nodes = self.data_nodes();
            let indices = LinkedList::<T>::slice_indices(start, stop, step);

            if step != 1 && indices.len() != values.len() {
                return Err(ListError::SizeMismatch {
                    expected: slice_length,
                    got: values.len(),
                });
            }

            if step != 1 {
                for (index, value) in indices.into_iter().zip(values) {
                    nodes[index].set_value(value);
                }
                return Ok(());
            }

            // The insertion point survives all assignments: the node
            // just past the slice.
            let anchor = if (stop as usize) < nodes.len() {
                Arc::clone(&nodes[stop as usize])
            } else {
                Arc::clone(&self.inner.tail)
            };

            let mut values = values.into_iter();
            for index in indices {
                match values.next() {
                    Some(value) => nodes[index].set_value(value),
                    None => {
                        remove_data_node(&nodes[index]);
                    }
                }
            }
            for value in values {
                link_before(&anchor, Some(value), NodeKind::Data);
            }
            Ok(())
        })
    }

    pub fn remove_slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<(), ListError> {
        self.locked(|| {
            let length = self.inner.length() as isize;
            let (start, stop, step, _) = LinkedList::<T>::adjust_slice(length, start, stop, step)?;
            let nodes = self.data_nodes();
            for index in LinkedList::<T>::slice_indices(start, stop, step) {
                remove_data_node(&nodes[index]);
            }
            Ok(())
        })
    }

    /// A new list holding this list's values followed by `other`'s.
    /// The result carries no lock.
    pub fn concat(&self, other: &LinkedList<T>) -> LinkedList<T>
    where
        T: Clone,
    {
        let result = LinkedList::new();
        result.extend(self.values());
        result.extend(other.values());
        result
    }

    /// A new (unlocked) list with the values repeated `n` times.
    pub fn repeat(&self, n: usize) -> LinkedList<T>
    where
        T: Clone,
    {
        let values = self.values();
        let result = LinkedList::new();
        for _ in 0..n {
            result.extend(values.iter().cloned());
        }
        result
    }

    pub fn to_cloned(&self, mode: LockMode) -> LinkedList<T>
    where
        T: Clone,
    {
        let result = LinkedList::with_lock(mode);
        result.extend(self.values());
        result
    }

    /// Extract the node range `[start, stop)` into a new list.
    ///
    /// `start` defaults to the first data node and `stop` to past the
    /// last. Cutting head is an error; an empty range yields an empty
    /// list; a `stop` that precedes `start` is detected eagerly, before
    /// any mutation. Cursors parked on moved nodes follow them into the
    /// new list (and observe its lock from then on).
    pub fn cut(
        &self,
        start: Option<&Cursor<T>>,
        stop: Option<&Cursor<T>>,
        lock: LockMode,
    ) -> Result<LinkedList<T>, ListError> {
        self.locked(|| self.cut_impl(start, stop, lock, false))
    }

    /// Like [`LinkedList::cut`], but `start` is the inclusive last node,
    /// scanning backwards; the result keeps forward order.
    pub fn rcut(
        &self,
        start: Option<&Cursor<T>>,
        stop: Option<&Cursor<T>>,
        lock: LockMode,
    ) -> Result<LinkedList<T>, ListError> {
        self.locked(|| self.cut_impl(start, stop, lock, true))
    }

    fn check_cursor_ownership(&self, cursor: &Cursor<T>) -> Result<u8, ListError> {
        match cursor.node().owner() {
            Some(owner) if Arc::ptr_eq(&owner, &self.inner) => {}
            _ => return Err(ListError::ForeignCursor),
        }
        Ok(match cursor.direction() {
            Direction::Forward => 1,
            Direction::Reverse => 2,
        })
    }

    pub(crate) fn cut_impl(
        &self,
        start: Option<&Cursor<T>>,
        stop: Option<&Cursor<T>>,
        lock: LockMode,
        mut is_rcut: bool,
    ) -> Result<LinkedList<T>, ListError> {
        let start_directions = match start {
            None => 3,
            Some(cursor) => self.check_cursor_ownership(cursor)?,
        };
        let stop_directions = match stop {
            None => 3,
            Some(cursor) => self.check_cursor_ownership(cursor)?,
        };
        if start_directions & stop_directions == 0 {
            return Err(ListError::MismatchedDirections);
        }
        if start_directions == 2 || stop_directions == 2 {
            is_rcut = !is_rcut;
        }

        let result = LinkedList::with_lock(self.resolve_cut_lock(lock));
        let same_cursor = match (start, stop) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            _ => false,
        };

        let head = &self.inner.head;
        let tail = &self.inner.tail;

        let (first, last) = if !is_rcut {
            let first = match start {
                None => head.next().ok_or(ListError::UndefinedIndex)?,
                Some(cursor) => {
                    let node = cursor.node();
                    if Arc::ptr_eq(&node, head) {
                        if same_cursor {
                            return Ok(result);
                        }
                        return Err(ListError::SpecialNode);
                    }
                    node
                }
            };
            let stop_node = match stop {
                None => Arc::clone(tail),
                Some(cursor) => cursor.node(),
            };
            if Arc::ptr_eq(&first, &stop_node) {
                return Ok(result);
            }
            let last = stop_node.prev().ok_or(ListError::InvalidRange)?;
            (first, last)
        } else {
            let last = match start {
                None => tail.prev().ok_or(ListError::UndefinedIndex)?,
                Some(cursor) => {
                    let node = cursor.node();
                    if Arc::ptr_eq(&node, tail) {
                        if same_cursor {
                            return Ok(result);
                        }
                        return Err(ListError::SpecialNode);
                    }
                    node
                }
            };
            let stop_node = match stop {
                None => Arc::clone(head),
                Some(cursor) => cursor.node(),
            };
            if Arc::ptr_eq(&last, &stop_node) {
                return Ok(result);
            }
            let first = stop_node.next().ok_or(ListError::InvalidRange)?;
            (first, last)
        };

        if start.is_some() && stop.is_some() {
            // Both ends given: confirm start comes before stop, before
            // touching anything.
            let mut walk = Some(Arc::clone(&first));
            loop {
                match walk {
                    None => return Err(ListError::InvalidRange),
                    Some(node) => {
                        if Arc::ptr_eq(&node, &last) {
                            break;
                        }
                        if node.kind() == NodeKind::Tail {
                            return Err(ListError::InvalidRange);
                        }
                        walk = node.next();
                    }
                }
            }
        }

        let previous = first.prev().ok_or(ListError::InvalidRange)?;
        let next = last.next().ok_or(ListError::InvalidRange)?;

        let new_head = &result.inner.head;
        let new_tail = &result.inner.tail;
        new_head.set_next(Some(Arc::clone(&first)));
        first.set_prev(Some(new_head));
        new_tail.set_prev(Some(&last));
        last.set_next(Some(Arc::clone(new_tail)));

        previous.set_next(Some(next.clone()));
        next.set_prev(Some(&previous));

        let mut count = 0usize;
        let mut walk = Some(first);
        while let Some(node) = walk {
            if Arc::ptr_eq(&node, new_tail) {
                break;
            }
            node.set_owner(&result.inner);
            if node.is_data() {
                count += 1;
            }
            walk = node.next();
        }

        self.inner.adjust_length(-(count as isize));
        result.inner.set_length(count);
        Ok(result)
    }

    fn resolve_cut_lock(&self, lock: LockMode) -> LockMode {
        match lock {
            LockMode::Inherit => {
                let state = self.inner.state.lock();
                if state.private {
                    LockMode::Private
                } else {
                    match &state.lock {
                        Some(shared) => LockMode::Shared(shared.clone()),
                        None => LockMode::None,
                    }
                }
            }
            other => other,
        }
    }

    /// Move every node of `other` into `self` just before `where_`'s
    /// position (or append when `where_` is `None`). `other` ends up
    /// empty; cursors over moved nodes follow them here. When `where_`
    /// sits at TAIL, an intermediate special node keeps it stable.
    pub fn splice(
        &self,
        other: &LinkedList<T>,
        where_: Option<&mut Cursor<T>>,
    ) -> Result<(), ListError> {
        self.splice_impl(other, where_, false)
    }

    pub fn rsplice(
        &self,
        other: &LinkedList<T>,
        where_: Option<&mut Cursor<T>>,
    ) -> Result<(), ListError> {
        self.splice_impl(other, where_, true)
    }

    fn splice_impl(
        &self,
        other: &LinkedList<T>,
        where_: Option<&mut Cursor<T>>,
        is_rsplice: bool,
    ) -> Result<(), ListError> {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return Err(ListError::SelfOperation);
        }
        let self_lock = self.inner.current_lock();
        let other_lock = other.inner.current_lock();
        with_two_locks(self_lock.as_ref(), other_lock.as_ref(), || {
            let other_length = other.inner.length();
            if other_length == 0 {
                return Ok(());
            }

            if let Some(w) = &where_ {
                match w.node().owner() {
                    Some(owner) if Arc::ptr_eq(&owner, &self.inner) => {}
                    _ => return Err(ListError::ForeignCursor),
                }
            }

            let head = &self.inner.head;
            let tail = &self.inner.tail;
            let mut special: Option<Arc<Node<T>>> = None;

            let anchor = match (&where_, is_rsplice) {
                (None, false) => tail.prev().ok_or(ListError::UndefinedIndex)?,
                (None, true) => Arc::clone(head),
                (Some(w), false) => {
                    let node = w.node();
                    if Arc::ptr_eq(&node, tail) {
                        let s = link_before(&tail, None, NodeKind::Tombstone);
                        special = Some(Arc::clone(&s));
                        s
                    } else {
                        node
                    }
                }
                (Some(w), true) => {
                    let node = w.node();
                    if Arc::ptr_eq(&node, head) {
                        let first = head.next().ok_or(ListError::UndefinedIndex)?;
                        let s = link_before(&first, None, NodeKind::Tombstone);
                        special = Some(Arc::clone(&s));
                        s
                    } else {
                        node.prev().ok_or(ListError::UndefinedIndex)?
                    }
                }
            };

            let after = anchor.next().ok_or(ListError::UndefinedIndex)?;

            // Detach other's whole chain.
            let first = other.inner.head.next().ok_or(ListError::UndefinedIndex)?;
            let last = other.inner.tail.prev().ok_or(ListError::UndefinedIndex)?;
            other
                .inner
                .head
                .set_next(Some(Arc::clone(&other.inner.tail)));
            other.inner.tail.set_prev(Some(&other.inner.head));
            other.inner.set_length(0);

            anchor.set_next(Some(Arc::clone(&first)));
            first.set_prev(Some(&anchor));
            after.set_prev(Some(&last));
            last.set_next(Some(after.clone()));

            let mut walk = Some(first);
            while let Some(node) = walk {
                if Arc::ptr_eq(&node, &after) {
                    break;
                }
                node.set_owner(&self.inner);
                walk = node.next();
            }

            self.inner.adjust_length(other_length as isize);

            if let (Some(w), Some(s)) = (where_, special) {
                w.move_to(s);
            }
            Ok(())
        })
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        LinkedList::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    /// Copy the values into a new list with the same lock arrangement
    /// (a private lock clones as a fresh private lock).
    fn clone(&self) -> Self {
        let mode = self.resolve_cut_lock(LockMode::Inherit);
        let copy = LinkedList::with_lock(mode);
        copy.extend(self.values());
        copy
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        let list = LinkedList::new();
        list.extend(values);
        list
    }
}

impl<T: Clone> From<&[T]> for LinkedList<T> {
    fn from(values: &[T]) -> Self {
        values.iter().cloned().collect()
    }
}

impl<T: Clone> IntoIterator for &LinkedList<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.iter()
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let self_lock = self.inner.current_lock();
        let other_lock = other.inner.current_lock();
        with_two_locks(self_lock.as_ref(), other_lock.as_ref(), || {
            if self.inner.length() != other.inner.length() {
                return false;
            }
            let a = self.data_nodes();
            let b = other.data_nodes();
            a.iter()
                .zip(b.iter())
                .all(|(x, y)| nodes_value_equal(x, y))
        })
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Clone + PartialOrd> PartialOrd for LinkedList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let a = self.values();
        let b = other.values();
        a.partial_cmp(&b)
    }
}
