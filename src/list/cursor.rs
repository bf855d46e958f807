//! Cursor iterators over [`LinkedList`](super::LinkedList).
//!
//! A cursor is a movable pointer to a node. It registers itself on the
//! node it points at; a node removed while registered cursors exist
//! becomes a tombstone and stays linked until the last cursor moves off
//! or is dropped. Traversal skips tombstones transparently, including
//! runs of adjacent ones.

use std::sync::Arc;

use super::node::{
    link_before, remove_data_node, unlink_node, with_node_lock, ListInner, Node, NodeKind,
};
use super::LinkedList;
use crate::ListError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

pub struct Cursor<T> {
    node: Arc<Node<T>>,
    direction: Direction,
    /// Keep-alive handle to the most recently observed owning list; the
    /// authoritative owner is always re-read from the node.
    list: Arc<ListInner<T>>,
}

impl<T> Cursor<T> {
    pub(crate) fn new(
        node: Arc<Node<T>>,
        direction: Direction,
        list: Arc<ListInner<T>>,
    ) -> Cursor<T> {
        node.add_cursor();
        Cursor {
            node,
            direction,
            list,
        }
    }

    pub(crate) fn node(&self) -> Arc<Node<T>> {
        Arc::clone(&self.node)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The list this cursor currently belongs to (which changes when the
    /// node it sits on is moved by `cut` or `splice`).
    pub fn list(&self) -> Result<LinkedList<T>, ListError> {
        match self.node.owner() {
            Some(inner) => Ok(LinkedList { inner }),
            None => Err(ListError::ListDropped),
        }
    }

    fn owner(&self) -> Result<Arc<ListInner<T>>, ListError> {
        self.node.owner().ok_or(ListError::ListDropped)
    }

    /// Release the registration on `node`, unlinking it if it was the
    /// last reference to a tombstone.
    fn release(node: &Arc<Node<T>>) {
        let remaining = node.remove_cursor();
        if remaining == 0 && node.kind() == NodeKind::Tombstone {
            unlink_node(node);
        }
    }

    /// Move the registration to `target`.
    pub(crate) fn move_to(&mut self, target: Arc<Node<T>>) {
        if Arc::ptr_eq(&self.node, &target) {
            return;
        }
        target.add_cursor();
        let old = std::mem::replace(&mut self.node, target);
        Cursor::release(&old);
    }

    fn ahead(&self, node: &Arc<Node<T>>) -> Option<Arc<Node<T>>> {
        match self.direction {
            Direction::Forward => node.next(),
            Direction::Reverse => node.prev(),
        }
    }

    fn behind(&self, node: &Arc<Node<T>>) -> Option<Arc<Node<T>>> {
        match self.direction {
            Direction::Forward => node.prev(),
            Direction::Reverse => node.next(),
        }
    }

    fn terminal_kind(&self) -> NodeKind {
        match self.direction {
            Direction::Forward => NodeKind::Tail,
            Direction::Reverse => NodeKind::Head,
        }
    }

    fn start_kind(&self) -> NodeKind {
        match self.direction {
            Direction::Forward => NodeKind::Head,
            Direction::Reverse => NodeKind::Tail,
        }
    }

    /// True while the cursor is on a tombstone. Reads and insertions
    /// through the cursor fail until it moves on.
    pub fn is_special(&self) -> bool {
        self.node.kind() == NodeKind::Tombstone
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.node.kind(), NodeKind::Head | NodeKind::Tail)
    }

    /// True when the current node or any node ahead still carries data.
    pub fn has_more(&self) -> bool {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let terminal = self.terminal_kind();
            let mut node = Arc::clone(&self.node);
            loop {
                let kind = node.kind();
                if kind == terminal {
                    return false;
                }
                if kind == NodeKind::Data {
                    return true;
                }
                match self.ahead(&node) {
                    Some(next) => node = next,
                    None => return false,
                }
            }
        })
    }

    /// Count of data nodes from the current position (inclusive) to the
    /// end of the iteration.
    pub fn remaining(&self) -> usize {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let mut count = 0;
            let mut node = Some(Arc::clone(&self.node));
            while let Some(n) = node {
                if n.is_data() {
                    count += 1;
                }
                node = self.ahead(&n);
            }
            count
        })
    }

    fn step(&mut self, forward: bool) -> Option<T>
    where
        T: Clone,
    {
        let guard_node = Arc::clone(&self.node);
        let towards_next = forward != (self.direction == Direction::Reverse);
        let terminal = if towards_next {
            NodeKind::Tail
        } else {
            NodeKind::Head
        };
        with_node_lock(&guard_node, |owner| {
            if let Some(owner) = owner {
                self.list = owner;
            }
            if self.node.kind() == terminal {
                return None;
            }
            let step_from = |n: &Arc<Node<T>>| if towards_next { n.next() } else { n.prev() };
            let mut next = step_from(&self.node)?;
            while next.kind() == NodeKind::Tombstone {
                next = step_from(&next)?;
            }
            self.move_to(next);
            if self.node.kind() == terminal {
                None
            } else {
                self.node.value_clone()
            }
        })
    }

    /// Advance past `count` data nodes, returning the last value
    /// reached, or `None` if iteration was exhausted first.
    pub fn advance(&mut self, count: usize) -> Option<T>
    where
        T: Clone,
    {
        let mut last = None;
        for _ in 0..count {
            last = self.step(true);
            last.as_ref()?;
        }
        last
    }

    /// The symmetric operation to `next`: move one data node backwards
    /// (relative to the cursor's direction) and return its value.
    pub fn previous(&mut self) -> Option<T>
    where
        T: Clone,
    {
        self.step(false)
    }

    pub fn retreat(&mut self, count: usize) -> Option<T>
    where
        T: Clone,
    {
        let mut last = None;
        for _ in 0..count {
            last = self.step(false);
            last.as_ref()?;
        }
        last
    }

    /// A new cursor `count` positions behind this one, without moving
    /// it. Sentinels count as positions; crossing past one fails.
    pub fn before(&self, count: usize) -> Result<Cursor<T>, ListError> {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let mut node = Arc::clone(&self.node);
            let mut remaining = count;
            while remaining > 0 {
                node = self.behind(&node).ok_or(ListError::UndefinedIndex)?;
                if node.kind() == NodeKind::Tombstone {
                    continue;
                }
                remaining -= 1;
            }
            Ok(Cursor::new(node, self.direction, Arc::clone(&self.list)))
        })
    }

    pub fn after(&self, count: usize) -> Result<Cursor<T>, ListError> {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let mut node = Arc::clone(&self.node);
            let mut remaining = count;
            while remaining > 0 {
                node = self.ahead(&node).ok_or(ListError::UndefinedIndex)?;
                if node.kind() == NodeKind::Tombstone {
                    continue;
                }
                remaining -= 1;
            }
            Ok(Cursor::new(node, self.direction, Arc::clone(&self.list)))
        })
    }

    /// Move back to the starting sentinel for this direction.
    pub fn reset(&mut self) -> Result<(), ListError> {
        let owner = self.owner()?;
        let target = match self.direction {
            Direction::Forward => Arc::clone(&owner.head),
            Direction::Reverse => Arc::clone(&owner.tail),
        };
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| self.move_to(target));
        self.list = owner;
        Ok(())
    }

    /// Move to the terminal sentinel for this direction.
    pub fn exhaust(&mut self) -> Result<(), ListError> {
        let owner = self.owner()?;
        let target = match self.direction {
            Direction::Forward => Arc::clone(&owner.tail),
            Direction::Reverse => Arc::clone(&owner.head),
        };
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| self.move_to(target));
        self.list = owner;
        Ok(())
    }

    /// A cursor at the first node equal to `value`, scanning from the
    /// current position (inclusive), or `None` when exhausted.
    pub fn find(&self, value: &T) -> Option<Cursor<T>>
    where
        T: PartialEq,
    {
        self.scan(|node| node.inner_value_eq(value), true)
    }

    pub fn rfind(&self, value: &T) -> Option<Cursor<T>>
    where
        T: PartialEq,
    {
        self.scan(|node| node.inner_value_eq(value), false)
    }

    pub fn match_first(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Cursor<T>> {
        self.scan(
            move |node| node.value_matches(&mut predicate),
            true,
        )
    }

    pub fn rmatch_first(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Cursor<T>> {
        self.scan(
            move |node| node.value_matches(&mut predicate),
            false,
        )
    }

    fn scan(
        &self,
        mut matches: impl FnMut(&Arc<Node<T>>) -> bool,
        forward: bool,
    ) -> Option<Cursor<T>> {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let terminal = if forward {
                self.terminal_kind()
            } else {
                self.start_kind()
            };
            let mut node = Arc::clone(&self.node);
            loop {
                let kind = node.kind();
                if kind == NodeKind::Data && matches(&node) {
                    return Some(Cursor::new(node, self.direction, Arc::clone(&self.list)));
                }
                if kind == terminal {
                    return None;
                }
                node = if forward {
                    self.ahead(&node)?
                } else {
                    self.behind(&node)?
                };
            }
        })
    }

    /// The node at a relative index: 0 is always the current node; a
    /// positive index counts data nodes ahead in list order, negative
    /// behind. Reverse cursors negate their indices before this point.
    fn node_relative(&self, index: isize, allow_sentinels: bool) -> Result<Arc<Node<T>>, ListError> {
        if index == 0 {
            return match self.node.kind() {
                NodeKind::Data => Ok(Arc::clone(&self.node)),
                NodeKind::Tombstone => Err(ListError::SpecialNode),
                _ if allow_sentinels => Ok(Arc::clone(&self.node)),
                _ => Err(ListError::UndefinedIndex),
            };
        }
        let mut node = Arc::clone(&self.node);
        let mut remaining = index.unsigned_abs();
        let backwards = index < 0;
        while remaining > 0 {
            node = if backwards {
                node.prev().ok_or(ListError::UndefinedIndex)?
            } else {
                node.next().ok_or(ListError::UndefinedIndex)?
            };
            match node.kind() {
                NodeKind::Data => remaining -= 1,
                NodeKind::Tombstone => {}
                NodeKind::Head => {
                    if allow_sentinels && backwards {
                        remaining -= 1;
                    } else {
                        return Err(ListError::UndefinedIndex);
                    }
                }
                NodeKind::Tail => {
                    if allow_sentinels && !backwards {
                        remaining -= 1;
                    } else {
                        return Err(ListError::UndefinedIndex);
                    }
                }
            }
        }
        if !allow_sentinels && !node.is_data() {
            return Err(ListError::UndefinedIndex);
        }
        Ok(node)
    }

    fn oriented(&self, index: isize) -> isize {
        match self.direction {
            Direction::Forward => index,
            Direction::Reverse => -index,
        }
    }

    /// Read the value at a relative index. Unlike list indexing this
    /// never clamps; index 0 is the current node.
    pub fn get(&self, index: isize) -> Result<T, ListError>
    where
        T: Clone,
    {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let node = self.node_relative(self.oriented(index), false)?;
            node.value_clone().ok_or(ListError::UndefinedIndex)
        })
    }

    pub fn set(&self, index: isize, value: T) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let node = self.node_relative(self.oriented(index), false)?;
            node.set_value(value);
            Ok(())
        })
    }

    /// Remove the node at a relative index (without moving the cursor).
    pub fn remove_at(&self, index: isize) -> Result<T, ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let node = self.node_relative(self.oriented(index), false)?;
            remove_data_node(&node).ok_or(ListError::UndefinedIndex)
        })
    }

    fn slice_nodes(
        &self,
        start: isize,
        stop: isize,
        step: isize,
    ) -> Result<Vec<Arc<Node<T>>>, ListError> {
        if step == 0 {
            return Err(ListError::ZeroStep);
        }
        // Validate both endpoints before collecting anything.
        self.node_relative(start, true)?;
        self.node_relative(stop, true)?;

        let mut nodes = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            nodes.push(self.node_relative(i, false)?);
            i += step;
        }
        Ok(nodes)
    }

    fn oriented_slice(&self, start: isize, stop: isize, step: isize) -> (isize, isize, isize) {
        match self.direction {
            Direction::Forward => (start, stop, step),
            Direction::Reverse => (-start, -stop, -step),
        }
    }

    /// The values of an unclamped relative slice, as a new list. Out of
    /// range bounds fail; a tombstone at an included position fails with
    /// `SpecialNode`.
    pub fn get_slice(
        &self,
        start: isize,
        stop: isize,
        step: isize,
    ) -> Result<LinkedList<T>, ListError>
    where
        T: Clone,
    {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let (start, stop, step) = self.oriented_slice(start, stop, step);
            let nodes = self.slice_nodes(start, stop, step)?;
            let result = LinkedList::new();
            for node in nodes {
                if let Some(value) = node.value_clone() {
                    result.append(value);
                }
            }
            Ok(result)
        })
    }

    /// Assign to a relative slice. Only a unit-step slice (in the
    /// cursor's own orientation) may change length.
    pub fn set_slice(
        &self,
        start: isize,
        stop: isize,
        step: isize,
        values: Vec<T>,
    ) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let reverse = self.direction == Direction::Reverse;
            let (start, stop, step) = self.oriented_slice(start, stop, step);
            let nodes = self.slice_nodes(start, stop, step)?;
            let mut values = values;
            if reverse {
                values.reverse();
            }

            if nodes.len() != values.len() {
                let resizable_step = if reverse { -1 } else { 1 };
                if step != resizable_step {
                    return Err(ListError::SizeMismatch {
                        expected: nodes.len(),
                        got: values.len(),
                    });
                }
            }

            let shared = nodes.len().min(values.len());
            let extra_values = values.split_off(shared);
            for (node, value) in nodes.iter().zip(values) {
                node.set_value(value);
            }

            if nodes.len() > shared {
                for node in &nodes[shared..] {
                    remove_data_node(&node);
                }
            } else if !extra_values.is_empty() {
                let last = match nodes.last() {
                    Some(last) => Arc::clone(last),
                    None => self.node_relative(stop, true)?,
                };
                if !last.is_data() && nodes.last().is_none() {
                    return Err(ListError::UndefinedIndex);
                }
                if reverse {
                    // `last` is the earliest node in list order.
                    for value in extra_values.into_iter().rev() {
                        link_before(&last, Some(value), NodeKind::Data);
                    }
                } else {
                    let anchor = last.next().ok_or(ListError::UndefinedIndex)?;
                    for value in extra_values {
                        link_before(&anchor, Some(value), NodeKind::Data);
                    }
                }
            }
            Ok(())
        })
    }

    pub fn remove_slice(&self, start: isize, stop: isize, step: isize) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let (start, stop, step) = self.oriented_slice(start, stop, step);
            for node in self.slice_nodes(start, stop, step)? {
                remove_data_node(&node);
            }
            Ok(())
        })
    }

    /// Insert `value` before the node at a relative index.
    pub fn insert(&self, index: isize, value: T) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            let target = self.node_relative(index, true)?;
            if target.kind() == NodeKind::Head {
                return Err(ListError::UndefinedIndex);
            }
            link_before(&target, Some(value), NodeKind::Data);
            Ok(())
        })
    }

    /// Insert directly after the current node (in the cursor's
    /// direction).
    pub fn append(&self, value: T) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| self.append_impl(value))
    }

    fn append_impl(&self, value: T) -> Result<(), ListError> {
        match self.direction {
            Direction::Forward => {
                if self.node.kind() == NodeKind::Tail {
                    return Err(ListError::UndefinedIndex);
                }
                let anchor = self.node.next().ok_or(ListError::UndefinedIndex)?;
                link_before(&anchor, Some(value), NodeKind::Data);
            }
            Direction::Reverse => {
                if self.node.kind() == NodeKind::Head {
                    return Err(ListError::UndefinedIndex);
                }
                link_before(&self.node, Some(value), NodeKind::Data);
            }
        }
        Ok(())
    }

    /// Insert directly before the current node (in the cursor's
    /// direction).
    pub fn prepend(&self, value: T) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| self.prepend_impl(value))
    }

    fn prepend_impl(&self, value: T) -> Result<(), ListError> {
        match self.direction {
            Direction::Forward => {
                if self.node.kind() == NodeKind::Head {
                    return Err(ListError::UndefinedIndex);
                }
                link_before(&self.node, Some(value), NodeKind::Data);
            }
            Direction::Reverse => {
                if self.node.kind() == NodeKind::Tail {
                    return Err(ListError::UndefinedIndex);
                }
                let anchor = self.node.next().ok_or(ListError::UndefinedIndex)?;
                link_before(&anchor, Some(value), NodeKind::Data);
            }
        }
        Ok(())
    }

    /// Insert the values after the current node (in the cursor's
    /// direction), so that iterating onward yields them in input order.
    /// On a reverse cursor this lays them down in reverse list order.
    pub fn extend(&self, values: impl IntoIterator<Item = T>) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| match self.direction {
            Direction::Forward => {
                if self.node.kind() == NodeKind::Tail {
                    return Err(ListError::UndefinedIndex);
                }
                let anchor = self.node.next().ok_or(ListError::UndefinedIndex)?;
                for value in values {
                    link_before(&anchor, Some(value), NodeKind::Data);
                }
                Ok(())
            }
            Direction::Reverse => {
                if self.node.kind() == NodeKind::Head {
                    return Err(ListError::UndefinedIndex);
                }
                let collected: Vec<T> = values.into_iter().collect();
                for value in collected.into_iter().rev() {
                    link_before(&self.node, Some(value), NodeKind::Data);
                }
                Ok(())
            }
        })
    }

    /// Insert the values before the current node.
    pub fn rextend(&self, values: impl IntoIterator<Item = T>) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| match self.direction {
            Direction::Forward => {
                if self.node.kind() == NodeKind::Head {
                    return Err(ListError::UndefinedIndex);
                }
                for value in values {
                    link_before(&self.node, Some(value), NodeKind::Data);
                }
                Ok(())
            }
            Direction::Reverse => {
                if self.node.kind() == NodeKind::Tail {
                    return Err(ListError::UndefinedIndex);
                }
                let anchor = self.node.next().ok_or(ListError::UndefinedIndex)?;
                let collected: Vec<T> = values.into_iter().collect();
                for value in collected.into_iter().rev() {
                    link_before(&anchor, Some(value), NodeKind::Data);
                }
                Ok(())
            }
        })
    }

    /// Remove the current node and retreat to the previous position
    /// (relative to the cursor's direction). A non-zero index removes at
    /// that relative position without moving the cursor.
    pub fn pop(&mut self, index: isize) -> Result<T, ListError> {
        self.pop_impl(index, false)
    }

    /// Like `pop`, but the cursor advances to the next position instead.
    pub fn rpop(&mut self, index: isize) -> Result<T, ListError> {
        self.pop_impl(index, true)
    }

    fn pop_impl(&mut self, index: isize, advance: bool) -> Result<T, ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| {
            if index != 0 {
                let target = self.node_relative(self.oriented(index), false)?;
                return remove_data_node(&target).ok_or(ListError::UndefinedIndex);
            }
            match self.node.kind() {
                NodeKind::Data => {}
                NodeKind::Tombstone => return Err(ListError::SpecialNode),
                _ => return Err(ListError::UndefinedIndex),
            }
            // Choose where the cursor lands, skipping tombstones.
            let towards_next = advance != (self.direction == Direction::Reverse);
            let mut destination = if towards_next {
                self.node.next()
            } else {
                self.node.prev()
            }
            .ok_or(ListError::UndefinedIndex)?;
            while destination.kind() == NodeKind::Tombstone {
                destination = if towards_next {
                    destination.next()
                } else {
                    destination.prev()
                }
                .ok_or(ListError::UndefinedIndex)?;
            }

            let current = Arc::clone(&self.node);
            self.move_to(destination);
            remove_data_node(&current).ok_or(ListError::UndefinedIndex)
        })
    }

    /// Remove the first node equal to `value` scanning ahead from the
    /// current position (the cursor itself doesn't move).
    pub fn remove(&self, value: &T) -> Result<T, ListError>
    where
        T: PartialEq,
    {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let terminal = self.terminal_kind();
            let mut node = Arc::clone(&self.node);
            loop {
                if node.is_data() && node.inner_value_eq(value) {
                    return remove_data_node(&node).ok_or(ListError::ValueNotFound);
                }
                if node.kind() == terminal {
                    return Err(ListError::ValueNotFound);
                }
                node = self.ahead(&node).ok_or(ListError::ValueNotFound)?;
            }
        })
    }

    pub fn rremove(&self, value: &T) -> Result<T, ListError>
    where
        T: PartialEq,
    {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let start = self.start_kind();
            let mut node = Arc::clone(&self.node);
            loop {
                if node.is_data() && node.inner_value_eq(value) {
                    return remove_data_node(&node).ok_or(ListError::ValueNotFound);
                }
                if node.kind() == start {
                    return Err(ListError::ValueNotFound);
                }
                node = self.behind(&node).ok_or(ListError::ValueNotFound)?;
            }
        })
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.count_impl(value, true)
    }

    pub fn rcount(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.count_impl(value, false)
    }

    fn count_impl(&self, value: &T, forward: bool) -> usize
    where
        T: PartialEq,
    {
        let guard_node = Arc::clone(&self.node);
        with_node_lock(&guard_node, |_| {
            let stop_kind = if forward {
                self.terminal_kind()
            } else {
                self.start_kind()
            };
            let mut count = 0;
            let mut node = Arc::clone(&self.node);
            loop {
                if node.is_data() && node.inner_value_eq(value) {
                    count += 1;
                }
                if node.kind() == stop_kind {
                    return count;
                }
                let next = if forward {
                    self.ahead(&node)
                } else {
                    self.behind(&node)
                };
                match next {
                    Some(n) => node = n,
                    None => return count,
                }
            }
        })
    }

    /// Discard the current node and everything from here to the forward
    /// terminus. Nodes other cursors reference are retained as
    /// tombstones; this cursor ends on the sentinel.
    pub fn truncate(&mut self) -> Result<(), ListError> {
        self.truncate_impl(true)
    }

    /// Discard the current node and everything back to the reverse
    /// terminus.
    pub fn rtruncate(&mut self) -> Result<(), ListError> {
        self.truncate_impl(false)
    }

    fn truncate_impl(&mut self, forward: bool) -> Result<(), ListError> {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |owner| {
            let owner = owner.ok_or(ListError::ListDropped)?;
            // Orient: a reverse cursor's truncate is a forward cursor's
            // rtruncate.
            let towards_tail = forward != (self.direction == Direction::Reverse);
            let (terminus, opposite) = if towards_tail {
                (Arc::clone(&owner.tail), Arc::clone(&owner.head))
            } else {
                (Arc::clone(&owner.head), Arc::clone(&owner.tail))
            };

            if Arc::ptr_eq(&self.node, &terminus) {
                return Ok(());
            }
            if Arc::ptr_eq(&self.node, &opposite) {
                return Err(ListError::SpecialNode);
            }

            // Step off the doomed range first so our own registration
            // doesn't force a tombstone.
            let first_doomed = Arc::clone(&self.node);
            self.move_to(Arc::clone(&terminus));

            let mut boundary = if towards_tail {
                first_doomed.prev().ok_or(ListError::UndefinedIndex)?
            } else {
                first_doomed.next().ok_or(ListError::UndefinedIndex)?
            };

            let mut removed = 0isize;
            let mut walk = Some(first_doomed);
            while let Some(node) = walk {
                if Arc::ptr_eq(&node, &terminus) {
                    break;
                }
                let next = if towards_tail { node.next() } else { node.prev() };
                if node.is_data() {
                    removed += 1;
                }
                node.take_value();
                if node.cursor_count() > 0 {
                    node.set_kind(NodeKind::Tombstone);
                    if towards_tail {
                        boundary.set_next(Some(Arc::clone(&node)));
                        node.set_prev(Some(&boundary));
                    } else {
                        boundary.set_prev(Some(&node));
                        node.set_next(Some(Arc::clone(&boundary)));
                    }
                    boundary = node;
                } else {
                    node.set_next(None);
                    node.set_prev(None);
                }
                walk = next;
            }
            if towards_tail {
                boundary.set_next(Some(Arc::clone(&terminus)));
                terminus.set_prev(Some(&boundary));
            } else {
                boundary.set_prev(Some(&terminus));
                terminus.set_next(Some(Arc::clone(&boundary)));
            }
            owner.adjust_length(-removed);
            self.list = owner;
            Ok(())
        })
    }

    /// Cut from the current node (inclusive) up to `stop` (exclusive),
    /// returning the cut nodes as a new list; see
    /// [`LinkedList::cut`](super::LinkedList::cut).
    pub fn cut(&self, stop: Option<&Cursor<T>>) -> Result<LinkedList<T>, ListError> {
        let list = self.list()?;
        let lock = list.inner.current_lock();
        super::node::with_lock(lock.as_ref(), || {
            list.cut_impl(Some(self), stop, super::LockMode::Inherit, false)
        })
    }

    pub fn rcut(&self, stop: Option<&Cursor<T>>) -> Result<LinkedList<T>, ListError> {
        let list = self.list()?;
        let lock = list.inner.current_lock();
        super::node::with_lock(lock.as_ref(), || {
            list.cut_impl(Some(self), stop, super::LockMode::Inherit, true)
        })
    }

    /// Splice all of `other`'s nodes in at this cursor's position.
    pub fn splice(&mut self, other: &LinkedList<T>) -> Result<(), ListError> {
        let list = self.list()?;
        let reverse = self.direction == Direction::Reverse;
        list.splice_impl(other, Some(self), reverse)
    }

    pub fn rsplice(&mut self, other: &LinkedList<T>) -> Result<(), ListError> {
        let list = self.list()?;
        let reverse = self.direction == Direction::Reverse;
        list.splice_impl(other, Some(self), !reverse)
    }

    /// A new independent cursor at the same position.
    pub fn fork(&self) -> Cursor<T> {
        self.clone()
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Cursor::new(
            Arc::clone(&self.node),
            self.direction,
            Arc::clone(&self.list),
        )
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        let node = Arc::clone(&self.node);
        with_node_lock(&node, |_| Cursor::release(&node));
    }
}

impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node) && self.direction == other.direction
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.step(true)
    }
}
