//! Node representation and the locking discipline shared by
//! [`LinkedList`](super::LinkedList) and [`Cursor`](super::Cursor).

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// What a node is. HEAD and TAIL are fixed sentinels, present from list
/// construction to destruction. A TOMBSTONE is a former DATA node whose
/// removal was requested while cursors still referenced it; it stays
/// linked until the last cursor leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Head,
    Tail,
    Data,
    Tombstone,
}

pub(crate) struct NodeInner<T> {
    pub(crate) value: Option<T>,
    pub(crate) kind: NodeKind,
    pub(crate) prev: Option<Weak<Node<T>>>,
    pub(crate) next: Option<Arc<Node<T>>>,
    /// Count of cursors currently parked on this node.
    pub(crate) cursors: usize,
    pub(crate) owner: Weak<ListInner<T>>,
}

pub(crate) struct Node<T> {
    inner: Mutex<NodeInner<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(kind: NodeKind, value: Option<T>, owner: Weak<ListInner<T>>) -> Arc<Node<T>> {
        Arc::new(Node {
            inner: Mutex::new(NodeInner {
                value,
                kind,
                prev: None,
                next: None,
                cursors: 0,
                owner,
            }),
        })
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.inner.lock().kind
    }

    pub(crate) fn set_kind(&self, kind: NodeKind) {
        self.inner.lock().kind = kind;
    }

    pub(crate) fn is_data(&self) -> bool {
        self.kind() == NodeKind::Data
    }

    pub(crate) fn next(&self) -> Option<Arc<Node<T>>> {
        self.inner.lock().next.clone()
    }

    pub(crate) fn prev(&self) -> Option<Arc<Node<T>>> {
        self.inner
            .lock()
            .prev
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub(crate) fn set_next(&self, next: Option<Arc<Node<T>>>) {
        self.inner.lock().next = next;
    }

    pub(crate) fn take_next(&self) -> Option<Arc<Node<T>>> {
        self.inner.lock().next.take()
    }

    pub(crate) fn set_prev(&self, prev: Option<&Arc<Node<T>>>) {
        self.inner.lock().prev = prev.map(Arc::downgrade);
    }

    pub(crate) fn owner(&self) -> Option<Arc<ListInner<T>>> {
        self.inner.lock().owner.upgrade()
    }

    pub(crate) fn set_owner(&self, owner: &Arc<ListInner<T>>) {
        self.inner.lock().owner = Arc::downgrade(owner);
    }

    pub(crate) fn set_value(&self, value: T) {
        self.inner.lock().value = Some(value);
    }

    pub(crate) fn take_value(&self) -> Option<T> {
        self.inner.lock().value.take()
    }

    pub(crate) fn cursor_count(&self) -> usize {
        self.inner.lock().cursors
    }

    pub(crate) fn add_cursor(&self) {
        self.inner.lock().cursors += 1;
    }

    /// Decrement the cursor count, returning the new count.
    pub(crate) fn remove_cursor(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.cursors = inner.cursors.saturating_sub(1);
        inner.cursors
    }

    pub(crate) fn value_clone(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.lock().value.clone()
    }

    pub(crate) fn inner_value_eq(&self, other: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner
            .lock()
            .value
            .as_ref()
            .map_or(false, |value| value == other)
    }

    pub(crate) fn value_matches(&self, predicate: &mut impl FnMut(&T) -> bool) -> bool {
        self.inner
            .lock()
            .value
            .as_ref()
            .map_or(false, |value| predicate(value))
    }
}

/// Splice a node out of its chain and sever its own links. Only called
/// for nodes no cursor references (or that are being discarded
/// wholesale).
pub(crate) fn unlink_node<T>(node: &Arc<Node<T>>) {
    let (prev, next) = {
        let mut inner = node.inner.lock();
        (
            inner.prev.take().and_then(|w| w.upgrade()),
            inner.next.take(),
        )
    };
    if let Some(prev) = &prev {
        prev.set_next(next.clone());
    }
    if let Some(next) = &next {
        next.set_prev(prev.as_ref());
    }
    let mut inner = node.inner.lock();
    inner.value = None;
    inner.owner = Weak::new();
}

/// Insert `value` as a new node immediately before `node`, which must
/// not be HEAD. Data insertions bump the owning list's length.
pub(crate) fn link_before<T>(
    node: &Arc<Node<T>>,
    value: Option<T>,
    kind: NodeKind,
) -> Arc<Node<T>> {
    debug_assert!(node.kind() != NodeKind::Head);
    let owner = node.inner.lock().owner.clone();
    let fresh = Node::new(kind, value, owner.clone());

    let prev = node.prev().expect("non-head nodes have a predecessor");
    fresh.set_prev(Some(&prev));
    fresh.set_next(Some(Arc::clone(node)));
    prev.set_next(Some(Arc::clone(&fresh)));
    node.set_prev(Some(&fresh));

    if kind == NodeKind::Data {
        if let Some(list) = owner.upgrade() {
            list.adjust_length(1);
        }
    }
    fresh
}

/// Compare the values of two nodes, locking both in address order.
pub(crate) fn nodes_value_equal<T: PartialEq>(a: &Arc<Node<T>>, b: &Arc<Node<T>>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    let (first, second) = if Arc::as_ptr(a) < Arc::as_ptr(b) {
        (a, b)
    } else {
        (b, a)
    };
    let guard_first = first.inner.lock();
    let guard_second = second.inner.lock();
    guard_first.value == guard_second.value
}

/// Logically remove a DATA node: if cursors reference it, demote it to a
/// TOMBSTONE and leave it linked; otherwise unlink it outright. Returns
/// the value.
pub(crate) fn remove_data_node<T>(node: &Arc<Node<T>>) -> Option<T> {
    debug_assert!(node.is_data());
    if let Some(list) = node.owner() {
        list.adjust_length(-1);
    }
    let value = node.take_value();
    if node.cursor_count() > 0 {
        node.set_kind(NodeKind::Tombstone);
    } else {
        unlink_node(node);
    }
    value
}

/// The shareable lock handle a list can be created with. The same handle
/// may guard multiple lists; operations spanning two lists acquire the
/// two handles in ascending address order.
#[derive(Clone)]
pub struct ListLock {
    mutex: Arc<Mutex<()>>,
}

impl ListLock {
    #[allow(clippy::new_without_default)]
    pub fn new() -> ListLock {
        ListLock {
            mutex: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn same(a: &ListLock, b: &ListLock) -> bool {
        Arc::ptr_eq(&a.mutex, &b.mutex)
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.mutex) as usize
    }
}

impl std::fmt::Debug for ListLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListLock({:p})", Arc::as_ptr(&self.mutex))
    }
}

/// How a list is locked.
#[derive(Debug, Clone, Default)]
pub enum LockMode {
    /// No locking; the caller is responsible for synchronization.
    #[default]
    None,
    /// A freshly allocated lock private to this list.
    Private,
    /// A caller-supplied lock, possibly shared among lists.
    Shared(ListLock),
    /// Inherit the lock arrangement of the source list (`cut` only):
    /// a private source gets a fresh private lock, a shared source
    /// shares the same handle.
    Inherit,
}

pub(crate) struct ListState {
    pub(crate) length: usize,
    pub(crate) lock: Option<ListLock>,
    pub(crate) private: bool,
}

/// The shared body of a linked list. `head` and `tail` never change;
/// the mutable state lives behind its own mutex.
pub(crate) struct ListInner<T> {
    pub(crate) head: Arc<Node<T>>,
    pub(crate) tail: Arc<Node<T>>,
    pub(crate) state: Mutex<ListState>,
}

impl<T> ListInner<T> {
    pub(crate) fn current_lock(&self) -> Option<ListLock> {
        self.state.lock().lock.clone()
    }

    pub(crate) fn length(&self) -> usize {
        self.state.lock().length
    }

    pub(crate) fn set_length(&self, length: usize) {
        self.state.lock().length = length;
    }

    pub(crate) fn adjust_length(&self, delta: isize) {
        let mut state = self.state.lock();
        state.length = (state.length as isize + delta).max(0) as usize;
    }
}

impl<T> Drop for ListInner<T> {
    fn drop(&mut self) {
        // Break the next-chain iteratively so dropping a long list
        // doesn't recurse through every node.
        let mut cursor = self.head.take_next();
        while let Some(node) = cursor {
            cursor = node.take_next();
        }
    }
}

/// Run `f` under an optional list lock.
pub(crate) fn with_lock<R>(lock: Option<&ListLock>, f: impl FnOnce() -> R) -> R {
    match lock {
        Some(lock) => {
            let _guard = lock.mutex.lock();
            f()
        }
        None => f(),
    }
}

/// Run `f` under two optional locks, acquired in ascending address
/// order; a shared handle is acquired once.
pub(crate) fn with_two_locks<R>(
    a: Option<&ListLock>,
    b: Option<&ListLock>,
    f: impl FnOnce() -> R,
) -> R {
    match (a, b) {
        (None, None) => f(),
        (Some(lock), None) | (None, Some(lock)) => with_lock(Some(lock), f),
        (Some(x), Some(y)) => {
            if ListLock::same(x, y) {
                return with_lock(Some(x), f);
            }
            let (first, second) = if x.address() < y.address() {
                (x, y)
            } else {
                (y, x)
            };
            let _first = first.mutex.lock();
            let _second = second.mutex.lock();
            f()
        }
    }
}

fn same_lock(a: &Option<ListLock>, b: &Option<ListLock>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => ListLock::same(a, b),
        _ => false,
    }
}

/// Run `f` under the lock currently guarding `node`'s owner, re-fetching
/// in a spin-on-mismatch loop: the node may have moved to a different
/// list (with a different lock) between the fetch and the acquisition.
/// This is the only retry loop in the crate.
pub(crate) fn with_node_lock<T, R>(
    node: &Arc<Node<T>>,
    f: impl FnOnce(Option<Arc<ListInner<T>>>) -> R,
) -> R {
    loop {
        let owner = node.owner();
        let lock = owner.as_ref().and_then(|list| list.current_lock());
        match lock {
            None => return f(owner),
            Some(lock) => {
                let guard = lock.mutex.lock();
                let owner_now = node.owner();
                let lock_now = owner_now.as_ref().and_then(|list| list.current_lock());
                if same_lock(&Some(lock.clone()), &lock_now) {
                    let result = f(owner_now);
                    drop(guard);
                    return result;
                }
            }
        }
    }
}
