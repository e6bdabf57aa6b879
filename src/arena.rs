//! A slot store that flattens all its elements onto a single Vec, handing out
//! stable handles instead of references. Both the ordered map's tree nodes and
//! the scoreboard's competitor records live in one of these.

use std::ops::{Index, IndexMut};

/// The index of an element in an arena's storage vec. Handles are stable for
/// as long as the element they point at stays in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Handle(usize);

impl Handle {
    /// Sorts before every handle an arena will ever hand out.
    pub(crate) const MIN: Handle = Handle(0);

    /// Sorts after every handle an arena will ever hand out.
    pub(crate) const MAX: Handle = Handle(usize::MAX);
}

/// Slots are addressed by their position in the Vec. Removed slots go on a
/// freelist and get reused by the next allocation. There is no compaction, so
/// a handle never moves.
///
/// Indexing with a handle whose slot has been removed is a bug in the caller
/// and panics, same as indexing a Vec out of bounds.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    /// The slots. `None` marks a slot sitting on the freelist.
    store: Vec<Option<T>>,

    /// Slots which aren't in use anymore. These will be reused.
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            store: Vec::new(),
            free: Vec::new(),
        }
    }

    /// The number of live elements.
    pub(crate) fn len(&self) -> usize {
        self.store.len() - self.free.len()
    }

    /// Stores t and returns a handle to it.
    pub(crate) fn alloc(&mut self, t: T) -> Handle {
        // use the first available location in the storage vec, or infer what
        // the next location will be on push.
        match self.free.pop() {
            Some(handle) => {
                self.store[handle.0] = Some(t);
                handle
            }
            None => {
                self.store.push(Some(t));
                Handle(self.store.len() - 1)
            }
        }
    }

    /// Takes an element out of the arena, freeing its slot.
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<T> {
        let t = self.store.get_mut(handle.0)?.take()?;
        self.free.push(handle);
        Some(t)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, handle: Handle) -> Option<&T> {
        self.store.get(handle.0).and_then(Option::as_ref)
    }

    /// Clears the arena. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &T {
        match self.store[handle.0] {
            Some(ref t) => t,
            None => panic!("arena slot {} has been freed", handle.0),
        }
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        match self.store[handle.0] {
            Some(ref mut t) => t,
            None => panic!("arena slot {} has been freed", handle.0),
        }
    }
}
