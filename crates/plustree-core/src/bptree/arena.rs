use std::fmt;

/// Stable handle to a node slot. Handles of freed nodes are recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(element);
            id
        } else {
            self.slots.push(Some(element));
            NodeId(self.slots.len() - 1)
        }
    }

    pub(crate) fn try_get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("`Arena::get()` - handle {} is invalid", id))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("`Arena::get_mut()` - handle {} is invalid", id))
    }

    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let element = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("`Arena::take()` - handle {} is invalid", id));
        self.free.push(id);
        element
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        drop(self.take(id));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
