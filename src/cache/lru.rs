//! Recency List Module
//!
//! Arena-backed doubly linked list tracking access order for LRU eviction.

// == Slot Id ==
/// Stable handle to an element of a `RecencyList`.
///
/// Stays valid until the element is removed; the slot may then be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == Recency List ==
/// Orders elements by recency of use.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Elements live in a `Vec` arena and link to each other by index, so moving
/// an element to the front or unlinking it is O(1). Vacated slots go on a
/// free list and are reused by later pushes.
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Push Front ==
    /// Inserts `value` as the most recently used element.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let slot = Slot {
            value: Some(value),
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = slot;
                id
            }
            None => {
                self.slots.push(slot);
                SlotId(self.slots.len() - 1)
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks an element as most recently used.
    pub fn move_to_front(&mut self, id: SlotId) {
        if self.head == Some(id) || !self.is_occupied(id) {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Removes an element and returns it, freeing its slot.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.is_occupied(id) {
            return None;
        }
        self.unlink(id);
        self.len -= 1;
        self.free.push(id);
        self.slots[id.0].value.take()
    }

    // == Pop Back ==
    /// Removes and returns the least recently used element.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    /// Returns the least recently used element without removing it.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Returns the most recently used element without moving it.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    // == Get ==
    /// Returns the element behind `id`, if it is still present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.value.as_ref())
    }

    /// Returns a mutable reference without changing its position.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|slot| slot.value.as_mut())
    }

    // == Length ==
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    /// Returns true if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every element and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn is_occupied(&self, id: SlotId) -> bool {
        self.slots
            .get(id.0)
            .is_some_and(|slot| slot.value.is_some())
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[id.0];
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(head) => self.slots[head.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = {
            let slot = &mut self.slots[id.0];
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(prev) => self.slots[prev.0].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next.0].prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Front-to-back iterator over a `RecencyList`.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let slot = &self.list.slots[id.0];
        self.cursor = slot.next;
        slot.value.as_ref()
    }
}
