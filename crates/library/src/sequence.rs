use common::TrackId;

#[derive(Clone, Debug)]
struct SeqNode {
    id: TrackId,
    next: Option<usize>,
}

/// Singly linked master list of track ids, in insertion order.
///
/// Nodes live in a slot arena; freed slots are recycled by later appends.
#[derive(Clone, Debug, Default)]
pub struct TrackSequence {
    slots: Vec<Option<SeqNode>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl TrackSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `id` at the tail. The caller guarantees the id is not present.
    pub fn append(&mut self, id: TrackId) {
        debug_assert!(!self.contains(id), "duplicate id {} in sequence", id);
        let node = SeqNode { id, next: None };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.slots[tail].as_mut() {
                    tail_node.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    pub fn remove(&mut self, id: TrackId) -> bool {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.slots[slot].as_ref() else {
                break;
            };
            let next = node.next;
            if node.id == id {
                match prev {
                    Some(prev) => {
                        if let Some(prev_node) = self.slots[prev].as_mut() {
                            prev_node.next = next;
                        }
                    }
                    None => self.head = next,
                }
                if self.tail == Some(slot) {
                    self.tail = prev;
                }
                self.slots[slot] = None;
                self.free.push(slot);
                self.len -= 1;
                return true;
            }
            prev = Some(slot);
            cursor = next;
        }
        false
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.iter().any(|candidate| candidate == id)
    }

    /// Walks the list from the head. Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
        }
    }
}

pub struct Iter<'a> {
    slots: &'a [Option<SeqNode>],
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = TrackId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slots.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        Some(node.id)
    }
}

impl<'a> IntoIterator for &'a TrackSequence {
    type Item = TrackId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
