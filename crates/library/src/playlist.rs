use common::TrackId;

/// Stable handle to a playlist entry, valid until that entry is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeHandle(usize);

#[derive(Clone, Debug)]
struct PlaylistNode {
    id: TrackId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Named, doubly linked list of track ids. The same track may appear twice.
#[derive(Clone, Debug)]
pub struct Playlist {
    name: String,
    slots: Vec<Option<PlaylistNode>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn append(&mut self, id: TrackId) -> NodeHandle {
        let node = PlaylistNode {
            id,
            prev: self.tail,
            next: None,
        };
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
        match self.tail.and_then(|tail| self.slots[tail].as_mut()) {
            Some(tail_node) => tail_node.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        NodeHandle(slot)
    }

    /// Unlinks the first entry for `id`.
    pub fn remove(&mut self, id: TrackId) -> bool {
        match self.find_node(id) {
            Some(handle) => {
                self.unlink(handle.0);
                true
            }
            None => false,
        }
    }

    /// Unlinks every entry for `id`, returning how many went away.
    pub fn remove_all(&mut self, id: TrackId) -> usize {
        let mut removed = 0;
        while self.remove(id) {
            removed += 1;
        }
        removed
    }

    pub fn find_node(&self, id: TrackId) -> Option<NodeHandle> {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.slots[slot].as_ref()?;
            if node.id == id {
                return Some(NodeHandle(slot));
            }
            cursor = node.next;
        }
        None
    }

    pub fn track_at(&self, handle: NodeHandle) -> Option<TrackId> {
        self.node(handle).map(|node| node.id)
    }

    pub fn next(&self, handle: NodeHandle) -> Option<TrackId> {
        let next = self.node(handle)?.next?;
        self.slots[next].as_ref().map(|node| node.id)
    }

    pub fn previous(&self, handle: NodeHandle) -> Option<TrackId> {
        let prev = self.node(handle)?.prev?;
        self.slots[prev].as_ref().map(|node| node.id)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
        }
    }

    pub fn to_list(&self) -> Vec<TrackId> {
        self.iter().collect()
    }

    /// Rewrites every entry through `map`, dropping those it rejects.
    pub(crate) fn remap<F>(&mut self, mut map: F)
    where
        F: FnMut(TrackId) -> Option<TrackId>,
    {
        let entries = self.to_list();
        let mut rebuilt = Playlist::new(std::mem::take(&mut self.name));
        for id in entries.into_iter().filter_map(&mut map) {
            rebuilt.append(id);
        }
        *self = rebuilt;
    }

    fn node(&self, handle: NodeHandle) -> Option<&PlaylistNode> {
        self.slots.get(handle.0)?.as_ref()
    }

    fn unlink(&mut self, slot: usize) {
        let Some(node) = self.slots[slot].take() else {
            return;
        };
        match node.prev.and_then(|prev| self.slots[prev].as_mut()) {
            Some(prev_node) => prev_node.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.slots[next].as_mut()) {
            Some(next_node) => next_node.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(slot);
        self.len -= 1;
    }
}

pub struct Iter<'a> {
    slots: &'a [Option<PlaylistNode>],
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

#[cfg(test)]
mod tests {
    use super::Playlist;

    fn drive() -> Playlist {
        let mut playlist = Playlist::new("Drive");
        for id in [1, 2, 3] {
            playlist.append(id);
        }
        playlist
    }

    #[test]
    fn navigates_from_found_node() {
        let playlist = drive();
        let node = playlist.find_node(2).unwrap();
        assert_eq!(playlist.track_at(node), Some(2));
        assert_eq!(playlist.previous(node), Some(1));
        assert_eq!(playlist.next(node), Some(3));

        let first = playlist.find_node(1).unwrap();
        assert_eq!(playlist.previous(first), None);
        let last = playlist.find_node(3).unwrap();
        assert_eq!(playlist.next(last), None);
    }

    #[test]
    fn remove_fixes_neighbour_links() {
        let mut playlist = drive();
        assert!(playlist.remove(2));
        assert_eq!(playlist.to_list(), vec![1, 3]);
        let first = playlist.find_node(1).unwrap();
        assert_eq!(playlist.next(first), Some(3));
        let last = playlist.find_node(3).unwrap();
        assert_eq!(playlist.previous(last), Some(1));

        assert!(playlist.remove(1));
        assert!(playlist.remove(3));
        assert!(playlist.is_empty());
        assert!(!playlist.remove(3));

        playlist.append(7);
        assert_eq!(playlist.to_list(), vec![7]);
    }

    #[test]
    fn keeps_duplicates_and_removes_first_occurrence() {
        let mut playlist = Playlist::new("Loop");
        for id in [4, 5, 4, 6, 4] {
            playlist.append(id);
        }
        assert_eq!(playlist.len(), 5);
        assert!(playlist.remove(4));
        assert_eq!(playlist.to_list(), vec![5, 4, 6, 4]);
        assert_eq!(playlist.remove_all(4), 2);
        assert_eq!(playlist.to_list(), vec![5, 6]);
    }

    #[test]
    fn remap_preserves_order_and_name() {
        let mut playlist = drive();
        playlist.remap(|id| if id == 2 { None } else { Some(id * 10) });
        assert_eq!(playlist.name(), "Drive");
        assert_eq!(playlist.to_list(), vec![10, 30]);
    }
}
