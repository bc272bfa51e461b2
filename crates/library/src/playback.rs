use common::TrackId;

/// Consumed entries allowed to pile up before the queue considers compacting.
const QUEUE_COMPACT_THRESHOLD: usize = 32;

/// Listening history, most recent play on top.
#[derive(Clone, Debug, Default)]
pub struct HistoryStack {
    items: Vec<TrackId>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: TrackId) {
        self.items.push(id);
    }

    pub fn pop(&mut self) -> Option<TrackId> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<TrackId> {
        self.items.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Most recent first, at most `limit` entries.
    pub fn to_list(&self, limit: usize) -> Vec<TrackId> {
        self.items.iter().rev().take(limit).copied().collect()
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&TrackId) -> bool,
    {
        self.items.retain(keep);
    }

    pub(crate) fn remap<F>(&mut self, map: F)
    where
        F: FnMut(TrackId) -> Option<TrackId>,
    {
        let items = std::mem::take(&mut self.items);
        self.items = items.into_iter().filter_map(map).collect();
    }
}

/// Up-next FIFO. Dequeue advances a head index; the consumed prefix is
/// dropped once it is both past the threshold and larger than the live part.
#[derive(Clone, Debug, Default)]
pub struct UpNextQueue {
    data: Vec<TrackId>,
    head: usize,
}

impl UpNextQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, id: TrackId) {
        self.data.push(id);
    }

    pub fn dequeue(&mut self) -> Option<TrackId> {
        let id = *self.data.get(self.head)?;
        self.head += 1;
        if self.head > QUEUE_COMPACT_THRESHOLD && self.head * 2 > self.data.len() {
            self.data.drain(..self.head);
            self.head = 0;
        }
        Some(id)
    }

    pub fn peek(&self) -> Option<TrackId> {
        self.data.get(self.head).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.head >= self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.head
    }

    pub fn to_list(&self) -> &[TrackId] {
        &self.data[self.head..]
    }

    /// Filters the pending entries in place and drops the consumed prefix.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&TrackId) -> bool,
    {
        self.data.drain(..self.head);
        self.head = 0;
        self.data.retain(keep);
    }

    pub(crate) fn remap<F>(&mut self, map: F)
    where
        F: FnMut(TrackId) -> Option<TrackId>,
    {
        let data = std::mem::take(&mut self.data);
        self.data = data.into_iter().skip(self.head).filter_map(map).collect();
        self.head = 0;
    }

    #[cfg(test)]
    fn backing_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryStack, UpNextQueue, QUEUE_COMPACT_THRESHOLD};

    #[test]
    fn history_lists_most_recent_first() {
        let mut history = HistoryStack::new();
        for id in [1, 2, 3] {
            history.push(id);
        }
        assert_eq!(history.to_list(2), vec![3, 2]);
        assert_eq!(history.to_list(10), vec![3, 2, 1]);
        assert_eq!(history.peek(), Some(3));
        assert_eq!(history.pop(), Some(3));
        assert_eq!(history.peek(), Some(2));
    }

    #[test]
    fn history_retain_filters_every_occurrence() {
        let mut history = HistoryStack::new();
        for id in [1, 2, 1, 3, 1] {
            history.push(id);
        }
        history.retain(|id| *id != 1);
        assert_eq!(history.to_list(10), vec![3, 2]);
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = UpNextQueue::new();
        for id in [1, 2, 3] {
            queue.enqueue(id);
        }
        assert_eq!(queue.peek(), Some(1));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_compacts_consumed_prefix() {
        let mut queue = UpNextQueue::new();
        let total = 40u64;
        for id in 0..total {
            queue.enqueue(id);
        }
        let consumed = QUEUE_COMPACT_THRESHOLD as u64 + 1;
        for expected in 0..consumed {
            assert_eq!(queue.dequeue(), Some(expected));
        }
        assert_eq!(queue.backing_len(), (total - consumed) as usize);
        assert_eq!(queue.to_list().first(), Some(&consumed));
        assert_eq!(queue.len(), (total - consumed) as usize);
    }

    #[test]
    fn queue_does_not_compact_when_live_part_dominates() {
        let mut queue = UpNextQueue::new();
        for id in 0..100 {
            queue.enqueue(id);
        }
        for _ in 0..40 {
            queue.dequeue();
        }
        assert_eq!(queue.backing_len(), 100);
        assert_eq!(queue.peek(), Some(40));
    }

    #[test]
    fn queue_retain_sees_only_pending_entries() {
        let mut queue = UpNextQueue::new();
        for id in [5, 6, 7, 6] {
            queue.enqueue(id);
        }
        queue.dequeue();
        queue.retain(|id| *id != 6);
        assert_eq!(queue.to_list(), &[7]);
    }
}
