use common::TrackId;

#[derive(Clone, Debug)]
struct TitleNode {
    key: String,
    id: TrackId,
    left: Option<usize>,
    right: Option<usize>,
}

/// Unbalanced binary search tree over lower-cased titles.
///
/// Shape follows insertion order, so a pre-sorted ingest degrades lookups to
/// a linear walk. Equal keys go to the right subtree.
#[derive(Clone, Debug, Default)]
pub struct TitleIndex {
    nodes: Vec<TitleNode>,
    root: Option<usize>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, title: &str, id: TrackId) {
        let key = title.to_lowercase();
        let slot = self.nodes.len();
        let Some(mut cursor) = self.root else {
            self.nodes.push(TitleNode { key, id, left: None, right: None });
            self.root = Some(slot);
            return;
        };
        loop {
            let node = &mut self.nodes[cursor];
            let branch = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            match *branch {
                Some(child) => cursor = child,
                None => {
                    *branch = Some(slot);
                    break;
                }
            }
        }
        self.nodes.push(TitleNode { key, id, left: None, right: None });
    }

    pub fn search_exact(&self, title: &str) -> Option<TrackId> {
        let key = title.to_lowercase();
        let mut cursor = self.root;
        while let Some(slot) = cursor {
            let node = &self.nodes[slot];
            if key == node.key {
                return Some(node.id);
            }
            cursor = if key < node.key { node.left } else { node.right };
        }
        None
    }

    /// Every id whose title contains `query`, in title order.
    pub fn search_substring(&self, query: &str) -> Vec<TrackId> {
        let query = query.to_lowercase();
        self.in_order()
            .filter(|node| node.key.contains(&query))
            .map(|node| node.id)
            .collect()
    }

    /// All ids sorted by title.
    pub fn ids(&self) -> Vec<TrackId> {
        self.in_order().map(|node| node.id).collect()
    }

    /// Longest root-to-leaf path; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((slot, depth)) = stack.pop() {
            best = best.max(depth);
            let node = &self.nodes[slot];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        best
    }

    pub fn rebuild<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, TrackId)>,
    {
        let mut index = Self::new();
        for (title, id) in entries {
            index.insert(title, id);
        }
        index
    }

    // Explicit stack; a degenerate tree would overflow a recursive walk.
    fn in_order(&self) -> InOrder<'_> {
        InOrder {
            nodes: &self.nodes,
            stack: Vec::new(),
            cursor: self.root,
        }
    }
}

struct InOrder<'a> {
    nodes: &'a [TitleNode],
    stack: Vec<usize>,
    cursor: Option<usize>,
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a TitleNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.cursor {
            self.stack.push(slot);
            self.cursor = self.nodes[slot].left;
        }
        let slot = self.stack.pop()?;
        let node = &self.nodes[slot];
        self.cursor = node.right;
        Some(node)
    }
}
