use std::collections::HashMap;

use common::{Track, TrackId};

/// Pairs scoring at least this much are linked.
pub const SIMILARITY_THRESHOLD: u8 = 1;
const YEAR_WINDOW: u32 = 2;

/// Undirected, unweighted similarity graph stored as adjacency lists.
#[derive(Clone, Debug, Default)]
pub struct SimilarityGraph {
    adjacency: HashMap<TrackId, Vec<TrackId>>,
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every unordered pair of `tracks`. Quadratic in catalog size.
    pub fn build(tracks: &[&Track]) -> Self {
        let mut graph = Self::new();
        for track in tracks {
            graph.add_vertex(track.id);
        }
        for (i, a) in tracks.iter().enumerate() {
            for b in &tracks[i + 1..] {
                if similarity_score(a, b) >= SIMILARITY_THRESHOLD {
                    graph.add_edge(a.id, b.id);
                }
            }
        }
        graph
    }

    pub fn add_vertex(&mut self, id: TrackId) {
        self.adjacency.entry(id).or_default();
    }

    pub fn add_edge(&mut self, a: TrackId, b: TrackId) {
        if a == b {
            return;
        }
        let left = self.adjacency.entry(a).or_default();
        if !left.contains(&b) {
            left.push(b);
        }
        let right = self.adjacency.entry(b).or_default();
        if !right.contains(&a) {
            right.push(a);
        }
    }

    pub fn neighbors(&self, id: TrackId) -> &[TrackId] {
        self.adjacency
            .get(&id)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn vertices(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.adjacency.keys().copied()
    }
}

/// +2 for the same artist, +1 for the same genre, +1 when both years are
/// known and at most two apart. Text comparisons ignore case; empty values
/// never match.
pub fn similarity_score(a: &Track, b: &Track) -> u8 {
    let mut score = 0;
    if same_text(&a.artist, &b.artist) {
        score += 2;
    }
    if same_text(&a.genre, &b.genre) {
        score += 1;
    }
    if a.year != 0 && b.year != 0 && a.year.abs_diff(b.year) <= YEAR_WINDOW {
        score += 1;
    }
    score
}

fn same_text(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && a.to_lowercase() == b.to_lowercase()
}
