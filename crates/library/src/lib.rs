mod genre;
mod graph;
mod playback;
mod playlist;
mod sequence;
mod shared;
mod title;

use std::collections::HashMap;

use common::{RawTrackMetadata, Track, TrackId, TrackPatch};
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use genre::GenreIndex;
pub use graph::{similarity_score, SimilarityGraph, SIMILARITY_THRESHOLD};
pub use playback::{HistoryStack, UpNextQueue};
pub use playlist::{NodeHandle, Playlist};
pub use sequence::TrackSequence;
pub use shared::SharedLibrary;
pub use title::TitleIndex;

/// In-memory catalog plus every index over it.
///
/// All mutation goes through this type so the indexes never drift apart:
/// the id map owns the tracks, everything else holds ids.
#[derive(Clone, Debug)]
pub struct Library {
    tracks: HashMap<TrackId, Track>,
    sequence: TrackSequence,
    genres: GenreIndex,
    titles: TitleIndex,
    history: HistoryStack,
    up_next: UpNextQueue,
    graph: SimilarityGraph,
    playlists: HashMap<String, Playlist>,
    next_id: TrackId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub tracks: usize,
    pub genres: usize,
    pub playlists: usize,
    pub similarity_edges: usize,
    pub queued: usize,
    pub history: usize,
}

#[derive(Clone, Copy)]
enum Step {
    Forward,
    Backward,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            sequence: TrackSequence::new(),
            genres: GenreIndex::new(),
            titles: TitleIndex::new(),
            history: HistoryStack::new(),
            up_next: UpNextQueue::new(),
            graph: SimilarityGraph::new(),
            playlists: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawTrackMetadata>,
    {
        let mut library = Self::new();
        library.ingest(records);
        library
    }

    /// Replaces the whole catalog and restarts id allocation at 1.
    ///
    /// History, up-next and playlist entries follow their track to its new id
    /// when the same resource locator is ingested again; the rest are dropped.
    pub fn ingest<I>(&mut self, records: I) -> LibraryStats
    where
        I: IntoIterator<Item = RawTrackMetadata>,
    {
        let previous: HashMap<TrackId, String> = self
            .tracks
            .drain()
            .map(|(id, track)| (id, track.path))
            .collect();

        self.sequence = TrackSequence::new();
        self.genres = GenreIndex::new();
        self.titles = TitleIndex::new();
        self.graph = SimilarityGraph::new();
        self.next_id = 1;

        let mut by_path: HashMap<String, TrackId> = HashMap::new();
        for raw in records {
            let path = raw.path.clone();
            let id = self.insert_track(raw);
            by_path.entry(path).or_insert(id);
        }
        self.rebuild_graph();

        let relocate = |old: TrackId| {
            previous
                .get(&old)
                .and_then(|path| by_path.get(path))
                .copied()
        };
        self.history.remap(relocate);
        self.up_next.remap(relocate);
        for playlist in self.playlists.values_mut() {
            playlist.remap(relocate);
        }

        let stats = self.stats();
        info!(
            "Indexed {} tracks across {} genres ({} similarity links)",
            stats.tracks, stats.genres, stats.similarity_edges
        );
        stats
    }

    pub fn add_track(&mut self, raw: RawTrackMetadata) -> TrackId {
        let id = self.insert_track(raw);
        self.rebuild_graph();
        debug!("Added track {}", id);
        id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in ingestion order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> + '_ {
        self.sequence.iter().filter_map(move |id| self.tracks.get(&id))
    }

    pub fn all_tracks(&self) -> Vec<&Track> {
        self.tracks().collect()
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Tracks sorted by title, case-insensitively.
    pub fn tracks_by_title(&self) -> Vec<&Track> {
        self.resolve(self.titles.ids())
    }

    pub fn update_track(&mut self, id: TrackId, patch: TrackPatch) -> bool {
        let Some(track) = self.tracks.get_mut(&id) else {
            debug!("Update skipped; track {} not found", id);
            return false;
        };
        let changes = track.apply(patch);
        if changes.title {
            self.rebuild_titles();
        }
        if changes.genre {
            self.rebuild_genres();
        }
        self.rebuild_graph();
        debug!("Updated track {}", id);
        true
    }

    pub fn delete_track(&mut self, id: TrackId) -> bool {
        if !self.tracks.contains_key(&id) {
            debug!("Delete skipped; track {} not found", id);
            return false;
        }
        self.sequence.remove(id);
        self.genres.remove(id);
        for playlist in self.playlists.values_mut() {
            playlist.remove_all(id);
        }
        self.up_next.retain(|queued| *queued != id);
        self.history.retain(|played| *played != id);
        self.rebuild_titles();
        self.rebuild_graph();
        // Last, so the cleanup above could still resolve the id.
        self.tracks.remove(&id);
        debug!("Deleted track {}", id);
        true
    }

    pub fn genres(&self) -> Vec<&str> {
        self.genres.all_genres()
    }

    pub fn tracks_by_genre(&self, genre: &str) -> Vec<&Track> {
        self.resolve(self.genres.songs_of(genre).iter().copied())
    }

    /// Exact title first; without one, every title containing `query`.
    pub fn search_by_title(&self, query: &str) -> Vec<&Track> {
        match self.titles.search_exact(query) {
            Some(id) => self.resolve([id]),
            None => self.resolve(self.titles.search_substring(query)),
        }
    }

    pub fn record_play(&mut self, id: TrackId) -> bool {
        let Some(track) = self.tracks.get_mut(&id) else {
            return false;
        };
        track.play_count += 1;
        self.history.push(id);
        true
    }

    pub fn history(&self, limit: usize) -> Vec<&Track> {
        self.resolve(self.history.to_list(limit))
    }

    pub fn enqueue(&mut self, id: TrackId) -> bool {
        if !self.tracks.contains_key(&id) {
            return false;
        }
        self.up_next.enqueue(id);
        true
    }

    pub fn dequeue(&mut self) -> Option<&Track> {
        let id = self.up_next.dequeue()?;
        self.tracks.get(&id)
    }

    pub fn queue(&self) -> Vec<&Track> {
        self.resolve(self.up_next.to_list().iter().copied())
    }

    pub fn similar_ids(&self, id: TrackId) -> &[TrackId] {
        self.graph.neighbors(id)
    }

    /// A random neighbour of `id`, or any random track when it has none.
    pub fn next_similar(&self, id: TrackId) -> Option<&Track> {
        let id = self.similar_pick(id)?;
        self.tracks.get(&id)
    }

    /// Playlist successor, then up-next, then a similar or random track.
    pub fn next_track(
        &mut self,
        current: Option<TrackId>,
        playlist: Option<&str>,
    ) -> Option<&Track> {
        let id = self.next_track_id(current, playlist)?;
        self.tracks.get(&id)
    }

    /// Playlist predecessor, otherwise steps back one entry in the history.
    pub fn previous_track(
        &mut self,
        current: Option<TrackId>,
        playlist: Option<&str>,
    ) -> Option<&Track> {
        let id = self.previous_track_id(current, playlist)?;
        self.tracks.get(&id)
    }

    pub fn create_playlist(&mut self, name: &str) -> bool {
        if self.playlists.contains_key(name) {
            return false;
        }
        self.playlists.insert(name.to_string(), Playlist::new(name));
        true
    }

    pub fn delete_playlist(&mut self, name: &str) -> bool {
        self.playlists.remove(name).is_some()
    }

    pub fn add_to_playlist(&mut self, name: &str, id: TrackId) -> bool {
        if !self.tracks.contains_key(&id) {
            return false;
        }
        match self.playlists.get_mut(name) {
            Some(playlist) => {
                playlist.append(id);
                true
            }
            None => false,
        }
    }

    pub fn remove_from_playlist(&mut self, name: &str, id: TrackId) -> bool {
        self.playlists
            .get_mut(name)
            .map(|playlist| playlist.remove(id))
            .unwrap_or(false)
    }

    pub fn playlist_tracks(&self, name: &str) -> Vec<&Track> {
        match self.playlists.get(name) {
            Some(playlist) => self.resolve(playlist.iter()),
            None => Vec::new(),
        }
    }

    pub fn playlist_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.playlists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            tracks: self.tracks.len(),
            genres: self.genres.len(),
            playlists: self.playlists.len(),
            similarity_edges: self.graph.edge_count(),
            queued: self.up_next.len(),
            history: self.history.len(),
        }
    }

    fn insert_track(&mut self, raw: RawTrackMetadata) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;
        let track = Track::from_raw(id, raw);
        self.sequence.append(id);
        self.genres.add(&track);
        self.titles.insert(&track.title, id);
        self.graph.add_vertex(id);
        self.tracks.insert(id, track);
        id
    }

    fn rebuild_titles(&mut self) {
        let tracks = &self.tracks;
        self.titles = TitleIndex::rebuild(
            self.sequence
                .iter()
                .filter_map(|id| tracks.get(&id).map(|track| (track.title.as_str(), id))),
        );
    }

    fn rebuild_genres(&mut self) {
        let tracks = &self.tracks;
        self.genres = GenreIndex::rebuild(self.sequence.iter().filter_map(|id| tracks.get(&id)));
    }

    fn rebuild_graph(&mut self) {
        let ordered: Vec<&Track> = self
            .sequence
            .iter()
            .filter_map(|id| self.tracks.get(&id))
            .collect();
        self.graph = SimilarityGraph::build(&ordered);
    }

    fn next_track_id(&mut self, current: Option<TrackId>, playlist: Option<&str>) -> Option<TrackId> {
        if let Some(id) = self.playlist_step(current, playlist, Step::Forward) {
            return Some(id);
        }
        if let Some(id) = self.up_next.dequeue() {
            return Some(id);
        }
        match current {
            Some(id) => self.similar_pick(id),
            None => self.random_pick(),
        }
    }

    fn previous_track_id(
        &mut self,
        current: Option<TrackId>,
        playlist: Option<&str>,
    ) -> Option<TrackId> {
        if let Some(id) = self.playlist_step(current, playlist, Step::Backward) {
            return Some(id);
        }
        // Top of the history is the track playing now.
        self.history.pop()?;
        self.history.peek()
    }

    fn playlist_step(
        &self,
        current: Option<TrackId>,
        playlist: Option<&str>,
        step: Step,
    ) -> Option<TrackId> {
        let playlist = self.playlists.get(playlist?)?;
        let node = playlist.find_node(current?)?;
        match step {
            Step::Forward => playlist.next(node),
            Step::Backward => playlist.previous(node),
        }
    }

    fn similar_pick(&self, id: TrackId) -> Option<TrackId> {
        let mut neighbors = self.graph.neighbors(id).to_vec();
        neighbors.shuffle(&mut rand::rng());
        neighbors
            .into_iter()
            .find(|candidate| self.tracks.contains_key(candidate))
            .or_else(|| self.random_pick())
    }

    fn random_pick(&self) -> Option<TrackId> {
        let ids: Vec<TrackId> = self.sequence.iter().collect();
        ids.choose(&mut rand::rng()).copied()
    }

    fn resolve<I>(&self, ids: I) -> Vec<&Track>
    where
        I: IntoIterator<Item = TrackId>,
    {
        ids.into_iter()
            .filter_map(|id| self.tracks.get(&id))
            .collect()
    }
}
