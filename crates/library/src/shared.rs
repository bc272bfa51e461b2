use std::sync::Arc;

use common::{RawTrackMetadata, Track, TrackId, TrackPatch};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Library, LibraryStats};

/// Cloneable handle for sharing one [`Library`] between request handlers.
///
/// Mutations take the write lock for their whole run, since index rebuilds
/// leave the structures half-built in between. Queries share the read lock
/// and hand back owned copies.
#[derive(Clone, Default)]
pub struct SharedLibrary {
    inner: Arc<RwLock<Library>>,
}

impl SharedLibrary {
    pub fn new(library: Library) -> Self {
        Self {
            inner: Arc::new(RwLock::new(library)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Library> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Library> {
        self.inner.write()
    }

    pub fn ingest(&self, records: Vec<RawTrackMetadata>) -> LibraryStats {
        self.inner.write().ingest(records)
    }

    pub fn add_track(&self, raw: RawTrackMetadata) -> TrackId {
        self.inner.write().add_track(raw)
    }

    pub fn all_tracks(&self) -> Vec<Track> {
        self.inner.read().tracks().cloned().collect()
    }

    pub fn track(&self, id: TrackId) -> Option<Track> {
        self.inner.read().track(id).cloned()
    }

    pub fn update_track(&self, id: TrackId, patch: TrackPatch) -> bool {
        self.inner.write().update_track(id, patch)
    }

    pub fn delete_track(&self, id: TrackId) -> bool {
        self.inner.write().delete_track(id)
    }

    pub fn genres(&self) -> Vec<String> {
        self.inner
            .read()
            .genres()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn tracks_by_genre(&self, genre: &str) -> Vec<Track> {
        owned(self.inner.read().tracks_by_genre(genre))
    }

    pub fn search_by_title(&self, query: &str) -> Vec<Track> {
        owned(self.inner.read().search_by_title(query))
    }

    pub fn record_play(&self, id: TrackId) -> bool {
        self.inner.write().record_play(id)
    }

    pub fn history(&self, limit: usize) -> Vec<Track> {
        owned(self.inner.read().history(limit))
    }

    pub fn enqueue(&self, id: TrackId) -> bool {
        self.inner.write().enqueue(id)
    }

    pub fn dequeue(&self) -> Option<Track> {
        self.inner.write().dequeue().cloned()
    }

    pub fn queue(&self) -> Vec<Track> {
        owned(self.inner.read().queue())
    }

    pub fn similar_ids(&self, id: TrackId) -> Vec<TrackId> {
        self.inner.read().similar_ids(id).to_vec()
    }

    pub fn next_track(&self, current: Option<TrackId>, playlist: Option<&str>) -> Option<Track> {
        self.inner.write().next_track(current, playlist).cloned()
    }

    pub fn previous_track(
        &self,
        current: Option<TrackId>,
        playlist: Option<&str>,
    ) -> Option<Track> {
        self.inner.write().previous_track(current, playlist).cloned()
    }

    pub fn create_playlist(&self, name: &str) -> bool {
        self.inner.write().create_playlist(name)
    }

    pub fn delete_playlist(&self, name: &str) -> bool {
        self.inner.write().delete_playlist(name)
    }

    pub fn add_to_playlist(&self, name: &str, id: TrackId) -> bool {
        self.inner.write().add_to_playlist(name, id)
    }

    pub fn remove_from_playlist(&self, name: &str, id: TrackId) -> bool {
        self.inner.write().remove_from_playlist(name, id)
    }

    pub fn playlist_tracks(&self, name: &str) -> Vec<Track> {
        owned(self.inner.read().playlist_tracks(name))
    }

    pub fn stats(&self) -> LibraryStats {
        self.inner.read().stats()
    }
}

fn owned(tracks: Vec<&Track>) -> Vec<Track> {
    tracks.into_iter().cloned().collect()
}
