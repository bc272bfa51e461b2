use common::{Track, TrackId};

#[derive(Clone, Debug)]
struct GenreBucket {
    /// Casing of the first track that created the bucket.
    name: String,
    key: String,
    tracks: Vec<TrackId>,
}

/// Genre buckets in creation order, each holding track ids in insertion order.
#[derive(Clone, Debug, Default)]
pub struct GenreIndex {
    buckets: Vec<GenreBucket>,
}

impl GenreIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, track: &Track) {
        let key = genre_key(&track.genre);
        match self.buckets.iter_mut().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.tracks.push(track.id),
            None => self.buckets.push(GenreBucket {
                name: track.genre.clone(),
                key,
                tracks: vec![track.id],
            }),
        }
    }

    /// Drops `id` from whichever bucket holds it; empty buckets go away.
    pub fn remove(&mut self, id: TrackId) -> bool {
        let Some(pos) = self
            .buckets
            .iter()
            .position(|bucket| bucket.tracks.contains(&id))
        else {
            return false;
        };
        let bucket = &mut self.buckets[pos];
        bucket.tracks.retain(|candidate| *candidate != id);
        if bucket.tracks.is_empty() {
            self.buckets.remove(pos);
        }
        true
    }

    pub fn songs_of(&self, genre: &str) -> &[TrackId] {
        let key = genre_key(genre);
        self.buckets
            .iter()
            .find(|bucket| bucket.key == key)
            .map(|bucket| bucket.tracks.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_genres(&self) -> Vec<&str> {
        self.buckets.iter().map(|bucket| bucket.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket name holding `id`, if any.
    pub fn genre_of(&self, id: TrackId) -> Option<&str> {
        self.buckets
            .iter()
            .find(|bucket| bucket.tracks.contains(&id))
            .map(|bucket| bucket.name.as_str())
    }

    pub fn rebuild<'a, I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut index = Self::new();
        for track in tracks {
            index.add(track);
        }
        index
    }
}

fn genre_key(genre: &str) -> String {
    genre.to_lowercase()
}
