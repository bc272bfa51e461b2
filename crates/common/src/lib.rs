use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog-wide track identifier. Allocated from 1 upwards by the library.
pub type TrackId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Release year, 0 when unknown.
    pub year: u32,
    pub duration_secs: u32,
    /// Opaque playable-resource locator handed over by the scanner.
    pub path: String,
    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub favorite: bool,
}

impl Track {
    pub fn from_raw(id: TrackId, raw: RawTrackMetadata) -> Self {
        Self {
            id,
            title: raw.title,
            artist: raw.artist,
            album: raw.album,
            genre: raw.genre,
            year: raw.year,
            duration_secs: raw.duration_secs,
            path: raw.path,
            play_count: 0,
            favorite: false,
        }
    }

    pub fn audio_url(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }

    /// Applies every present field of `patch`. Returns which index keys moved.
    pub fn apply(&mut self, patch: TrackPatch) -> KeyChanges {
        let mut changes = KeyChanges::default();
        if let Some(title) = patch.title {
            changes.title = title != self.title;
            self.title = title;
        }
        if let Some(artist) = patch.artist {
            self.artist = artist;
        }
        if let Some(album) = patch.album {
            self.album = album;
        }
        if let Some(genre) = patch.genre {
            changes.genre = genre != self.genre;
            self.genre = genre;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(duration_secs) = patch.duration_secs {
            self.duration_secs = duration_secs;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        changes
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyChanges {
    pub title: bool,
    pub genre: bool,
}

/// What the external scanner hands over for each playable file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: u32,
    pub duration_secs: u32,
    pub path: String,
}

/// Field changes for an existing track. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub duration_secs: Option<u32>,
    pub path: Option<String>,
    pub favorite: Option<bool>,
}

impl TrackPatch {
    /// Builds a patch from loosely typed form fields.
    ///
    /// Unknown keys are ignored. Numeric fields that fail to parse fall back
    /// to 0, so a blank `year` clears the year instead of rejecting the edit.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut patch = Self::default();
        for (key, value) in fields {
            match key.trim() {
                "title" => patch.title = Some(value.to_string()),
                "artist" => patch.artist = Some(value.to_string()),
                "album" => patch.album = Some(value.to_string()),
                "genre" => patch.genre = Some(value.to_string()),
                "year" => patch.year = Some(parse_number(value)),
                "duration_secs" | "duration" => patch.duration_secs = Some(parse_number(value)),
                "path" => patch.path = Some(value.to_string()),
                "favorite" | "is_favorite" => patch.favorite = Some(parse_flag(value)),
                _ => {}
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A track as the web layer renders it: every attribute plus the playable URL.
#[derive(Clone, Debug, Serialize)]
pub struct TrackView<'a> {
    #[serde(flatten)]
    pub track: &'a Track,
    pub audio_url: String,
}

impl<'a> From<&'a Track> for TrackView<'a> {
    fn from(track: &'a Track) -> Self {
        Self {
            track,
            audio_url: track.audio_url(),
        }
    }
}

pub fn relpath_from(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(path_to_slash_string(rel))
}

pub fn join_relpath(root: &Path, relpath: &str) -> PathBuf {
    let mut out = PathBuf::from(root);
    for part in relpath.split('/') {
        if part.is_empty() {
            continue;
        }
        out.push(part);
    }
    out
}

pub fn path_to_slash_string(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    parts.join("/")
}

fn parse_number(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
