use std::path::Path;

use common::{relpath_from, RawTrackMetadata};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::filename::{infer_from_filename, UNKNOWN_GENRE};
use crate::{read_tags, MetadataError};

pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "wav", "flac"];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lower-case extensions without the dot.
    pub extensions: Vec<String>,
    /// Prefer embedded tags over what the file name says.
    pub read_tags: bool,
    /// Prepended to each file's path relative to the scan root.
    pub locator_prefix: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            read_tags: false,
            locator_prefix: String::new(),
        }
    }
}

pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();
    extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}

/// Walks `root` and describes every audio file in it, sorted by path.
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
) -> Result<Vec<RawTrackMetadata>, MetadataError> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("music root {:?} is not a directory", root),
        )
        .into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && is_audio_file(entry.path(), &options.extensions) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    info!("Found {} audio files under {:?}", files.len(), root);

    let mut records = Vec::with_capacity(files.len());
    for file in files {
        let Some(relpath) = relpath_from(root, &file) else {
            continue;
        };
        records.push(describe(&file, &relpath, options));
    }
    Ok(records)
}

fn describe(path: &Path, relpath: &str, options: &ScanOptions) -> RawTrackMetadata {
    let inferred = infer_from_filename(path);
    let mut raw = RawTrackMetadata {
        title: inferred.title,
        artist: inferred.artist,
        album: String::new(),
        genre: UNKNOWN_GENRE.to_string(),
        year: inferred.year,
        duration_secs: 0,
        path: locator(&options.locator_prefix, relpath),
    };

    if options.read_tags {
        match read_tags(path) {
            Ok(tags) => {
                if let Some(title) = tags.title {
                    raw.title = title;
                }
                if let Some(artist) = tags.artist {
                    raw.artist = artist;
                }
                if let Some(album) = tags.album {
                    raw.album = album;
                }
                if let Some(genre) = tags.genre {
                    raw.genre = genre;
                }
                if let Some(year) = tags.year {
                    raw.year = year;
                }
                if let Some(duration_secs) = tags.duration_secs {
                    raw.duration_secs = duration_secs;
                }
            }
            Err(err) => warn!("Tag read failed for {:?}: {}", path, err),
        }
    }

    raw
}

fn locator(prefix: &str, relpath: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        relpath.to_string()
    } else {
        format!("{}/{}", prefix, relpath)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{is_audio_file, scan_directory, ScanOptions};
    use crate::UNKNOWN_ARTIST;

    #[test]
    fn scans_only_audio_files_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("Nova - Night Drive.mp3"), b"").unwrap();
        fs::write(root.join("b/Harbor.WAV"), b"").unwrap();
        fs::write(root.join("cover.jpg"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();

        let options = ScanOptions {
            locator_prefix: "music/".to_string(),
            ..ScanOptions::default()
        };
        let records = scan_directory(root, &options).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "Night Drive");
        assert_eq!(records[0].artist, "Nova");
        assert_eq!(records[0].genre, "Unknown");
        assert_eq!(records[0].path, "music/Nova - Night Drive.mp3");

        assert_eq!(records[1].title, "Harbor");
        assert_eq!(records[1].artist, UNKNOWN_ARTIST);
        assert_eq!(records[1].path, "music/b/Harbor.WAV");
    }

    #[test]
    fn unreadable_tags_fall_back_to_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Linden - Paper Boats (1990).mp3"), b"not audio").unwrap();
        let options = ScanOptions {
            read_tags: true,
            ..ScanOptions::default()
        };
        let records = scan_directory(dir.path(), &options).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Paper Boats");
        assert_eq!(records[0].year, 1990);
        assert_eq!(records[0].path, "Linden - Paper Boats (1990).mp3");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(&dir.path().join("nope"), &ScanOptions::default()).is_err());
    }

    #[test]
    fn extension_match_ignores_case() {
        let exts = vec!["mp3".to_string()];
        assert!(is_audio_file(std::path::Path::new("a.MP3"), &exts));
        assert!(!is_audio_file(std::path::Path::new("a.flac"), &exts));
        assert!(!is_audio_file(std::path::Path::new("mp3"), &exts));
    }
}
