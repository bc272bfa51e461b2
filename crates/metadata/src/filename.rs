use std::path::Path;

use crate::parse_year;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameInfo {
    pub title: String,
    pub artist: String,
    pub year: u32,
}

/// Reads `Artist - Title` (optionally `Title (1999)`) out of a file name.
///
/// Without a separator the whole stem is the title and the artist is
/// [`UNKNOWN_ARTIST`]. Only the first ` - ` splits.
pub fn infer_from_filename(path: &Path) -> FilenameInfo {
    let stem = file_stem(path);
    let (artist, rest) = match stem.split_once(" - ") {
        Some((artist, title)) if !artist.trim().is_empty() => (artist.trim().to_string(), title),
        _ => (UNKNOWN_ARTIST.to_string(), stem.as_str()),
    };
    let (title, year) = split_title_year(rest);
    FilenameInfo {
        title,
        artist,
        year: year.unwrap_or(0),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown Track".to_string())
}

fn split_title_year(input: &str) -> (String, Option<u32>) {
    let trimmed = input.trim();
    for (open, close) in [('(', ')'), ('[', ']')] {
        if let Some((title, year)) = split_year_suffix(trimmed, open, close) {
            return (title.to_string(), Some(year));
        }
    }
    (trimmed.to_string(), None)
}

fn split_year_suffix(input: &str, open: char, close: char) -> Option<(&str, u32)> {
    let inner = input.strip_suffix(close)?;
    let start = inner.rfind(open)?;
    let candidate = &inner[start + open.len_utf8()..];
    if candidate.len() != 4 || !candidate.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let title = inner[..start].trim();
    if title.is_empty() {
        return None;
    }
    Some((title, parse_year(candidate)?))
}

#[cfg(test)]
mod tests {
    use super::{infer_from_filename, FilenameInfo, UNKNOWN_ARTIST};
    use std::path::Path;

    fn infer(name: &str) -> FilenameInfo {
        infer_from_filename(Path::new(name))
    }

    #[test]
    fn splits_artist_and_title() {
        let info = infer("music/Nova - Night Drive.mp3");
        assert_eq!(info.artist, "Nova");
        assert_eq!(info.title, "Night Drive");
        assert_eq!(info.year, 0);
    }

    #[test]
    fn only_first_separator_splits() {
        let info = infer("Nova - Night - Drive.wav");
        assert_eq!(info.artist, "Nova");
        assert_eq!(info.title, "Night - Drive");
    }

    #[test]
    fn bare_title_gets_unknown_artist() {
        let info = infer("Harbor.mp3");
        assert_eq!(info.artist, UNKNOWN_ARTIST);
        assert_eq!(info.title, "Harbor");
    }

    #[test]
    fn trailing_year_is_extracted() {
        let info = infer("Quiet Coast - Harbor (1971).flac");
        assert_eq!(info.title, "Harbor");
        assert_eq!(info.year, 1971);

        let info = infer("Linden - Paper Boats [1990].mp3");
        assert_eq!(info.title, "Paper Boats");
        assert_eq!(info.year, 1990);

        let info = infer("Mix (Live).mp3");
        assert_eq!(info.title, "Mix (Live)");
        assert_eq!(info.year, 0);
    }
}
