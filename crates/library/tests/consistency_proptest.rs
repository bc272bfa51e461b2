//! Property tests: random ingest/update/delete/playback sequences must leave
//! every index agreeing with the catalog.

use std::collections::HashSet;

use common::{RawTrackMetadata, TrackId, TrackPatch};
use library::Library;
use proptest::prelude::*;

const TITLES: &[&str] = &["Night Drive", "neon rain", "Harbor", "Afterglow", "night", "Paper Boats"];
const ARTISTS: &[&str] = &["Nova", "nova", "Linden", "", "Quiet Coast"];
const GENRES: &[&str] = &["Synth", "synth", "Folk", "Rock", ""];

#[derive(Clone, Debug)]
enum Op {
    Add(RawTrackMetadata),
    Update(TrackId, TrackPatch),
    Delete(TrackId),
    Enqueue(TrackId),
    Play(TrackId),
    AddToPlaylist(TrackId),
    Next,
    Previous,
}

fn raw_track() -> impl Strategy<Value = RawTrackMetadata> {
    (
        0..TITLES.len(),
        0..ARTISTS.len(),
        0..GENRES.len(),
        prop_oneof![Just(0u32), 1995u32..2005],
        any::<u16>(),
    )
        .prop_map(|(title, artist, genre, year, tag)| RawTrackMetadata {
            title: TITLES[title].to_string(),
            artist: ARTISTS[artist].to_string(),
            album: String::new(),
            genre: GENRES[genre].to_string(),
            year,
            duration_secs: 200,
            path: format!("music/{}-{}.mp3", TITLES[title], tag),
        })
}

fn patch() -> impl Strategy<Value = TrackPatch> {
    (
        proptest::option::of(0..TITLES.len()),
        proptest::option::of(0..ARTISTS.len()),
        proptest::option::of(0..GENRES.len()),
        proptest::option::of(prop_oneof![Just(0u32), 1995u32..2005]),
    )
        .prop_map(|(title, artist, genre, year)| TrackPatch {
            title: title.map(|i| TITLES[i].to_string()),
            artist: artist.map(|i| ARTISTS[i].to_string()),
            genre: genre.map(|i| GENRES[i].to_string()),
            year,
            ..TrackPatch::default()
        })
}

fn op() -> impl Strategy<Value = Op> {
    let id = 1u64..16;
    prop_oneof![
        raw_track().prop_map(Op::Add),
        (id.clone(), patch()).prop_map(|(id, patch)| Op::Update(id, patch)),
        id.clone().prop_map(Op::Delete),
        id.clone().prop_map(Op::Enqueue),
        id.clone().prop_map(Op::Play),
        id.prop_map(Op::AddToPlaylist),
        Just(Op::Next),
        Just(Op::Previous),
    ]
}

fn apply(library: &mut Library, op: Op) {
    match op {
        Op::Add(raw) => {
            library.add_track(raw);
        }
        Op::Update(id, patch) => {
            library.update_track(id, patch);
        }
        Op::Delete(id) => {
            library.delete_track(id);
        }
        Op::Enqueue(id) => {
            library.enqueue(id);
        }
        Op::Play(id) => {
            library.record_play(id);
        }
        Op::AddToPlaylist(id) => {
            library.add_to_playlist("Mix", id);
        }
        Op::Next => {
            library.next_track(None, Some("Mix"));
        }
        Op::Previous => {
            library.previous_track(None, Some("Mix"));
        }
    }
}

fn check(library: &Library) {
    let catalog: Vec<TrackId> = library.all_tracks().iter().map(|t| t.id).collect();
    let catalog_set: HashSet<TrackId> = catalog.iter().copied().collect();
    assert_eq!(catalog.len(), catalog_set.len(), "duplicate ids in master sequence");
    assert_eq!(catalog.len(), library.len());

    let by_title: HashSet<TrackId> = library.tracks_by_title().iter().map(|t| t.id).collect();
    assert_eq!(by_title, catalog_set);
    assert_eq!(library.tracks_by_title().len(), catalog.len());

    let mut bucketed = 0;
    for genre in library.genres() {
        let members = library.tracks_by_genre(genre);
        assert!(!members.is_empty());
        for track in &members {
            assert_eq!(track.genre.to_lowercase(), genre.to_lowercase());
        }
        bucketed += members.len();
    }
    assert_eq!(bucketed, catalog.len());

    for id in &catalog {
        for neighbor in library.similar_ids(*id) {
            assert!(catalog_set.contains(neighbor));
            assert!(library.similar_ids(*neighbor).contains(id));
        }
    }

    assert!(library.queue().iter().all(|t| catalog_set.contains(&t.id)));
    assert!(library.history(usize::MAX).iter().all(|t| catalog_set.contains(&t.id)));
    assert!(library.playlist_tracks("Mix").iter().all(|t| catalog_set.contains(&t.id)));
}

proptest! {
    #[test]
    fn indexes_stay_consistent(
        seed in proptest::collection::vec(raw_track(), 0..8),
        ops in proptest::collection::vec(op(), 0..40),
    ) {
        let mut library = Library::from_records(seed);
        library.create_playlist("Mix");
        check(&library);
        let mut deleted = HashSet::new();
        for op in ops {
            if let Op::Delete(id) = &op {
                if library.track(*id).is_some() {
                    deleted.insert(*id);
                }
            }
            apply(&mut library, op);
            check(&library);
            for id in &deleted {
                prop_assert!(library.track(*id).is_none());
            }
        }
    }

    #[test]
    fn substring_search_matches_naive_filter(
        seed in proptest::collection::vec(raw_track(), 0..12),
        query in "[a-zA-Z ]{0,4}",
    ) {
        let library = Library::from_records(seed);
        let found: Vec<TrackId> = library.search_by_title(&query).iter().map(|t| t.id).collect();
        let needle = query.to_lowercase();
        let exact: Vec<TrackId> = library
            .all_tracks()
            .iter()
            .filter(|t| t.title.to_lowercase() == needle)
            .map(|t| t.id)
            .collect();
        if exact.is_empty() {
            let mut expected: Vec<TrackId> = library
                .all_tracks()
                .iter()
                .filter(|t| t.title.to_lowercase().contains(&needle))
                .map(|t| t.id)
                .collect();
            let mut got = found.clone();
            expected.sort_unstable();
            got.sort_unstable();
            prop_assert_eq!(got, expected);
        } else {
            prop_assert_eq!(found.len(), 1);
            prop_assert!(exact.contains(&found[0]));
        }
    }

    #[test]
    fn queue_and_history_orders(ids in proptest::collection::vec(1u64..6, 1..10)) {
        let mut library = Library::from_records((0..5).map(|n| RawTrackMetadata {
            title: format!("t{}", n),
            path: format!("t{}.mp3", n),
            ..RawTrackMetadata::default()
        }));
        for id in &ids {
            library.enqueue(*id);
            library.record_play(*id);
        }
        let mut dequeued = Vec::new();
        while let Some(track) = library.dequeue() {
            dequeued.push(track.id);
        }
        prop_assert_eq!(&dequeued, &ids);
        let history: Vec<TrackId> = library.history(2).iter().map(|t| t.id).collect();
        let expected: Vec<TrackId> = ids.iter().rev().take(2).copied().collect();
        prop_assert_eq!(history, expected);
    }
}
