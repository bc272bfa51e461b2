mod config;

use std::env;
use std::path::PathBuf;

use common::TrackView;
use config::{config_path_from_env, load_or_create_config, resolve_music_root};
use library::Library;
use metadata::scan_directory;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut print_json = false;
    let mut print_genres = false;
    let mut root_arg = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => print_json = true,
            "--genres" => print_genres = true,
            _ => root_arg = Some(arg),
        }
    }

    let config_path = config_path_from_env();
    let (config, created) = load_or_create_config(&config_path)?;
    if created {
        info!("Created default config at {:?}", config_path);
    } else {
        info!("Loaded config from {:?}", config_path);
    }

    let music_root = match root_arg {
        Some(value) => PathBuf::from(value),
        None => resolve_music_root(&config_path, &config.music_root)
            .ok_or("music_root not set in config and no path argument")?,
    };

    let records = scan_directory(&music_root, &config.scan_options())?;
    let mut library = Library::new();
    let stats = library.ingest(records);

    println!(
        "Indexed: {} tracks, {} genres, {} similarity links",
        stats.tracks, stats.genres, stats.similarity_edges
    );

    if print_genres {
        for genre in library.genres() {
            println!("{:>5}  {}", library.tracks_by_genre(genre).len(), genre);
        }
    }

    if print_json {
        let views: Vec<TrackView<'_>> = library.tracks().map(TrackView::from).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    }

    Ok(())
}
