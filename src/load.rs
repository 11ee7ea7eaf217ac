//! Save loading: archive entry -> token pipeline -> linker.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use save_parser::{decode_streaming, DEFAULT_QUEUE_DEPTH};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{LoadError, Result};
use crate::link::{link, LinkReport};
use crate::model::GameState;

pub const DEFAULT_ENTRY_NAME: &str = "gamestate";

/// Load settings
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub entry_name: String,
    /// Capacity of the token queue between lexer and decoder
    pub queue_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            entry_name: DEFAULT_ENTRY_NAME.to_string(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = name.into();
        self
    }

    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }
}

/// A linked game state and the problems found while linking it
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub state: GameState,
    pub report: LinkReport,
}

/// Load a `.sav` file from disk
pub fn open(path: impl AsRef<Path>, options: &LoadOptions) -> Result<LoadedGame> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening save");
    let file = File::open(path)?;
    load_save(BufReader::new(file), options)
}

/// Load a `.sav` archive from any seekable reader
pub fn load_save<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<LoadedGame> {
    let mut archive = ZipArchive::new(reader)?;
    let entry = match archive.by_name(&options.entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(LoadError::MissingEntry(options.entry_name.clone()))
        }
        Err(e) => return Err(e.into()),
    };
    debug!(entry = %options.entry_name, size = entry.size(), "reading archive entry");
    load_gamestate(entry, options)
}

/// Decode and link an uncompressed gamestate text.
///
/// Safe to call from async code, but it blocks the calling task; lexing and
/// decoding only overlap when called off the runtime (see [`load_async`]).
pub fn load_gamestate<R: Read>(reader: R, options: &LoadOptions) -> Result<LoadedGame> {
    let mut state = GameState::default();
    decode_streaming(reader, &mut state, options.queue_depth)?;
    debug!(
        stars = state.stars.len(),
        countries = state.countries.len(),
        fleets = state.fleets.len(),
        ships = state.ships.len(),
        "gamestate decoded"
    );

    let report = link(&mut state);
    info!(
        name = %state.name,
        date = %state.date,
        warnings = report.len(),
        "gamestate loaded"
    );
    Ok(LoadedGame { state, report })
}

/// [`open`] on the blocking thread pool
pub async fn load_async(path: impl Into<PathBuf>, options: LoadOptions) -> Result<LoadedGame> {
    let path = path.into();
    tokio::task::spawn_blocking(move || open(path, &options))
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CountryId, StarId};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const GAMESTATE: &str = r#"version="Circinus v3.4.5"
name="United Nations of Earth"
date="2230.06.15"
galactic_object={
    0={ name="Sol" coordinate={ x=10 y=20 } starbases={ 5 } hyperlane={ { to=1 } } }
    1={ name="Alpha Centauri" hyperlane={ { to=0 } } }
}
starbase_mgr={ starbases={ 5={ level=starbase_level_starport owner=0 } } }
country={ 0={ name="United Nations of Earth" } }
"#;

    fn archive(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, text) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(text.as_bytes()).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_load_save_from_archive() {
        let sav = archive(&[("meta", "version=\"3.4.5\""), ("gamestate", GAMESTATE)]);
        let game = load_save(sav, &LoadOptions::default()).unwrap();

        assert_eq!(game.state.name, "United Nations of Earth");
        assert_eq!(game.state.date.year(), Some(2230));
        assert!(game.report.is_empty());

        let sol = game.state.star(StarId(0)).unwrap();
        assert_eq!(sol.owner(&game.state), CountryId(0));
        assert_eq!(sol.hyperlanes[0].to, Some(StarId(1)));
    }

    #[test]
    fn test_missing_entry() {
        let sav = archive(&[("meta", "version=\"3.4.5\"")]);
        let err = load_save(sav, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingEntry(ref name) if name == "gamestate"));
        assert_eq!(err.to_string(), "entry 'gamestate' is not found in sav file");
    }

    #[test]
    fn test_custom_entry_and_queue_depth() {
        let sav = archive(&[("state.txt", GAMESTATE)]);
        let options = LoadOptions::new().entry_name("state.txt").queue_depth(2);
        let game = load_save(sav, &options).unwrap();
        assert_eq!(game.state.stars.len(), 2);
    }

    #[test]
    fn test_decode_error_is_fatal() {
        let text = "galactic_object={ 0={ coordinate={ x=east } } }";
        let err = load_gamestate(text.as_bytes(), &LoadOptions::default()).unwrap_err();
        let LoadError::Decode(err) = err else {
            panic!("expected decode error, got {err}");
        };
        assert_eq!(err.path, vec!["galactic_object", "0", "coordinate", "x"]);
    }

    #[test]
    fn test_lex_error_is_fatal() {
        let text = "name=\"Earth\"\nflag=red-blue\n";
        let err = load_gamestate(text.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Lex(ref e) if e.line == 2));
    }

    #[test]
    fn test_not_an_archive() {
        let err = load_save(Cursor::new(b"not a zip".to_vec()), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Archive(_)));
    }

    #[test]
    fn test_load_async() {
        let path = std::env::temp_dir().join(format!("stellaris-map-{}.sav", std::process::id()));
        std::fs::write(&path, archive(&[("gamestate", GAMESTATE)]).into_inner()).unwrap();

        let game = tokio_test::block_on(load_async(path.clone(), LoadOptions::default()));
        std::fs::remove_file(&path).unwrap();

        let game = game.unwrap();
        assert_eq!(game.state.countries.len(), 1);
    }

    #[test]
    fn test_load_gamestate_inside_runtime() {
        let game = tokio_test::block_on(async {
            load_gamestate(GAMESTATE.as_bytes(), &LoadOptions::default())
        })
        .unwrap();
        assert_eq!(game.state.name, "United Nations of Earth");
        assert_eq!(game.state.stars.len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let err = open("/nonexistent/save.sav", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
