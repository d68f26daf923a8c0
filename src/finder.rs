use crate::bgg::{BggError, CatalogClient, Transport, BGG_API};
use crate::collection;
use crate::filter::{filter_games, Criteria};
use crate::things;
use crate::thumbs::{self, ThumbnailStore};
use crate::{Game, Query};
use failure::{Error, ResultExt};
use serde_derive::{Deserialize, Serialize};
use serde_json::{from_str, to_string_pretty};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "app.config";
const THUMBNAIL_DIR: &str = "thumbnails";

pub fn create_structure() -> Result<(), Error> {
    let config = Config::new(BGG_API, 10, 1000, 4, Some(PathBuf::from(THUMBNAIL_DIR)));
    // create config file
    fs::write(CONFIG_FILE_NAME, to_string_pretty(&config)?)?;
    // create thumbnail dir
    if let Some(dir) = &config.thumbnails {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn config() -> Result<Config, Error> {
    read_config(Path::new(CONFIG_FILE_NAME))
}

fn read_config(path: &Path) -> Result<Config, Error> {
    let conf = fs::read_to_string(path)
        .with_context(|_| format!("Can't open: {}", path.display()))?;
    let conf = from_str(&conf)
        .with_context(|_| format!("Can't read: {}", path.display()))?;
    Ok(conf)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: String, // bgg xmlapi2 root
    pub attempts: u32, // number of retries while bgg prepares data
    pub delay: u32, // ms, delay increase after every retry
    pub threads: usize, // number of thumbnail download threads
    pub thumbnails: Option<PathBuf> // thumbnail cache dir, none to skip caching
}

impl Config {
    fn new(api: &str, attempts: u32, delay: u32, threads: usize, thumbnails: Option<PathBuf>) -> Config {
        Config { api: api.to_string(), attempts, delay, threads, thumbnails }
    }

    pub fn client<T: Transport>(&self, transport: T, running: Arc<AtomicBool>) -> CatalogClient<T> {
        let delay_step = Duration::from_millis(self.delay as u64);
        CatalogClient::new(transport, &self.api, self.attempts, delay_step, running)
    }
}

#[derive(Debug)]
pub enum Message {
    NoteCollection(usize), // number of ids to look up
    NoteGames(usize), // number of games fetched
    NoteThumbnail(thumbs::Message)
}

/// Thumbnail caching for a recommendation run.
pub struct Thumbnails<'a, T> {
    pub store: &'a ThumbnailStore<T>,
    pub threads: usize,
    pub running: Arc<AtomicBool>
}

/// Games from the user's collection matching `query`, best rated first.
/// None when the user is unknown or owns nothing that qualifies.
/// Other bgg failures are errors.
pub fn recommend<T>(client: &CatalogClient<T>, query: &Query, thumbnails: Option<Thumbnails<T>>,
        mut progress: impl FnMut(Message) -> ()) -> Result<Option<Vec<Game>>, Error>
        where T: Transport + Clone + Send + 'static {
    let ids = match collection::get_collection(client, &query.username, query.hide_played) {
        Ok(ids) => ids,
        Err(e) => match e.downcast_ref::<BggError>() {
            Some(BggError::NotFound { .. }) => {
                info!(username = %query.username, "No collection found");
                return Ok(None);
            },
            _ => return Err(e)
        }
    };
    if ids.is_empty() {
        return Ok(None);
    }
    progress(Message::NoteCollection(ids.len()));

    let games = things::get_games(client, &ids)?;
    progress(Message::NoteGames(games.len()));

    if let Some(t) = thumbnails {
        t.store.cache_all(&games, t.threads, t.running, |m| progress(Message::NoteThumbnail(m)))?;
    }

    let criteria = Criteria {
        players: query.players,
        best_only: query.best_only,
        min_complexity: query.min_complexity,
        max_complexity: query.max_complexity
    };
    let picked = filter_games(&games, &criteria);
    info!(username = %query.username, fetched = games.len(), picked = picked.len(), "Filtered games");
    Ok(Some(picked))
}
