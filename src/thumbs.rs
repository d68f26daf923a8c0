use crate::bgg::Transport;
use crate::{Game, GameId};
use failure::{bail, Error, ResultExt};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use tempfile::NamedTempFile;
use threadpool::ThreadPool;
use tracing::debug;

/// Local copies of bgg thumbnails, one `<id>.jpg` per game.
/// A file once saved is never refreshed.
#[derive(Debug, Clone)]
pub struct ThumbnailStore<T> {
    root: PathBuf,
    transport: T
}

#[derive(Debug)]
pub enum Message {
    Cached(GameId, PathBuf),
    Failed(GameId, Error)
}

impl<T: Transport> ThumbnailStore<T> {
    pub fn new(root: &Path, transport: T) -> ThumbnailStore<T> {
        ThumbnailStore { root: root.to_path_buf(), transport }
    }

    pub fn path_for(&self, id: GameId) -> PathBuf {
        self.root.join(format!("{}.jpg", id))
    }

    /// Path of the local thumbnail, downloading it first if needed.
    /// Writes go to a temp file renamed into place, so a reader never
    /// sees a half written image and racing writers both end up whole.
    pub fn fetch(&self, id: GameId, url: &str) -> Result<PathBuf, Error> {
        let path = self.path_for(id);
        if path.exists() {
            debug!(id, "thumbnail already cached");
            return Ok(path);
        }
        let resp = self.transport.get(url)?;
        if resp.status != 200 {
            bail!("Can't get thumbnail for {}. Status: {}", id, resp.status);
        }
        let mut tmp = NamedTempFile::new_in(&self.root)
            .with_context(|_| format!("can't create temp file in {}", self.root.display()))?;
        tmp.write_all(&resp.body)?;
        tmp.persist(&path)
            .with_context(|_| format!("can't save thumbnail {}", path.display()))?;
        debug!(id, "thumbnail saved");
        Ok(path)
    }
}

impl<T: Transport + Clone + Send + 'static> ThumbnailStore<T> {
    /// Makes sure every game with a thumbnail url has a local copy,
    /// downloading on `threads` workers. Failures are reported, not fatal.
    pub fn cache_all(&self, games: &[Game], threads: usize, running: Arc<AtomicBool>,
            mut progress: impl FnMut(Message) -> ()) -> Result<(), Error> {
        fs::create_dir_all(&self.root)
            .with_context(|_| format!("can't create {}", self.root.display()))?;

        let mut seen = HashSet::new();
        let jobs: Vec<(GameId, String)> = games.iter()
            .filter_map(|g| g.thumbnail.as_ref().map(|url| (g.id, url.clone())))
            .filter(|(id, _)| seen.insert(*id))
            .collect();
        let job_size = jobs.len();
        if job_size == 0 {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let pool = ThreadPool::new(threads.max(1));
        for (id, url) in jobs {
            let tx = tx.clone();
            let store = self.clone();
            let running = running.clone();
            pool.execute(move || {
                let msg = if !running.load(Ordering::SeqCst) {
                    Message::Failed(id, failure::err_msg("Download interrupted."))
                } else {
                    match store.fetch(id, &url) {
                        Ok(path) => Message::Cached(id, path),
                        Err(e) => Message::Failed(id, e)
                    }
                };
                // receiver lives until every job reported
                tx.send(msg).unwrap();
            });
        }
        drop(tx);

        for msg in rx.iter().take(job_size) {
            progress(msg);
        }
        pool.join();
        Ok(())
    }
}
