//! Session storage.
//!
//! The engine reads and writes sessions (and looks worlds up) through [`SessionStore`].
//! Two stores ship with it: [`MemoryStore`] keeps everything in process, and [`FileStore`]
//! saves one RON file per session while keeping worlds in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use parley_data::Session;
use thiserror::Error;

use crate::world::World;

/// Failures of the storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no world with id '{0}'")]
    UnknownWorld(String),
    #[error("session storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode session '{id}': {source}")]
    Encode {
        id: String,
        #[source]
        source: ron::Error,
    },
    #[error("could not decode session file '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// The four operations the resolver needs. Each is atomic for a single session.
pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` if there is none yet.
    fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError>;
    fn write_session(&self, session: &Session) -> Result<(), StoreError>;
    fn delete_session(&self, id: &str) -> Result<(), StoreError>;
    fn get_world(&self, id: &str) -> Result<Arc<World>, StoreError>;
}

/// Worlds by id, shared by both stores.
#[derive(Debug, Default)]
struct WorldShelf {
    worlds: RwLock<HashMap<String, Arc<World>>>,
}

impl WorldShelf {
    fn register(&self, world: World) {
        let world = Arc::new(world);
        info!("registered world '{}' ({} rooms)", world.id, world.rooms.len());
        let mut worlds = self.worlds.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        worlds.insert(world.id.clone(), world);
    }

    fn get(&self, id: &str) -> Result<Arc<World>, StoreError> {
        let worlds = self.worlds.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        worlds.get(id).cloned().ok_or_else(|| StoreError::UnknownWorld(id.to_string()))
    }
}

/// Keeps sessions and worlds in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
    shelf: WorldShelf,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn register_world(&self, world: World) {
        self.shelf.register(world);
    }

    #[must_use]
    pub fn with_world(self, world: World) -> MemoryStore {
        self.register_world(world);
        self
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map_or(0, |sessions| sessions.len())
    }
}

impl SessionStore for MemoryStore {
    fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(sessions.get(id).cloned())
    }

    fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn delete_session(&self, id: &str) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions.remove(id);
        Ok(())
    }

    fn get_world(&self, id: &str) -> Result<Arc<World>, StoreError> {
        self.shelf.get(id)
    }
}

/// Saves each session as a RON file under a directory; worlds stay in memory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    shelf: WorldShelf,
}

impl FileStore {
    /// A store writing to `dir`, which is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> FileStore {
        FileStore {
            dir: dir.into(),
            shelf: WorldShelf::default(),
        }
    }

    pub fn register_world(&self, world: World) {
        self.shelf.register(world);
    }

    #[must_use]
    pub fn with_world(self, world: World) -> FileStore {
        self.register_world(world);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a session id is saved in.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.ron", session_slug(id)))
    }
}

impl SessionStore for FileStore {
    fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let path = self.path_for(id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let session: Session = ron::from_str(&raw).map_err(|source| StoreError::Decode {
            path: path.clone(),
            source,
        })?;
        if session.id != id {
            warn!("'{}' holds session '{}', not '{id}'", path.display(), session.id);
            return Ok(None);
        }
        debug!("loaded session '{id}' from '{}'", path.display());
        Ok(Some(session))
    }

    fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(&session.id);
        let encoded =
            ron::ser::to_string_pretty(session, ron::ser::PrettyConfig::default()).map_err(|source| {
                StoreError::Encode {
                    id: session.id.clone(),
                    source,
                }
            })?;
        fs::write(&path, encoded).map_err(|source| StoreError::Io { path: path.clone(), source })?;
        debug!("saved session '{}' to '{}'", session.id, path.display());
        Ok(())
    }

    fn delete_session(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn get_world(&self, id: &str) -> Result<Arc<World>, StoreError> {
        self.shelf.get(id)
    }
}

/// A filesystem-safe name for a session id.
pub fn session_slug(raw: &str) -> String {
    let slug = raw
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect::<String>();
    if slug.is_empty() { "session".to_string() } else { slug }
}
