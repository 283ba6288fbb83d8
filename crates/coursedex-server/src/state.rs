//! Shared server state and the reindex procedure.

use coursedex_core::api::StatusResponse;
use coursedex_core::build_info::BUILD_INFO;
use coursedex_core::{Config, Result};
use coursedex_index::{ContentType, SearchEngine, Synonyms};
use coursedex_loader::{IndexSnapshot, Loader};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, TryLockError};
use tracing::{error, info};

/// Index state guarded by the server's lock.
pub struct ServerState {
    pub snapshot: IndexSnapshot,
    pub last_updated: i64,
    pub reindexing: bool,
}

impl ServerState {
    pub fn new(snapshot: IndexSnapshot) -> Self {
        Self {
            last_updated: snapshot.built_at,
            snapshot,
            reindexing: false,
        }
    }

    pub fn status(&self) -> StatusResponse {
        let docs = &self.snapshot.docs;
        StatusResponse {
            documents: docs.len(),
            course_runs: docs.count_of(ContentType::CourseRun),
            courses: docs.count_of(ContentType::Course),
            programs: docs.count_of(ContentType::Program),
            trigram_count: self.snapshot.trigram_index.trigram_count(),
            last_updated: self.last_updated,
            reindexing: self.reindexing,
            version: BUILD_INFO.version.to_string(),
            git_sha: BUILD_INFO.git_sha.to_string(),
        }
    }
}

pub type SharedState = Arc<RwLock<ServerState>>;

/// Outcome of a reindex request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reindex {
    Completed { documents: usize },
    AlreadyRunning,
}

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub synonyms: Arc<Synonyms>,
    shared: SharedState,
    reindex_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, snapshot: IndexSnapshot) -> Self {
        let synonyms = Synonyms::new(&config.search.synonyms);
        Self {
            config: Arc::new(config),
            synonyms: Arc::new(synonyms),
            shared: Arc::new(RwLock::new(ServerState::new(snapshot))),
            reindex_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read access to the index. A panicked writer does not take the server down.
    pub fn read(&self) -> RwLockReadGuard<'_, ServerState> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against a search engine over the current snapshot.
    pub fn with_engine<T>(&self, f: impl FnOnce(&SearchEngine<'_>) -> T) -> T {
        let state = self.read();
        let engine = state.snapshot.engine(&self.synonyms);
        f(&engine)
    }

    /// Reload the catalog from disk and swap in the new snapshot.
    ///
    /// Blocking; the catalog is read and indexed without holding the state
    /// lock. With `dry_run` the new snapshot is counted and discarded.
    pub fn reindex(&self, dry_run: bool) -> Result<Reindex> {
        let _guard = match self.reindex_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Ok(Reindex::AlreadyRunning),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let loader = Loader::new(self.config.as_ref().clone());
        if dry_run {
            let snapshot = loader.load()?;
            return Ok(Reindex::Completed {
                documents: snapshot.docs.len(),
            });
        }

        self.write().reindexing = true;
        info!("Starting reindex from {}", self.config.catalog_path.display());

        match loader.rebuild() {
            Ok(snapshot) => {
                let documents = snapshot.docs.len();
                let mut state = self.write();
                state.last_updated = snapshot.built_at;
                state.snapshot = snapshot;
                state.reindexing = false;
                info!("Reindex complete: {} documents", documents);
                Ok(Reindex::Completed { documents })
            }
            Err(e) => {
                error!("Reindex failed: {}", e);
                self.write().reindexing = false;
                Err(e)
            }
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ServerState> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }
}
