//! coursedex-loader: Catalog file loading and index snapshot building.

mod documents;
mod validate;

pub use documents::build_documents;
pub use validate::validate;

use coursedex_core::{Catalog, Config, Error, Result};
use coursedex_index::{ContentType, DocTable, SearchEngine, Synonyms, TrigramIndex};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Loader for building the index from the catalog directory.
pub struct Loader {
    config: Config,
}

impl Loader {
    /// Create a new loader with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read, validate, and index the configured catalog.
    pub fn load(&self) -> Result<IndexSnapshot> {
        info!("Loading catalog from {}", self.config.catalog_path.display());

        let catalog = read_catalog(&self.config.catalog_path)?;
        validate(&catalog)?;
        let snapshot = IndexSnapshot::build(&catalog);

        info!(
            "Catalog indexed: {} documents ({} course runs, {} courses, {} programs)",
            snapshot.docs.len(),
            snapshot.docs.count_of(ContentType::CourseRun),
            snapshot.docs.count_of(ContentType::Course),
            snapshot.docs.count_of(ContentType::Program),
        );
        Ok(snapshot)
    }

    /// Load the persisted snapshot, or build and persist a new one.
    pub fn load_or_build(&self) -> Result<IndexSnapshot> {
        let index_file = self.config.snapshot_file();
        if index_file.exists() {
            info!("Loading existing index...");
            return IndexSnapshot::load(&index_file);
        }

        info!("Building new index...");
        self.rebuild()
    }

    /// Build from the catalog and persist, replacing any existing snapshot.
    pub fn rebuild(&self) -> Result<IndexSnapshot> {
        let snapshot = self.load()?;
        self.config.ensure_index_dir()?;
        snapshot.save(&self.config.snapshot_file())?;
        Ok(snapshot)
    }
}

/// Every `*.json` file below `dir`, in path order.
fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Catalog(format!(
            "catalog directory {} does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse and merge every catalog file below `dir`.
///
/// Files are parsed in parallel and merged in path order.
pub fn read_catalog(dir: &Path) -> Result<Catalog> {
    let files = catalog_files(dir)?;
    debug!("Found {} catalog files in {}", files.len(), dir.display());

    let parts: Vec<Catalog> = files
        .par_iter()
        .map(|path| {
            let data = std::fs::read(path)?;
            serde_json::from_slice::<Catalog>(&data).map_err(|e| {
                Error::Serialization(format!("failed to parse {}: {}", path.display(), e))
            })
        })
        .collect::<Result<_>>()?;

    let mut catalog = Catalog::default();
    for part in parts {
        catalog.merge(part);
    }
    Ok(catalog)
}

/// Snapshot of the index at a point in time.
pub struct IndexSnapshot {
    pub docs: DocTable,
    pub trigram_index: TrigramIndex,
    /// Unix timestamp of the build.
    pub built_at: i64,
}

impl IndexSnapshot {
    /// Build a snapshot from a validated catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let (docs, trigram_index) = build_documents(catalog);
        Self {
            docs,
            trigram_index,
            built_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Search engine over this snapshot.
    pub fn engine<'a>(&'a self, synonyms: &'a Synonyms) -> SearchEngine<'a> {
        SearchEngine::new(&self.docs, &self.trigram_index, synonyms)
    }

    /// Save the snapshot to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = bincode::serialize(&(&self.docs, &self.trigram_index, self.built_at))
            .map_err(|e| Error::Serialization(e.to_string()))?;

        std::fs::write(path, data)?;
        info!("Index snapshot saved to {}", path.display());
        Ok(())
    }

    /// Load a snapshot from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let (docs, trigram_index, built_at) = bincode::deserialize(&data)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        info!("Index snapshot loaded from {}", path.display());
        Ok(Self {
            docs,
            trigram_index,
            built_at,
        })
    }
}
