// ABOUTME: Configuration stores holding the project document.
// ABOUTME: FileStore persists YAML under .kubeb/; MemoryStore keeps it in process.

use parking_lot::Mutex;
use std::path::PathBuf;

use super::{ProjectConfig, ProjectLayout};
use crate::error::{Error, Result};

/// Loads and saves the whole project document.
///
/// There is no locking: concurrent writers race and the last save wins.
pub trait ConfigStore: Send + Sync {
    /// Whether a document exists at all.
    fn exists(&self) -> bool;

    /// Load the document, failing with [`Error::ConfigurationMissing`] if absent.
    fn load(&self) -> Result<ProjectConfig>;

    /// Replace the stored document.
    fn save(&self, config: &ProjectConfig) -> Result<()>;

    /// Read-modify-write. Nothing is saved if `f` fails.
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut ProjectConfig) -> Result<T>,
    {
        let mut config = self.load()?;
        let value = f(&mut config)?;
        self.save(&config)?;
        Ok(value)
    }
}

/// Store backed by `.kubeb/config.yml`.
#[derive(Debug, Clone)]
pub struct FileStore {
    layout: ProjectLayout,
}

impl FileStore {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn path(&self) -> PathBuf {
        self.layout.config_file()
    }
}

impl ConfigStore for FileStore {
    fn exists(&self) -> bool {
        self.path().is_file()
    }

    fn load(&self) -> Result<ProjectConfig> {
        let path = self.path();
        if !path.is_file() {
            return Err(Error::ConfigurationMissing(self.layout.config_dir()));
        }
        let content = std::fs::read_to_string(&path)?;
        ProjectConfig::from_yaml(&content)
    }

    fn save(&self, config: &ProjectConfig) -> Result<()> {
        std::fs::create_dir_all(self.layout.config_dir())?;
        std::fs::write(self.path(), config.to_yaml()?)?;
        Ok(())
    }
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<ProjectConfig>>,
}

impl MemoryStore {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            document: Mutex::new(Some(config)),
        }
    }

    /// A store with no document, as in an uninitialized project.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy of the current document.
    pub fn snapshot(&self) -> Option<ProjectConfig> {
        self.document.lock().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn exists(&self) -> bool {
        self.document.lock().is_some()
    }

    fn load(&self) -> Result<ProjectConfig> {
        self.document
            .lock()
            .clone()
            .ok_or_else(|| Error::ConfigurationMissing(PathBuf::from("<memory>")))
    }

    fn save(&self, config: &ProjectConfig) -> Result<()> {
        *self.document.lock() = Some(config.clone());
        Ok(())
    }
}
