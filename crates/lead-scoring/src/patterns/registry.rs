//! Copy-on-write holder for the active pattern library.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use lead_core::errors::PipelineError;

use super::loader::LibraryLoader;
use super::types::PatternLibrary;

/// Process-wide handle to the current library.
///
/// Readers take an `Arc` snapshot and keep it for the whole run, so a reload
/// never changes patterns under an in-flight batch.
#[derive(Debug)]
pub struct PatternRegistry {
    current: RwLock<Arc<PatternLibrary>>,
}

impl PatternRegistry {
    pub fn new(library: PatternLibrary) -> Self {
        Self {
            current: RwLock::new(Arc::new(library)),
        }
    }

    /// Registry over the embedded sample library.
    pub fn with_default_library() -> Result<Self, PipelineError> {
        Ok(Self::new(LibraryLoader::load_default()?))
    }

    pub fn snapshot(&self) -> Arc<PatternLibrary> {
        // The lock only guards an Arc swap, so a poisoned lock still holds a whole library.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install a new library, returning the one it replaced.
    pub fn replace(&self, library: PatternLibrary) -> Arc<PatternLibrary> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(library))
    }

    /// Load, validate, then swap. On error the current library stays active.
    pub fn reload_from_file(&self, path: &Path) -> Result<(), PipelineError> {
        let library = LibraryLoader::load_from_file(path)?;
        tracing::info!(path = %path.display(), "pattern library reloaded");
        self.replace(library);
        Ok(())
    }
}
