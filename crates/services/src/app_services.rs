use std::sync::Arc;

use learn_core::model::{Catalog, ComponentRegistry};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogSource;
use crate::error::AppServicesError;
use crate::navigation::NavigationController;
use crate::overview::{PathOverview, build_overview};
use crate::progress_store::ProgressStore;

/// Assembles the catalog, the progress store and the component registry.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    registry: Arc<ComponentRegistry>,
    progress: ProgressStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be loaded or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: &CatalogSource,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let catalog = catalog.load()?;
        let storage = Storage::sqlite(db_url, clock).await?;
        Ok(Self::from_parts(catalog, ComponentRegistry::builtin(), storage).await)
    }

    /// Build services over an explicit catalog and storage backend.
    pub async fn from_parts(
        catalog: Catalog,
        registry: ComponentRegistry,
        storage: Storage,
    ) -> Self {
        let progress = ProgressStore::load(Arc::clone(&storage.progress)).await;
        // The catalog may have shrunk since the step was saved.
        progress.clamp_step(catalog.topic_count());
        Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(registry),
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> ProgressStore {
        self.progress.clone()
    }

    #[must_use]
    pub fn navigator(&self) -> NavigationController {
        NavigationController::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.registry),
            self.progress.clone(),
        )
    }

    #[must_use]
    pub fn overview(&self) -> PathOverview {
        build_overview(&self.catalog, &self.progress.snapshot())
    }
}
