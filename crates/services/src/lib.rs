#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod navigation;
pub mod overview;
pub mod progress_store;

pub use learn_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogSource;
pub use error::{AppServicesError, CatalogServiceError};
pub use navigation::{NavOutcome, NavigationController, TopicView};
pub use overview::{PathOverview, PhaseOverview, TopicEntry, build_overview};
pub use progress_store::ProgressStore;
