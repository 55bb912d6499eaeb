pub mod catalog;
pub mod component;
mod ids;
mod progress;
pub mod sequence;

pub use catalog::{Catalog, CatalogError, Phase, Topic};
pub use component::{ComponentKey, ComponentLookup, ComponentRegistry};
pub use ids::{ParseIdError, PhaseId, TopicAddress, TopicId};
pub use progress::{ProgressError, ProgressState, Theme};
pub use sequence::{FlatSequence, FlatTopic, Resolution, flatten, step_of};
