//! World extent state and layer extent aggregation.
//!
//! A [`WorldExtentModel`] holds what one viewer shows: the full world extent,
//! the visible window, the viewport size and the spatial reference all of
//! them are expressed in. An [`ExtentManager`] recomputes the world from a
//! list of layers, reprojecting each layer's extent into the model's
//! reference and merging according to its [`MergePolicy`].

pub mod config;
pub mod layer;
pub mod manager;
pub mod model;
pub mod pixel;
pub mod render;

pub use config::{ExtentManagerConfig, MergePolicy};
pub use layer::{LayerEntry, LayerKind, LayerSource};
pub use manager::{ExtentManager, RecomputeReport};
pub use model::{WorldExtentModel, WorldObserver};
pub use pixel::PixelModel;
pub use render::{RenderPass, RenderState};
