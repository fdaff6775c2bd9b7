//! Layers as seen by extent aggregation.

use geo_common::Extent;
use serde::{Deserialize, Serialize};

/// What a layer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Raster,
    Vector,
    Other,
}

/// A layer that can contribute an extent.
///
/// A layer may be an alias for another layer's data, in which case
/// [`associated`](LayerSource::associated) returns the target and the extent,
/// reference and kind are read from there. The active flag always comes from
/// the layer itself.
pub trait LayerSource {
    fn name(&self) -> &str {
        ""
    }

    fn is_active(&self) -> bool;

    fn kind(&self) -> LayerKind;

    fn spatial_reference(&self) -> &str;

    fn extent(&self) -> Extent;

    fn associated(&self) -> Option<&dyn LayerSource> {
        None
    }
}

impl<T: LayerSource + ?Sized> LayerSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn kind(&self) -> LayerKind {
        (**self).kind()
    }

    fn spatial_reference(&self) -> &str {
        (**self).spatial_reference()
    }

    fn extent(&self) -> Extent {
        (**self).extent()
    }

    fn associated(&self) -> Option<&dyn LayerSource> {
        (**self).associated()
    }
}

/// Follow alias links to the layer holding the data.
///
/// Returns `None` when more than `max_depth` links are followed, which also
/// catches cycles.
pub fn resolve(layer: &dyn LayerSource, max_depth: usize) -> Option<&dyn LayerSource> {
    let mut current = layer;
    for _ in 0..=max_depth {
        match current.associated() {
            Some(target) => current = target,
            None => return Some(current),
        }
    }
    None
}

/// Plain layer description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub name: String,
    pub active: bool,
    pub kind: LayerKind,
    pub spatial_reference: String,
    pub extent: Extent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<Box<LayerEntry>>,
}

impl LayerEntry {
    pub fn new(
        name: impl Into<String>,
        kind: LayerKind,
        spatial_reference: impl Into<String>,
        extent: Extent,
    ) -> Self {
        Self {
            name: name.into(),
            active: true,
            kind,
            spatial_reference: spatial_reference.into(),
            extent,
            alias_of: None,
        }
    }

    pub fn raster(
        name: impl Into<String>,
        spatial_reference: impl Into<String>,
        extent: Extent,
    ) -> Self {
        Self::new(name, LayerKind::Raster, spatial_reference, extent)
    }

    pub fn vector(
        name: impl Into<String>,
        spatial_reference: impl Into<String>,
        extent: Extent,
    ) -> Self {
        Self::new(name, LayerKind::Vector, spatial_reference, extent)
    }

    /// An active alias of `target`, carrying no data of its own.
    pub fn alias(name: impl Into<String>, target: LayerEntry) -> Self {
        Self {
            name: name.into(),
            active: true,
            kind: LayerKind::Other,
            spatial_reference: String::new(),
            extent: Extent::EMPTY,
            alias_of: Some(Box::new(target)),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl LayerSource for LayerEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn spatial_reference(&self) -> &str {
        &self.spatial_reference
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn associated(&self) -> Option<&dyn LayerSource> {
        self.alias_of.as_deref().map(|target| target as &dyn LayerSource)
    }
}
