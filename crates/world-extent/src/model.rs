//! World/window/viewport state for one rendering context.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use geo_common::Extent;

use crate::pixel::PixelModel;

/// Receives a notification after every non-silent model mutation.
pub trait WorldObserver {
    fn world_changed(&self, model: &WorldExtentModel);
}

/// Canonical world, window, viewport and reference for one viewer.
///
/// The model is initialized once it has a non-zero viewport and a
/// non-empty spatial reference. Pixel/world conversion uses an affine model
/// built lazily from the window (or the world when the window is the empty
/// sentinel) and rebuilt after any change.
pub struct WorldExtentModel {
    world: Extent,
    window: Extent,
    viewport_width: u32,
    viewport_height: u32,
    spatial_reference: String,
    rotation: f64,
    revision: u64,
    pixel_model: OnceCell<Option<PixelModel>>,
    observers: Vec<Rc<dyn WorldObserver>>,
}

impl Default for WorldExtentModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WorldExtentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldExtentModel")
            .field("world", &self.world)
            .field("window", &self.window)
            .field("viewport", &(self.viewport_width, self.viewport_height))
            .field("spatial_reference", &self.spatial_reference)
            .field("rotation", &self.rotation)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Two models are equal when they would render the same thing.
impl PartialEq for WorldExtentModel {
    fn eq(&self, other: &Self) -> bool {
        self.world == other.world
            && self.window == other.window
            && self.viewport_width == other.viewport_width
            && self.viewport_height == other.viewport_height
            && self.spatial_reference == other.spatial_reference
    }
}

impl WorldExtentModel {
    pub fn new() -> Self {
        Self {
            world: Extent::EMPTY,
            window: Extent::EMPTY,
            viewport_width: 0,
            viewport_height: 0,
            spatial_reference: String::new(),
            rotation: 0.0,
            revision: 0,
            pixel_model: OnceCell::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_spatial_reference(mut self, reference: impl Into<String>) -> Self {
        self.spatial_reference = reference.into();
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn world(&self) -> Extent {
        self.world
    }

    pub fn window(&self) -> Extent {
        self.window
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn spatial_reference(&self) -> &str {
        &self.spatial_reference
    }

    /// Pixel grid rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Incremented on every mutation, silent or not.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_initialized(&self) -> bool {
        self.viewport_width > 0 && self.viewport_height > 0 && !self.spatial_reference.is_empty()
    }

    pub fn subscribe(&mut self, observer: Rc<dyn WorldObserver>) {
        self.observers.push(observer);
    }

    pub fn unsubscribe(&mut self, observer: &Rc<dyn WorldObserver>) {
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
    }

    pub fn set_world(&mut self, world: Extent) {
        self.set_world_silently(world);
        self.notify();
    }

    /// Replace the world without notifying observers.
    pub fn set_world_silently(&mut self, world: Extent) {
        self.world = world;
        self.touch();
    }

    /// Join `extent` into the current world.
    pub fn append_world(&mut self, extent: Extent) {
        self.set_world(self.world.join(&extent));
    }

    pub fn set_window(&mut self, window: Extent) {
        self.set_window_silently(window);
        self.notify();
    }

    /// Replace the window without notifying observers.
    pub fn set_window_silently(&mut self, window: Extent) {
        self.window = window;
        self.touch();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.touch();
        self.notify();
    }

    pub fn set_spatial_reference(&mut self, reference: impl Into<String>) {
        self.set_spatial_reference_silently(reference);
        self.notify();
    }

    /// Replace the reference without notifying observers.
    pub fn set_spatial_reference_silently(&mut self, reference: impl Into<String>) {
        self.spatial_reference = reference.into();
        self.touch();
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
        self.touch();
        self.notify();
    }

    /// World coordinate to viewport pixel; `None` without a usable model.
    pub fn world_to_viewport(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.pixel_model().map(|m| m.world_to_pixel(x, y))
    }

    /// Viewport pixel to world coordinate; `None` without a usable model.
    pub fn viewport_to_world(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        self.pixel_model().map(|m| m.pixel_to_world(px, py))
    }

    pub fn pixel_model(&self) -> Option<&PixelModel> {
        self.pixel_model
            .get_or_init(|| {
                let mapped = self.window.non_degenerate().or(self.world.non_degenerate())?;
                PixelModel::new(
                    &mapped,
                    self.viewport_width,
                    self.viewport_height,
                    self.rotation,
                )
            })
            .as_ref()
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.pixel_model = OnceCell::new();
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.world_changed(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter(Cell<usize>);

    impl WorldObserver for Counter {
        fn world_changed(&self, _model: &WorldExtentModel) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_initialized_requires_viewport_and_reference() {
        let mut model = WorldExtentModel::new();
        assert!(!model.is_initialized());

        model.set_viewport(800, 600);
        assert!(!model.is_initialized());

        model.set_spatial_reference("EPSG:4326");
        assert!(model.is_initialized());

        model.set_viewport(0, 600);
        assert!(!model.is_initialized());
    }

    #[test]
    fn test_silent_setters_skip_observers() {
        let counter = Rc::new(Counter::default());
        let mut model = WorldExtentModel::new();
        model.subscribe(counter.clone());

        model.set_world_silently(Extent::new(0.0, 1.0, 1.0, 0.0));
        model.set_window_silently(Extent::new(0.0, 1.0, 1.0, 0.0));
        assert_eq!(counter.0.get(), 0);
        assert_eq!(model.revision(), 2);

        model.set_world(Extent::new(0.0, 2.0, 2.0, 0.0));
        assert_eq!(counter.0.get(), 1);
        assert_eq!(model.revision(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let counter = Rc::new(Counter::default());
        let handle: Rc<dyn WorldObserver> = counter.clone();
        let mut model = WorldExtentModel::new();
        model.subscribe(handle.clone());
        model.unsubscribe(&handle);

        model.set_viewport(10, 10);
        assert_eq!(counter.0.get(), 0);
    }

    #[test]
    fn test_pixel_model_is_rebuilt_after_changes() {
        let mut model = WorldExtentModel::new().with_viewport(100, 100);
        assert!(model.pixel_model().is_none());

        model.set_world(Extent::new(0.0, 100.0, 100.0, 0.0));
        assert_eq!(model.viewport_to_world(10.0, 10.0), Some((10.0, 90.0)));

        model.set_window(Extent::new(0.0, 50.0, 50.0, 0.0));
        assert_eq!(model.viewport_to_world(10.0, 10.0), Some((5.0, 45.0)));
    }
}
