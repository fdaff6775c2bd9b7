//! Render pass tracking.

use std::cell::Cell;
use std::rc::Rc;

/// Shared handle reporting whether a render pass is in flight.
///
/// The coordinator that drives rendering owns one and hands clones to
/// collaborators. Passes nest; the state stays rendering until the outermost
/// [`RenderPass`] guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    depth: Rc<Cell<usize>>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a render pass as started. The pass ends when the guard drops.
    #[must_use = "the pass ends as soon as the guard is dropped"]
    pub fn begin_pass(&self) -> RenderPass {
        self.depth.set(self.depth.get() + 1);
        RenderPass {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Guard for an in-flight render pass.
#[derive(Debug)]
pub struct RenderPass {
    depth: Rc<Cell<usize>>,
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
