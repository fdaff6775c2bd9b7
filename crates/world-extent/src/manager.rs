//! Recomputing a model's world extent from its layers.

use geo_common::{Extent, GeoRefError, GeoRefResult};
use projection::{CoordinateTransform, Direction};
use tracing::debug;

use crate::config::{ExtentManagerConfig, MergePolicy};
use crate::layer::{resolve, LayerKind, LayerSource};
use crate::model::WorldExtentModel;
use crate::render::RenderState;

/// Outcome of one [`ExtentManager::recompute`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Layers seen, active or not.
    pub considered: usize,
    /// Layer extents merged into the world.
    pub merged: usize,
    pub inactive: usize,
    /// Active layers excluded by the merge policy.
    pub filtered: usize,
    /// Alias chains longer than the configured depth.
    pub unresolved: usize,
    /// Layers with no extent, before or after reprojection.
    pub degenerate: usize,
    /// Layers whose transform could not be built, including invalid references.
    pub unavailable: usize,
    /// Layers where no extent sample could be reprojected.
    pub reprojection_failed: usize,
    /// The model adopted the first extent without notifying observers.
    pub bootstrapped: bool,
    /// The model's world was updated with notification.
    pub committed: bool,
    /// Nothing was done because a render pass was in flight.
    pub deferred: bool,
}

impl RecomputeReport {
    /// Active layers that were not merged.
    pub fn skipped(&self) -> usize {
        self.filtered
            + self.unresolved
            + self.degenerate
            + self.unavailable
            + self.reprojection_failed
    }

    fn record_skip(&mut self, error: &GeoRefError) {
        match error {
            GeoRefError::DegenerateExtent => self.degenerate += 1,
            GeoRefError::PointOutOfDomain { .. } => self.reprojection_failed += 1,
            _ => self.unavailable += 1,
        }
    }

    /// Whether the model's world changed.
    pub fn changed_model(&self) -> bool {
        self.bootstrapped || self.committed
    }
}

/// Keeps a model's world extent covering all active layers.
///
/// Every call is a full recompute from the layer list; nothing is remembered
/// between calls. Layers that cannot be reprojected are skipped and the rest
/// still contribute.
#[derive(Debug, Clone, Default)]
pub struct ExtentManager {
    config: ExtentManagerConfig,
    render_state: Option<RenderState>,
}

impl ExtentManager {
    pub fn new(config: ExtentManagerConfig) -> Self {
        Self {
            config,
            render_state: None,
        }
    }

    pub fn with_policy(policy: MergePolicy) -> Self {
        Self::new(ExtentManagerConfig {
            merge_policy: policy,
            ..Default::default()
        })
    }

    /// Defer recomputes while `state` reports a render pass.
    pub fn with_render_state(mut self, state: RenderState) -> Self {
        self.render_state = Some(state);
        self
    }

    pub fn config(&self) -> &ExtentManagerConfig {
        &self.config
    }

    pub fn policy(&self) -> MergePolicy {
        self.config.merge_policy
    }

    /// Recompute `model`'s world extent from `layers`.
    pub fn recompute<'a, L>(
        &self,
        layers: impl IntoIterator<Item = &'a L>,
        model: &mut WorldExtentModel,
    ) -> RecomputeReport
    where
        L: LayerSource + 'a,
    {
        let mut report = RecomputeReport::default();

        if self.render_state.as_ref().is_some_and(RenderState::is_rendering) {
            debug!("Render pass in flight, deferring extent recompute");
            report.deferred = true;
            return report;
        }

        let policy = self.config.merge_policy;
        let mut accumulated: Option<Extent> = match policy {
            MergePolicy::JoinAlways => Some(model.world()),
            _ => None,
        };
        let mut joins = 0;

        for layer in layers {
            report.considered += 1;
            let layer: &dyn LayerSource = layer;

            if !layer.is_active() {
                report.inactive += 1;
                continue;
            }

            let Some(source) = resolve(layer, self.config.max_alias_depth) else {
                debug!(
                    layer = layer.name(),
                    max_depth = self.config.max_alias_depth,
                    "Skipping layer, alias chain too deep"
                );
                report.unresolved += 1;
                continue;
            };

            if policy == MergePolicy::AppendAlways && source.kind() != LayerKind::Raster {
                report.filtered += 1;
                continue;
            }

            let bootstrapping = policy == MergePolicy::ReplaceOnFirst
                && !report.bootstrapped
                && accumulated.is_none()
                && !model.is_initialized();
            // An empty model adopts the first layer's reference
            let adopt_reference = bootstrapping && model.spatial_reference().is_empty();
            let target_reference = if adopt_reference {
                source.spatial_reference().to_string()
            } else {
                model.spatial_reference().to_string()
            };

            let extent = match self.reproject(source, &target_reference) {
                Ok(extent) => extent,
                Err(e) => {
                    if e.is_diagnostic() {
                        debug!(
                            layer = layer.name(),
                            code = e.code(),
                            error = %e,
                            "Skipping layer"
                        );
                    }
                    report.record_skip(&e);
                    continue;
                }
            };

            match policy {
                MergePolicy::AppendAlways => {
                    model.append_world(extent);
                    report.committed = true;
                }
                MergePolicy::ReplaceOnFirst if bootstrapping => {
                    if adopt_reference {
                        model.set_spatial_reference_silently(target_reference);
                    }
                    model.set_world_silently(extent);
                    model.set_window_silently(extent);
                    report.bootstrapped = true;
                    accumulated = Some(extent);
                }
                MergePolicy::ReplaceOnFirst | MergePolicy::JoinAlways => {
                    accumulated = Some(match accumulated {
                        Some(current) => {
                            joins += 1;
                            current.join(&extent)
                        }
                        None => extent,
                    });
                }
            }
            report.merged += 1;
        }

        // A bootstrap alone has already been applied silently
        let commit = match policy {
            MergePolicy::AppendAlways => false,
            MergePolicy::ReplaceOnFirst => !report.bootstrapped || joins > 0,
            MergePolicy::JoinAlways => report.merged > 0,
        };
        if commit {
            if let Some(world) = accumulated {
                model.set_world(world);
                report.committed = true;
            }
        }

        debug!(
            policy = %policy,
            considered = report.considered,
            merged = report.merged,
            skipped = report.skipped(),
            "Extent recompute finished"
        );
        report
    }

    /// Layer extent in the model's reference.
    fn reproject(&self, source: &dyn LayerSource, target_reference: &str) -> GeoRefResult<Extent> {
        let transform = CoordinateTransform::create(source.spatial_reference(), target_reference)?;

        let mut extent = source
            .extent()
            .non_degenerate()
            .ok_or(GeoRefError::DegenerateExtent)?;

        let grid = self.config.sample_grid_size;
        if transform.transform_extent(&mut extent, grid, Direction::Forward) == 0 {
            let corner = extent.upper_left;
            return Err(GeoRefError::PointOutOfDomain {
                x: corner.x,
                y: corner.y,
            });
        }

        extent.non_degenerate().ok_or(GeoRefError::DegenerateExtent)
    }
}
