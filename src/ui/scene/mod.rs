//! Retained box views and the deferred editor work they drive.

mod hit;
mod projection;
mod schedule;

pub use hit::{
    header_buttons, header_title_rect, toolbar_buttons, HeaderButton, HitTree, Node, NodeKind,
    Sense, ToolbarAction,
};
pub use projection::{
    BoxScene, BoxSlot, BoxView, SceneDiff, EDITOR_HEIGHT, HEADER_HEIGHT, INDENT_WIDTH,
};
pub use schedule::{LayoutScheduler, LayoutTask};

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::models::{BoxId, BoxTree};
use crate::ui::editor::{ContainerRef, EditorFactory, EditorRegistry, PYTHON};
use crate::ui::geom::Rect;

/// Keeps the scene, the editor registry and pending layout work in step with
/// the box store.
pub struct Renderer {
    scene: BoxScene,
    scheduler: LayoutScheduler,
    content_areas: FxHashMap<BoxId, Rect>,
    laid_out: FxHashMap<BoxId, Rect>,
}

impl Renderer {
    pub fn new(settle: Duration) -> Self {
        Self {
            scene: BoxScene::new(),
            scheduler: LayoutScheduler::new(settle),
            content_areas: FxHashMap::default(),
            laid_out: FxHashMap::default(),
        }
    }

    pub fn scene(&self) -> &BoxScene {
        &self.scene
    }

    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    /// Projects the store and schedules editor work in one step.
    pub fn render<F: EditorFactory>(
        &mut self,
        tree: &BoxTree,
        registry: &mut EditorRegistry<F>,
        now: Instant,
    ) -> SceneDiff {
        let diff = self.project(tree, registry);
        self.schedule_layout(registry, now);
        diff
    }

    /// Reconciles the scene with the store and releases boxes that left it.
    pub fn project<F: EditorFactory>(
        &mut self,
        tree: &BoxTree,
        registry: &mut EditorRegistry<F>,
    ) -> SceneDiff {
        let diff = self.scene.project(tree);
        if !diff.entered.is_empty() || !diff.exited.is_empty() {
            tracing::debug!(
                entered = diff.entered.len(),
                updated = diff.updated.len(),
                exited = diff.exited.len(),
                "scene projected"
            );
        }
        self.release(&diff.exited, registry);
        diff
    }

    /// Expanded boxes without a widget get one after the settle delay; live
    /// widgets are re-laid out when their content area moved.
    pub fn schedule_layout<F: EditorFactory>(
        &mut self,
        registry: &EditorRegistry<F>,
        now: Instant,
    ) {
        for id in self.scene.order() {
            let Some(view) = self.scene.view(*id) else {
                continue;
            };
            if !view.expanded {
                self.scheduler.cancel(*id);
                continue;
            }
            if !registry.has_live(*id) {
                // Parked creations are finished by `mark_ready`.
                if !registry.is_pending(*id) {
                    self.scheduler.schedule(*id, LayoutTask::CreateEditor, now);
                }
                continue;
            }
            let area = self.content_areas.get(id).copied().unwrap_or_default();
            if self.laid_out.get(id) != Some(&area) {
                self.scheduler.schedule(*id, LayoutTask::Relayout, now);
            }
        }
    }

    /// Drops the widgets and pending work of boxes leaving the store.
    pub fn release<F: EditorFactory>(&mut self, ids: &[BoxId], registry: &mut EditorRegistry<F>) {
        for id in ids {
            self.scheduler.cancel(*id);
            self.content_areas.remove(id);
            self.laid_out.remove(id);
            registry.remove_editor(*id);
        }
    }

    /// Runs layout work whose settle delay has elapsed. Returns the boxes
    /// that were touched.
    pub fn fire_due<F: EditorFactory>(
        &mut self,
        tree: &BoxTree,
        registry: &mut EditorRegistry<F>,
        now: Instant,
    ) -> Vec<BoxId> {
        let mut touched = Vec::new();
        for (id, task) in self.scheduler.take_due(now) {
            let area = self.content_area(id);
            match task {
                LayoutTask::CreateEditor => {
                    let Some(record) = tree.get(id) else {
                        continue;
                    };
                    if !record.expanded || registry.has_live(id) || registry.is_pending(id) {
                        continue;
                    }
                    let code = record.code.clone();
                    registry.create_editor(id, ContainerRef::new(id, area), PYTHON, &code);
                    if registry.has_live(id) {
                        self.laid_out.insert(id, area);
                    }
                    touched.push(id);
                }
                LayoutTask::Relayout => {
                    if registry.resize_editor(id, area) {
                        self.laid_out.insert(id, area);
                        touched.push(id);
                    }
                }
            }
        }
        touched
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn set_content_area(&mut self, id: BoxId, area: Rect) {
        self.content_areas.insert(id, area);
    }

    pub fn content_area(&self, id: BoxId) -> Rect {
        self.content_areas.get(&id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/scene/renderer.rs"]
mod tests;
