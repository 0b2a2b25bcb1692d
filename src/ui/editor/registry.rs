use rustc_hash::FxHashMap;

use super::{ContainerRef, EditorFactory, EditorOptions, EditorWidget};
use crate::kernel::CodeSource;
use crate::models::BoxId;
use crate::ui::geom::Rect;

struct PendingEditor {
    container: ContainerRef,
    language: String,
    initial_value: String,
}

enum Entry<W> {
    Pending(PendingEditor),
    Live(W),
}

/// Owns every editor widget, keyed by box id.
///
/// Requests made before the library is ready are parked and realized by
/// [`EditorRegistry::mark_ready`] in the container they were made for.
pub struct EditorRegistry<F: EditorFactory> {
    factory: Option<F>,
    options: EditorOptions,
    entries: FxHashMap<BoxId, Entry<F::Widget>>,
}

impl<F: EditorFactory> EditorRegistry<F> {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            factory: None,
            options,
            entries: FxHashMap::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.factory.is_some()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn create_editor(
        &mut self,
        id: BoxId,
        container: ContainerRef,
        language: &str,
        initial_value: &str,
    ) -> Option<&mut F::Widget> {
        let Some(factory) = self.factory.as_ref() else {
            tracing::debug!(box_id = %id, "editor library not ready, deferring");
            self.entries.insert(
                id,
                Entry::Pending(PendingEditor {
                    container,
                    language: language.to_string(),
                    initial_value: initial_value.to_string(),
                }),
            );
            return None;
        };

        let widget = factory.create(container, language, initial_value, &self.options);
        if let Some(Entry::Live(mut old)) = self.entries.insert(id, Entry::Live(widget)) {
            old.dispose();
        }
        match self.entries.get_mut(&id) {
            Some(Entry::Live(widget)) => Some(widget),
            _ => None,
        }
    }

    /// Installs the factory and realizes every parked request. Returns the
    /// ids that got a live widget.
    pub fn mark_ready(&mut self, factory: F) -> Vec<BoxId> {
        let pending: Vec<BoxId> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Pending(_)))
            .map(|(id, _)| *id)
            .collect();

        let mut realized = Vec::with_capacity(pending.len());
        for id in pending {
            let Some(Entry::Pending(p)) = self.entries.remove(&id) else {
                continue;
            };
            let widget = factory.create(p.container, &p.language, &p.initial_value, &self.options);
            self.entries.insert(id, Entry::Live(widget));
            realized.push(id);
        }
        self.factory = Some(factory);
        tracing::info!(realized = realized.len(), "editor registry ready");
        realized
    }

    pub fn get_editor(&self, id: BoxId) -> Option<&F::Widget> {
        match self.entries.get(&id) {
            Some(Entry::Live(widget)) => Some(widget),
            _ => None,
        }
    }

    pub fn get_editor_mut(&mut self, id: BoxId) -> Option<&mut F::Widget> {
        match self.entries.get_mut(&id) {
            Some(Entry::Live(widget)) => Some(widget),
            _ => None,
        }
    }

    pub fn has_live(&self, id: BoxId) -> bool {
        matches!(self.entries.get(&id), Some(Entry::Live(_)))
    }

    pub fn is_pending(&self, id: BoxId) -> bool {
        matches!(self.entries.get(&id), Some(Entry::Pending(_)))
    }

    /// Disposes the live widget, if any, and forgets the entry either way.
    pub fn remove_editor(&mut self, id: BoxId) -> bool {
        match self.entries.remove(&id) {
            Some(Entry::Live(mut widget)) => {
                widget.dispose();
                true
            }
            Some(Entry::Pending(_)) => true,
            None => false,
        }
    }

    pub fn resize_editor(&mut self, id: BoxId, area: Rect) -> bool {
        match self.get_editor_mut(id) {
            Some(widget) => {
                widget.layout(area);
                true
            }
            None => false,
        }
    }

    pub fn live_ids(&self) -> Vec<BoxId> {
        let mut ids: Vec<BoxId> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Live(_)))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: EditorFactory> CodeSource for EditorRegistry<F> {
    fn live_code(&self, id: BoxId) -> Option<String> {
        self.get_editor(id).map(|widget| widget.value())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/editor/registry.rs"]
mod tests;
