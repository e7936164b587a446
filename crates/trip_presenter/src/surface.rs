//! Rendering surface abstraction and a headless in-memory implementation.

use std::{
    collections::HashMap,
    fmt::Write as _,
    sync::atomic::{AtomicU64, Ordering},
};

use shared::domain::PointId;
use tracing::debug;

use crate::components::Component;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

/// Named mount points of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    TripMain,
    Filters,
    Events,
    EventList,
}

impl Container {
    pub const ALL: [Container; 4] = [
        Container::TripMain,
        Container::Filters,
        Container::Events,
        Container::EventList,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPosition {
    AfterBegin,
    #[default]
    BeforeEnd,
}

/// A renderable element: an identity plus what it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    id: ViewId,
    component: Component,
}

impl View {
    pub fn new(component: Component) -> Self {
        Self {
            id: ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)),
            component,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn component(&self) -> &Component {
        &self.component
    }
}

/// The operations the presenters need from the page.
pub trait Surface {
    fn render(&mut self, view: &View, container: Container, position: RenderPosition);
    /// Swaps `old_view` for `new_view` in place; no-op if `old_view` is detached.
    fn replace(&mut self, new_view: &View, old_view: &View);
    fn remove(&mut self, view: &View);
    fn is_attached(&self, view: &View) -> bool;
}

/// Headless surface keeping ordered children per container.
#[derive(Debug, Default)]
pub struct DomTree {
    slots: HashMap<Container, Vec<View>>,
}

impl DomTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self, container: Container) -> &[View] {
        self.slots
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, container: Container, predicate: impl Fn(&Component) -> bool) -> bool {
        self.views(container)
            .iter()
            .any(|view| predicate(view.component()))
    }

    /// Point ids of rows and edit forms in the list, top to bottom.
    pub fn listed_point_ids(&self) -> Vec<PointId> {
        self.views(Container::EventList)
            .iter()
            .filter_map(|view| view.component().point_id().cloned())
            .collect()
    }

    /// Plain-text dump of the page, one element per line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for container in Container::ALL {
            let views = self.views(container);
            if views.is_empty() {
                continue;
            }
            let _ = writeln!(out, "[{container:?}]");
            for view in views {
                let _ = writeln!(out, "  {}", view.component());
            }
        }
        out
    }

    fn locate(&self, id: ViewId) -> Option<(Container, usize)> {
        self.slots.iter().find_map(|(container, views)| {
            views
                .iter()
                .position(|view| view.id == id)
                .map(|index| (*container, index))
        })
    }
}

impl Surface for DomTree {
    fn render(&mut self, view: &View, container: Container, position: RenderPosition) {
        self.remove(view);
        let views = self.slots.entry(container).or_default();
        match position {
            RenderPosition::AfterBegin => views.insert(0, view.clone()),
            RenderPosition::BeforeEnd => views.push(view.clone()),
        }
    }

    fn replace(&mut self, new_view: &View, old_view: &View) {
        if new_view.id == old_view.id {
            return;
        }
        let Some((container, index)) = self.locate(old_view.id) else {
            debug!(view = old_view.id.0, "replace target is detached");
            return;
        };
        self.remove(new_view);
        // Removing `new_view` can shift the target within the same container.
        let index = self
            .slots
            .get(&container)
            .and_then(|views| views.iter().position(|view| view.id == old_view.id))
            .unwrap_or(index);
        if let Some(views) = self.slots.get_mut(&container) {
            views[index] = new_view.clone();
        }
    }

    fn remove(&mut self, view: &View) {
        for views in self.slots.values_mut() {
            views.retain(|existing| existing.id != view.id);
        }
    }

    fn is_attached(&self, view: &View) -> bool {
        self.locate(view.id).is_some()
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
