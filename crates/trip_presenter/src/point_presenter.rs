use std::rc::Rc;

use shared::{
    domain::{UpdateKind, UserAction},
    protocol::{Point, PointDraft},
};
use tracing::debug;

use crate::{
    components::{Catalog, Component, FormState, PointCard, PointForm},
    keyboard::{KeyListeners, KeySubscription, ListenerOwner},
    surface::{Container, RenderPosition, Surface, View},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Default,
    Editing,
}

/// A mutation requested from a row or form, to be applied through the model.
#[derive(Debug, Clone, PartialEq)]
pub enum PointChange {
    Update { kind: UpdateKind, point: Point },
    Add { kind: UpdateKind, draft: PointDraft },
    Delete { kind: UpdateKind, point: Point },
}

impl PointChange {
    pub fn action(&self) -> UserAction {
        match self {
            PointChange::Update { .. } => UserAction::UpdatePoint,
            PointChange::Add { .. } => UserAction::AddPoint,
            PointChange::Delete { .. } => UserAction::DeletePoint,
        }
    }

    pub fn update_kind(&self) -> UpdateKind {
        match self {
            PointChange::Update { kind, .. }
            | PointChange::Add { kind, .. }
            | PointChange::Delete { kind, .. } => *kind,
        }
    }
}

/// Owns one point's read-only row and, while editing, its edit form.
pub struct RoutePointPresenter {
    catalog: Rc<Catalog>,
    keys: KeyListeners,
    point: Option<Point>,
    mode: Mode,
    point_view: Option<View>,
    edit_view: Option<View>,
    escape: Option<KeySubscription>,
}

impl RoutePointPresenter {
    pub fn new(catalog: Rc<Catalog>, keys: KeyListeners) -> Self {
        Self {
            catalog,
            keys,
            point: None,
            mode: Mode::Default,
            point_view: None,
            edit_view: None,
            escape: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref()
    }

    /// Renders `point` as a fresh row, discarding anything rendered before.
    pub fn init(&mut self, surface: &mut dyn Surface, point: Point) {
        self.destroy(surface);
        let view = View::new(Component::Point(PointCard::build(&point, &self.catalog)));
        surface.render(&view, Container::EventList, RenderPosition::BeforeEnd);
        self.point_view = Some(view);
        self.point = Some(point);
        self.mode = Mode::Default;
    }

    pub fn destroy(&mut self, surface: &mut dyn Surface) {
        if let Some(view) = self.point_view.take() {
            surface.remove(&view);
        }
        if let Some(view) = self.edit_view.take() {
            surface.remove(&view);
        }
        self.escape = None;
        self.mode = Mode::Default;
    }

    /// Swaps the row for the edit form. Returns `false` when nothing changed,
    /// e.g. because the row is no longer attached.
    pub fn open_editor(&mut self, surface: &mut dyn Surface) -> bool {
        let (Some(point), Some(row)) = (self.point.as_ref(), self.point_view.as_ref()) else {
            return false;
        };
        if self.mode == Mode::Editing || !surface.is_attached(row) {
            return false;
        }

        let form = View::new(Component::Form(PointForm::edit(
            point,
            &self.catalog,
            FormState::Idle,
        )));
        surface.replace(&form, row);
        self.edit_view = Some(form);
        self.mode = Mode::Editing;
        self.escape = Some(self.keys.subscribe(ListenerOwner::Point(point.id.clone())));
        debug!(point_id = %point.id, "edit form opened");
        true
    }

    pub fn close_editor(&mut self, surface: &mut dyn Surface) {
        self.escape = None;
        let Some(form) = self.edit_view.take() else {
            return;
        };
        self.mode = Mode::Default;
        if !surface.is_attached(&form) {
            return;
        }
        if let Some(row) = self.point_view.as_ref() {
            surface.replace(row, &form);
        }
        if let Some(point) = self.point.as_ref() {
            debug!(point_id = %point.id, "edit form closed");
        }
    }

    pub fn reset_mode(&mut self, surface: &mut dyn Surface) {
        if self.mode != Mode::Default {
            self.close_editor(surface);
        }
    }

    /// The favorite flag flipped and nothing else, as a lightweight patch.
    pub fn toggle_favorite(&self) -> Option<PointChange> {
        let mut point = self.point.clone()?;
        point.is_favorite = !point.is_favorite;
        Some(PointChange::Update {
            kind: UpdateKind::Patch,
            point,
        })
    }

    pub fn submit(&self, edited: Point) -> Option<PointChange> {
        let current = self.point.as_ref()?;
        if current.id != edited.id {
            return None;
        }
        Some(PointChange::Update {
            kind: UpdateKind::Minor,
            point: edited,
        })
    }

    pub fn delete(&self) -> Option<PointChange> {
        Some(PointChange::Delete {
            kind: UpdateKind::Minor,
            point: self.point.clone()?,
        })
    }

    pub fn set_saving(&mut self, surface: &mut dyn Surface) {
        self.set_form_state(surface, FormState::Saving);
    }

    pub fn set_deleting(&mut self, surface: &mut dyn Surface) {
        self.set_form_state(surface, FormState::Deleting);
    }

    /// Re-enables the form after a failed request.
    pub fn set_aborting(&mut self, surface: &mut dyn Surface) {
        self.set_form_state(surface, FormState::Aborted);
    }

    pub fn form_state(&self) -> Option<FormState> {
        match self.edit_view.as_ref().map(View::component) {
            Some(Component::Form(form)) => Some(form.state),
            _ => None,
        }
    }

    fn set_form_state(&mut self, surface: &mut dyn Surface, state: FormState) {
        let (Some(point), Some(form)) = (self.point.as_ref(), self.edit_view.as_ref()) else {
            return;
        };
        if !surface.is_attached(form) {
            return;
        }
        let next = View::new(Component::Form(PointForm::edit(point, &self.catalog, state)));
        surface.replace(&next, form);
        self.edit_view = Some(next);
    }
}

#[cfg(test)]
#[path = "tests/point_presenter_tests.rs"]
mod tests;
