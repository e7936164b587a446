use std::rc::Rc;

use shared::{domain::UpdateKind, protocol::PointDraft};
use tracing::debug;

use crate::{
    components::{Catalog, Component, FormState, PointForm},
    keyboard::{KeyListeners, KeySubscription, ListenerOwner},
    point_presenter::PointChange,
    surface::{Container, RenderPosition, Surface, View},
};

/// The transient "new event" form shown above the list.
pub struct NewRoutePointPresenter {
    catalog: Rc<Catalog>,
    keys: KeyListeners,
    draft: PointDraft,
    form_view: Option<View>,
    escape: Option<KeySubscription>,
}

impl NewRoutePointPresenter {
    pub fn new(catalog: Rc<Catalog>, keys: KeyListeners) -> Self {
        Self {
            catalog,
            keys,
            draft: PointDraft::default(),
            form_view: None,
            escape: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.form_view.is_some()
    }

    /// Opens a blank form; returns `false` if one is already open.
    pub fn init(&mut self, surface: &mut dyn Surface) -> bool {
        if self.form_view.is_some() {
            return false;
        }
        self.draft = PointDraft::default();
        let view = View::new(Component::Form(PointForm::create(
            &self.draft,
            &self.catalog,
            FormState::Idle,
        )));
        surface.render(&view, Container::EventList, RenderPosition::AfterBegin);
        self.form_view = Some(view);
        self.escape = Some(self.keys.subscribe(ListenerOwner::NewPoint));
        debug!("creation form opened");
        true
    }

    /// Removes the form; returns whether one was open.
    pub fn destroy(&mut self, surface: &mut dyn Surface) -> bool {
        self.escape = None;
        let Some(view) = self.form_view.take() else {
            return false;
        };
        surface.remove(&view);
        debug!("creation form closed");
        true
    }

    pub fn submit(&mut self, draft: PointDraft) -> Option<PointChange> {
        if !self.is_open() {
            return None;
        }
        self.draft = draft.clone();
        Some(PointChange::Add {
            kind: UpdateKind::Major,
            draft,
        })
    }

    pub fn set_saving(&mut self, surface: &mut dyn Surface) {
        self.set_form_state(surface, FormState::Saving);
    }

    pub fn set_aborting(&mut self, surface: &mut dyn Surface) {
        self.set_form_state(surface, FormState::Aborted);
    }

    pub fn form_state(&self) -> Option<FormState> {
        match self.form_view.as_ref().map(View::component) {
            Some(Component::Form(form)) => Some(form.state),
            _ => None,
        }
    }

    fn set_form_state(&mut self, surface: &mut dyn Surface, state: FormState) {
        let Some(form) = self.form_view.as_ref() else {
            return;
        };
        if !surface.is_attached(form) {
            return;
        }
        let next = View::new(Component::Form(PointForm::create(
            &self.draft,
            &self.catalog,
            state,
        )));
        surface.replace(&next, form);
        self.form_view = Some(next);
    }
}

#[cfg(test)]
#[path = "tests/new_point_presenter_tests.rs"]
mod tests;
