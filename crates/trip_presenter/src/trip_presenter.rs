use std::{collections::HashMap, rc::Rc, sync::Arc};

use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver};
use shared::{
    domain::{FilterKind, PointId, SortKind, UpdateKind},
    protocol::{Point, PointDraft},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use trip_core::{
    policy::{filter_counts, sort_points, visible_points},
    summary::trip_summary,
    FilterModel, ModelError, RemoteGateway, RoutePointsModel,
};

use crate::{
    components::{empty_list_message, Catalog, Component, FAILURE_MESSAGE, LOADING_MESSAGE},
    keyboard::{Key, KeyListeners, ListenerOwner},
    new_point_presenter::NewRoutePointPresenter,
    point_presenter::{Mode, PointChange, RoutePointPresenter},
    surface::{Container, RenderPosition, Surface, View},
};

#[derive(Debug, Error)]
pub enum TripError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("filter subscriber failed: {source}")]
    Filter { source: anyhow::Error },
    #[error("point {0} is not rendered")]
    NotRendered(PointId),
    #[error("no creation form is open")]
    NoCreationForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error,
    Empty,
    List,
}

/// Notification queued by a model subscriber, handled once the triggering
/// call returns.
#[derive(Debug, Clone, Copy)]
enum ModelEvent {
    Points(UpdateKind),
    Filter(UpdateKind),
}

impl ModelEvent {
    fn kind(self) -> UpdateKind {
        match self {
            ModelEvent::Points(kind) | ModelEvent::Filter(kind) => kind,
        }
    }
}

/// Top-level orchestrator of the trip page.
pub struct TripPresenter<S: Surface> {
    surface: S,
    points_model: RoutePointsModel,
    filter_model: FilterModel,
    events: Receiver<ModelEvent>,
    keys: KeyListeners,
    catalog: Rc<Catalog>,
    clock: fn() -> DateTime<Utc>,
    phase: Phase,
    sort_kind: SortKind,
    visible: Vec<Point>,
    point_presenters: HashMap<PointId, RoutePointPresenter>,
    new_point_presenter: Option<NewRoutePointPresenter>,
    new_point_disabled: bool,
    event_list: View,
    loading_view: Option<View>,
    failure_view: Option<View>,
    empty_view: Option<View>,
    sort_view: Option<View>,
    filter_view: Option<View>,
    summary_view: Option<View>,
    new_point_button: Option<View>,
}

impl<S: Surface> TripPresenter<S> {
    pub fn new(surface: S, gateway: Arc<dyn RemoteGateway>) -> Self {
        Self::with_clock(surface, gateway, Utc::now)
    }

    pub fn with_clock(
        surface: S,
        gateway: Arc<dyn RemoteGateway>,
        clock: fn() -> DateTime<Utc>,
    ) -> Self {
        let (tx, events) = unbounded();
        let mut points_model = RoutePointsModel::new(gateway);
        let points_tx = tx.clone();
        points_model.subscribe(move |kind, _| {
            points_tx
                .send(ModelEvent::Points(kind))
                .map_err(|err| anyhow::anyhow!("trip presenter dropped: {err}"))
        });
        let mut filter_model = FilterModel::new();
        filter_model.subscribe(move |kind, _| {
            tx.send(ModelEvent::Filter(kind))
                .map_err(|err| anyhow::anyhow!("trip presenter dropped: {err}"))
        });

        Self {
            surface,
            points_model,
            filter_model,
            events,
            keys: KeyListeners::new(),
            catalog: Rc::new(Catalog::default()),
            clock,
            phase: Phase::Loading,
            sort_kind: SortKind::Day,
            visible: Vec::new(),
            point_presenters: HashMap::new(),
            new_point_presenter: None,
            new_point_disabled: true,
            event_list: View::new(Component::EventList),
            loading_view: None,
            failure_view: None,
            empty_view: None,
            sort_view: None,
            filter_view: None,
            summary_view: None,
            new_point_button: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn points_model(&self) -> &RoutePointsModel {
        &self.points_model
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sort_kind(&self) -> SortKind {
        self.sort_kind
    }

    pub fn filter(&self) -> FilterKind {
        self.filter_model.filter()
    }

    /// Ids of the filtered points in current render order.
    pub fn visible_ids(&self) -> Vec<PointId> {
        self.visible.iter().map(|point| point.id.clone()).collect()
    }

    pub fn rendered_ids(&self) -> Vec<PointId> {
        self.point_presenters.keys().cloned().collect()
    }

    pub fn mode_of(&self, id: &PointId) -> Option<Mode> {
        self.point_presenters.get(id).map(RoutePointPresenter::mode)
    }

    pub fn is_new_point_form_open(&self) -> bool {
        self.new_point_presenter
            .as_ref()
            .is_some_and(NewRoutePointPresenter::is_open)
    }

    pub fn is_new_point_button_disabled(&self) -> bool {
        self.new_point_disabled
    }

    /// Shows the loading indicator and loads the model. Calling it again after
    /// a load failure retries from scratch.
    pub async fn init(&mut self) -> Result<(), TripError> {
        if let Some(view) = self.failure_view.take() {
            self.surface.remove(&view);
        }
        self.phase = Phase::Loading;
        self.new_point_disabled = true;
        let loading = View::new(Component::Message(LOADING_MESSAGE.to_string()));
        self.surface
            .render(&loading, Container::Events, RenderPosition::BeforeEnd);
        self.loading_view = Some(loading);
        self.render_new_point_button();

        let result = self.points_model.init().await;
        self.drain_events();
        result.map_err(TripError::from)
    }

    // ---- user intents -------------------------------------------------

    pub fn open_point_editor(&mut self, id: &PointId) -> Result<(), TripError> {
        if !self.point_presenters.contains_key(id) {
            return Err(TripError::NotRendered(id.clone()));
        }
        if self.is_new_point_form_open() {
            self.close_new_point_form();
        }

        let opened = match self.point_presenters.get_mut(id) {
            Some(presenter) => presenter.open_editor(&mut self.surface),
            None => false,
        };
        if opened {
            self.on_mode_change(Some(id));
        }
        Ok(())
    }

    pub fn close_point_editor(&mut self, id: &PointId) -> Result<(), TripError> {
        let presenter = self
            .point_presenters
            .get_mut(id)
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        presenter.close_editor(&mut self.surface);
        Ok(())
    }

    pub fn handle_key(&mut self, key: Key) {
        if !key.is_escape() {
            return;
        }
        for owner in self.keys.owners() {
            match owner {
                ListenerOwner::Point(id) => {
                    if let Some(presenter) = self.point_presenters.get_mut(&id) {
                        presenter.close_editor(&mut self.surface);
                    }
                }
                ListenerOwner::NewPoint => self.close_new_point_form(),
            }
        }
    }

    pub async fn toggle_favorite(&mut self, id: &PointId) -> Result<(), TripError> {
        let change = self
            .point_presenters
            .get(id)
            .and_then(RoutePointPresenter::toggle_favorite)
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        self.handle_view_action(change).await
    }

    /// Saves an edited point; on failure the form stays open and usable.
    pub async fn submit_point(&mut self, edited: Point) -> Result<(), TripError> {
        let id = edited.id.clone();
        let presenter = self
            .point_presenters
            .get_mut(&id)
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        let change = presenter
            .submit(edited)
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        presenter.set_saving(&mut self.surface);

        let result = self.handle_view_action(change).await;
        if result.is_err() {
            self.abort_point_form(&id);
        }
        result
    }

    pub async fn delete_point(&mut self, id: &PointId) -> Result<(), TripError> {
        let presenter = self
            .point_presenters
            .get_mut(id)
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        let change = presenter
            .delete()
            .ok_or_else(|| TripError::NotRendered(id.clone()))?;
        presenter.set_deleting(&mut self.surface);

        let result = self.handle_view_action(change).await;
        if result.is_err() {
            self.abort_point_form(id);
        }
        result
    }

    pub fn change_sort(&mut self, sort: SortKind) {
        if sort == self.sort_kind || self.phase != Phase::List {
            return;
        }
        debug!(sort = sort.as_str(), "sort changed");
        self.sort_kind = sort;
        self.visible = sort_points(sort, &self.visible);
        self.clear_point_presenters();
        self.render_point_presenters();
    }

    pub fn change_filter(&mut self, filter: FilterKind) -> Result<(), TripError> {
        if filter == self.filter_model.filter() || !self.is_settled() {
            return Ok(());
        }
        self.set_filter(filter)
    }

    /// Opens the creation form with the list reset to all points by day.
    ///
    /// Returns `false` while the trigger is disabled or nothing is loaded.
    pub fn open_new_point_form(&mut self) -> Result<bool, TripError> {
        if self.new_point_disabled
            || self.new_point_presenter.is_none()
            || !self.is_settled()
        {
            return Ok(false);
        }
        self.sort_kind = SortKind::Day;
        self.set_filter(FilterKind::Everything)?;

        self.remove_empty_message();
        if !self.surface.is_attached(&self.event_list) {
            self.surface
                .render(&self.event_list, Container::Events, RenderPosition::BeforeEnd);
        }
        self.on_mode_change(None);

        let opened = match self.new_point_presenter.as_mut() {
            Some(presenter) => presenter.init(&mut self.surface),
            None => false,
        };
        if opened {
            self.new_point_disabled = true;
            self.render_new_point_button();
        }
        Ok(opened)
    }

    /// Creates a point from the open form; on failure the form stays open and
    /// usable.
    pub async fn submit_new_point(&mut self, draft: PointDraft) -> Result<(), TripError> {
        let presenter = self
            .new_point_presenter
            .as_mut()
            .ok_or(TripError::NoCreationForm)?;
        let change = presenter.submit(draft).ok_or(TripError::NoCreationForm)?;
        presenter.set_saving(&mut self.surface);

        let result = self.handle_view_action(change).await;
        if result.is_err() {
            if let Some(presenter) = self.new_point_presenter.as_mut() {
                presenter.set_aborting(&mut self.surface);
            }
        }
        result
    }

    pub fn cancel_new_point(&mut self) {
        self.close_new_point_form();
    }

    // ---- model plumbing -----------------------------------------------

    async fn handle_view_action(&mut self, change: PointChange) -> Result<(), TripError> {
        debug!(action = ?change.action(), kind = ?change.update_kind(), "view action");
        let result = match change {
            PointChange::Update { kind, point } => self
                .points_model
                .update_point(kind, point)
                .await
                .map(|_| ()),
            PointChange::Add { kind, draft } => {
                self.points_model.add_point(kind, draft).await.map(|_| ())
            }
            PointChange::Delete { kind, point } => {
                self.points_model.delete_point(kind, point).await
            }
        };
        self.drain_events();
        if let Err(err) = &result {
            warn!(error = %err, "point change rejected");
        }
        result.map_err(TripError::from)
    }

    fn set_filter(&mut self, filter: FilterKind) -> Result<(), TripError> {
        let result = self.filter_model.set_filter(UpdateKind::Major, filter);
        self.drain_events();
        result.map_err(|source| TripError::Filter { source })
    }

    fn drain_events(&mut self) {
        let pending: Vec<ModelEvent> = self.events.try_iter().collect();
        for event in pending {
            self.handle_model_event(event);
        }
    }

    fn handle_model_event(&mut self, event: ModelEvent) {
        let kind = event.kind();
        debug!(?event, "model notification");
        self.visible = visible_points(
            self.filter_model.filter(),
            self.points_model.points(),
            (self.clock)(),
        );

        match kind {
            UpdateKind::Init => {
                self.clear_board();
                self.catalog = Rc::new(Catalog {
                    destinations: self.points_model.destinations().to_vec(),
                    offers: self.points_model.offers().to_vec(),
                });
                self.remove_loading();
                self.sort_kind = SortKind::Day;
                self.visible = sort_points(self.sort_kind, &self.visible);
                self.new_point_presenter = Some(NewRoutePointPresenter::new(
                    Rc::clone(&self.catalog),
                    self.keys.clone(),
                ));
                self.new_point_disabled = false;
                self.render_new_point_button();
                self.render_sort();
                self.render_summary();
                self.render_filters();
                self.render_list();
                info!(visible = self.visible.len(), "trip rendered");
            }
            UpdateKind::Patch => {
                self.visible = sort_points(self.sort_kind, &self.visible);
                self.clear_point_presenters();
                self.render_point_presenters();
                self.render_summary();
            }
            UpdateKind::Minor => {
                self.clear_board();
                self.visible = sort_points(self.sort_kind, &self.visible);
                self.render_list();
                self.render_summary();
                self.render_filters();
                if self.visible.is_empty() || self.sort_view.is_none() {
                    self.render_sort();
                }
            }
            UpdateKind::Major => {
                self.clear_board();
                self.sort_kind = SortKind::Day;
                self.visible = sort_points(self.sort_kind, &self.visible);
                self.render_sort();
                self.render_list();
                self.render_summary();
                self.render_filters();
            }
            UpdateKind::Error => {
                self.remove_loading();
                self.clear_board();
                self.new_point_presenter = None;
                self.new_point_disabled = true;
                self.render_new_point_button();
                self.surface.remove(&self.event_list);
                for view in [self.sort_view.take(), self.summary_view.take()]
                    .into_iter()
                    .flatten()
                {
                    self.surface.remove(&view);
                }
                let failure = View::new(Component::Message(FAILURE_MESSAGE.to_string()));
                self.surface
                    .render(&failure, Container::Events, RenderPosition::BeforeEnd);
                self.failure_view = Some(failure);
                self.phase = Phase::Error;
                warn!("trip data unavailable");
            }
        }
    }

    // ---- rendering ----------------------------------------------------

    fn on_mode_change(&mut self, except: Option<&PointId>) {
        for (id, presenter) in self.point_presenters.iter_mut() {
            if except != Some(id) {
                presenter.reset_mode(&mut self.surface);
            }
        }
    }

    fn abort_point_form(&mut self, id: &PointId) {
        if let Some(presenter) = self.point_presenters.get_mut(id) {
            presenter.set_aborting(&mut self.surface);
        }
    }

    fn close_new_point_form(&mut self) {
        let closed = match self.new_point_presenter.as_mut() {
            Some(presenter) => presenter.destroy(&mut self.surface),
            None => false,
        };
        if !closed {
            return;
        }
        self.new_point_disabled = false;
        self.render_new_point_button();
        if self.visible.is_empty() && !self.is_settled_on_error() {
            self.surface.remove(&self.event_list);
            self.render_empty_message();
            self.phase = Phase::Empty;
        }
    }

    fn clear_board(&mut self) {
        self.clear_point_presenters();
        let closed = match self.new_point_presenter.as_mut() {
            Some(presenter) => presenter.destroy(&mut self.surface),
            None => false,
        };
        if closed {
            self.new_point_disabled = false;
            self.render_new_point_button();
        }
        self.remove_empty_message();
    }

    fn clear_point_presenters(&mut self) {
        for (_, mut presenter) in self.point_presenters.drain() {
            presenter.destroy(&mut self.surface);
        }
    }

    fn render_point_presenters(&mut self) {
        for point in &self.visible {
            let mut presenter =
                RoutePointPresenter::new(Rc::clone(&self.catalog), self.keys.clone());
            presenter.init(&mut self.surface, point.clone());
            self.point_presenters.insert(point.id.clone(), presenter);
        }
    }

    fn render_list(&mut self) {
        if self.visible.is_empty() {
            self.surface.remove(&self.event_list);
            self.render_empty_message();
            self.phase = Phase::Empty;
            return;
        }
        self.remove_empty_message();
        if !self.surface.is_attached(&self.event_list) {
            self.surface
                .render(&self.event_list, Container::Events, RenderPosition::BeforeEnd);
        }
        self.render_point_presenters();
        self.phase = Phase::List;
    }

    fn render_empty_message(&mut self) {
        if self.empty_view.is_some() {
            return;
        }
        let message = empty_list_message(self.filter_model.filter());
        let view = View::new(Component::Message(message.to_string()));
        self.surface
            .render(&view, Container::Events, RenderPosition::BeforeEnd);
        self.empty_view = Some(view);
    }

    fn remove_empty_message(&mut self) {
        if let Some(view) = self.empty_view.take() {
            self.surface.remove(&view);
        }
    }

    fn remove_loading(&mut self) {
        if let Some(view) = self.loading_view.take() {
            self.surface.remove(&view);
        }
    }

    /// Sort control exists only above a non-empty list.
    fn render_sort(&mut self) {
        if let Some(view) = self.sort_view.take() {
            self.surface.remove(&view);
        }
        if self.visible.is_empty() {
            return;
        }
        let view = View::new(Component::Sort {
            active: self.sort_kind,
        });
        self.surface
            .render(&view, Container::Events, RenderPosition::AfterBegin);
        self.sort_view = Some(view);
    }

    fn render_summary(&mut self) {
        let summary = trip_summary(
            self.points_model.points(),
            &self.catalog.destinations,
            &self.catalog.offers,
        );
        let next = summary.map(|summary| View::new(Component::TripInfo(summary)));
        let previous = self.summary_view.take();
        self.summary_view = self.swap_view(
            previous,
            next,
            Container::TripMain,
            RenderPosition::AfterBegin,
        );
    }

    fn render_filters(&mut self) {
        let next = View::new(Component::Filters {
            active: self.filter_model.filter(),
            counts: filter_counts(self.points_model.points(), (self.clock)()),
        });
        let previous = self.filter_view.take();
        self.filter_view = self.swap_view(
            previous,
            Some(next),
            Container::Filters,
            RenderPosition::BeforeEnd,
        );
    }

    fn render_new_point_button(&mut self) {
        let next = View::new(Component::NewPointButton {
            disabled: self.new_point_disabled,
        });
        let previous = self.new_point_button.take();
        self.new_point_button = self.swap_view(
            previous,
            Some(next),
            Container::TripMain,
            RenderPosition::BeforeEnd,
        );
    }

    /// Replaces `previous` with `next` in place, or mounts/unmounts as needed.
    fn swap_view(
        &mut self,
        previous: Option<View>,
        next: Option<View>,
        container: Container,
        position: RenderPosition,
    ) -> Option<View> {
        match (previous, next) {
            (Some(previous), Some(next)) if self.surface.is_attached(&previous) => {
                self.surface.replace(&next, &previous);
                Some(next)
            }
            (previous, Some(next)) => {
                if let Some(previous) = previous {
                    self.surface.remove(&previous);
                }
                self.surface.render(&next, container, position);
                Some(next)
            }
            (previous, None) => {
                if let Some(previous) = previous {
                    self.surface.remove(&previous);
                }
                None
            }
        }
    }

    fn is_settled_on_error(&self) -> bool {
        self.phase == Phase::Error
    }

    /// Loaded and showing either the list or the empty message.
    fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Empty | Phase::List)
    }
}

#[cfg(test)]
#[path = "tests/trip_presenter_tests.rs"]
mod tests;
