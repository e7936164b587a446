//! Presenter layer: keeps a rendered list of point rows and edit forms in sync
//! with the points model under filtering, sorting and single-form editing.
//!
//! Everything here is single-threaded; presenters share keyboard
//! subscriptions through `Rc` and are not `Send`.

pub mod components;
pub mod keyboard;
pub mod new_point_presenter;
pub mod point_presenter;
pub mod surface;
pub mod trip_presenter;

pub use components::{Catalog, Component};
pub use keyboard::{Key, KeyListeners, KeySubscription, ListenerOwner};
pub use new_point_presenter::NewRoutePointPresenter;
pub use point_presenter::{Mode, PointChange, RoutePointPresenter};
pub use surface::{Container, DomTree, RenderPosition, Surface, View, ViewId};
pub use trip_presenter::{Phase, TripError, TripPresenter};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
