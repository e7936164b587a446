//! Data layer of the trip planner: the observable point model, the filter
//! state holder, pure list policies and the remote gateway.

pub mod filter_model;
pub mod format;
pub mod gateway;
pub mod memory;
pub mod model;
pub mod observable;
pub mod policy;
pub mod summary;

pub use filter_model::FilterModel;
pub use gateway::{HttpGateway, RemoteGateway};
pub use memory::{MemoryGateway, Snapshot};
pub use model::{ModelError, RoutePointsModel};
pub use observable::Observable;
pub use summary::TripSummary;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
