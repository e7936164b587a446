use std::sync::Arc;

use anyhow::Result;
use shared::{
    domain::{DestinationId, PointId, UpdateKind},
    protocol::{Destination, Offer, OfferGroup, Point, PointDraft},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{observable::Observable, policy::compare_start, RemoteGateway};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("point {0} not found")]
    PointNotFound(PointId),
    #[error("{operation} request failed: {source}")]
    Gateway {
        operation: &'static str,
        source: anyhow::Error,
    },
    #[error("subscriber failed while handling {kind:?}: {source}")]
    Subscriber {
        kind: UpdateKind,
        source: anyhow::Error,
    },
}

impl ModelError {
    fn gateway(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| ModelError::Gateway { operation, source }
    }
}

/// Authoritative in-memory list of points plus reference data.
///
/// Every successful mutation re-sorts the list by start date and notifies
/// subscribers with the caller's update kind and the affected point.
pub struct RoutePointsModel {
    gateway: Arc<dyn RemoteGateway>,
    points: Vec<Point>,
    offers: Vec<OfferGroup>,
    destinations: Vec<Destination>,
    observers: Observable<Point>,
}

impl RoutePointsModel {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self {
            gateway,
            points: Vec::new(),
            offers: Vec::new(),
            destinations: Vec::new(),
            observers: Observable::new(),
        }
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(UpdateKind, Option<&Point>) -> Result<()> + Send + 'static,
    {
        self.observers.subscribe(handler);
    }

    /// Points ordered by start date.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.iter().find(|point| &point.id == id)
    }

    pub fn offers(&self) -> &[OfferGroup] {
        &self.offers
    }

    pub fn offers_for(&self, point_type: &str) -> &[Offer] {
        self.offers
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or(&[])
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, id: &DestinationId) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| &destination.id == id)
    }

    /// Loads points, offers and destinations concurrently.
    ///
    /// Either all three collections are replaced and `Init` is published, or
    /// all three are emptied and `Error` is published. A gateway failure is
    /// not returned to the caller.
    pub async fn init(&mut self) -> Result<(), ModelError> {
        let gateway = Arc::clone(&self.gateway);
        let loaded = futures::try_join!(
            gateway.points(),
            gateway.offers(),
            gateway.destinations()
        );

        match loaded {
            Ok((points, offers, destinations)) => {
                info!(
                    points = points.len(),
                    offer_groups = offers.len(),
                    destinations = destinations.len(),
                    "loaded trip data"
                );
                self.points = points;
                self.offers = offers;
                self.destinations = destinations;
                self.sort_by_start();
                self.notify(UpdateKind::Init, None)
            }
            Err(err) => {
                warn!(error = %err, "failed to load trip data");
                self.points.clear();
                self.offers.clear();
                self.destinations.clear();
                self.notify(UpdateKind::Error, None)
            }
        }
    }

    pub async fn add_point(
        &mut self,
        kind: UpdateKind,
        draft: PointDraft,
    ) -> Result<Point, ModelError> {
        let created = self
            .gateway
            .add_point(&draft)
            .await
            .map_err(ModelError::gateway("add_point"))?;
        info!(point_id = %created.id, "point added");

        self.points.insert(0, created.clone());
        self.sort_by_start();
        self.notify(kind, Some(&created))?;
        Ok(created)
    }

    pub async fn update_point(
        &mut self,
        kind: UpdateKind,
        update: Point,
    ) -> Result<Point, ModelError> {
        let index = self.index_of(&update.id)?;
        let updated = self
            .gateway
            .update_point(&update)
            .await
            .map_err(ModelError::gateway("update_point"))?;
        info!(point_id = %updated.id, ?kind, "point updated");

        self.points[index] = updated.clone();
        self.sort_by_start();
        self.notify(kind, Some(&updated))?;
        Ok(updated)
    }

    pub async fn delete_point(&mut self, kind: UpdateKind, target: Point) -> Result<(), ModelError> {
        let index = self.index_of(&target.id)?;
        self.gateway
            .delete_point(&target)
            .await
            .map_err(ModelError::gateway("delete_point"))?;
        info!(point_id = %target.id, "point deleted");

        self.points.remove(index);
        self.sort_by_start();
        self.notify(kind, Some(&target))
    }

    fn index_of(&self, id: &PointId) -> Result<usize, ModelError> {
        self.points
            .iter()
            .position(|point| &point.id == id)
            .ok_or_else(|| ModelError::PointNotFound(id.clone()))
    }

    fn sort_by_start(&mut self) {
        self.points.sort_by(compare_start);
    }

    fn notify(&mut self, kind: UpdateKind, payload: Option<&Point>) -> Result<(), ModelError> {
        self.observers
            .notify(kind, payload)
            .map_err(|source| ModelError::Subscriber { kind, source })
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
