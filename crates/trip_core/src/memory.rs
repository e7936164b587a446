use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{
    domain::PointId,
    error::ApiException,
    protocol::{Destination, OfferGroup, Point, PointDraft},
};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::RemoteGateway;

/// Everything the points API serves, in one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub offers: Vec<OfferGroup>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

impl Snapshot {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }
}

/// Gateway backed by an in-process [`Snapshot`]; ids of new points are random
/// UUIDs.
pub struct MemoryGateway {
    state: Mutex<Snapshot>,
}

impl MemoryGateway {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }
}

fn not_found(id: &PointId) -> anyhow::Error {
    ApiException::new(404, format!("point {id} not found")).into()
}

#[async_trait]
impl RemoteGateway for MemoryGateway {
    async fn points(&self) -> Result<Vec<Point>> {
        Ok(self.state.lock().await.points.clone())
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>> {
        Ok(self.state.lock().await.offers.clone())
    }

    async fn destinations(&self) -> Result<Vec<Destination>> {
        Ok(self.state.lock().await.destinations.clone())
    }

    async fn add_point(&self, draft: &PointDraft) -> Result<Point> {
        let point = Point::from_draft(PointId::new(Uuid::new_v4().to_string()), draft.clone());
        self.state.lock().await.points.push(point.clone());
        info!(point_id = %point.id, "memory gateway stored point");
        Ok(point)
    }

    async fn update_point(&self, point: &Point) -> Result<Point> {
        let mut guard = self.state.lock().await;
        let slot = guard
            .points
            .iter_mut()
            .find(|existing| existing.id == point.id)
            .ok_or_else(|| not_found(&point.id))?;
        *slot = point.clone();
        Ok(point.clone())
    }

    async fn delete_point(&self, point: &Point) -> Result<()> {
        let mut guard = self.state.lock().await;
        let before = guard.points.len();
        guard.points.retain(|existing| existing.id != point.id);
        if guard.points.len() == before {
            return Err(not_found(&point.id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
