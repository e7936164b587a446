use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{
    domain::{DestinationId, OfferId, PointId},
    protocol::{Destination, Offer, OfferGroup, Point, PointDraft},
};
use trip_core::RemoteGateway;

use crate::components::Catalog;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 8, 0, 0).single().expect("valid now")
}

pub fn at_hours(hours: i64) -> DateTime<Utc> {
    now() + Duration::hours(hours)
}

pub fn point(id: &str, from_hours: i64, to_hours: i64, price: i64) -> Point {
    Point {
        id: PointId::new(id),
        point_type: "taxi".to_string(),
        destination: DestinationId::new("amsterdam"),
        date_from: Some(at_hours(from_hours)),
        date_to: Some(at_hours(to_hours)),
        base_price: price,
        is_favorite: false,
        offers: Vec::new(),
    }
}

pub fn destinations() -> Vec<Destination> {
    ["Amsterdam", "Chamonix", "Geneva"]
        .into_iter()
        .map(|name| Destination {
            id: DestinationId::new(name.to_ascii_lowercase()),
            name: name.to_string(),
            description: format!("{name} at dawn."),
            pictures: Vec::new(),
        })
        .collect()
}

pub fn offers() -> Vec<OfferGroup> {
    vec![OfferGroup {
        point_type: "taxi".to_string(),
        offers: vec![
            Offer {
                id: OfferId::new("upgrade"),
                title: "Upgrade to a business class".to_string(),
                price: 120,
            },
            Offer {
                id: OfferId::new("radio"),
                title: "Choose the radio station".to_string(),
                price: 60,
            },
        ],
    }]
}

pub fn catalog() -> Catalog {
    Catalog {
        destinations: destinations(),
        offers: offers(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Add(PointDraft),
    Update(Point),
    Delete(PointId),
}

/// In-process backend for presenter tests. Writes are recorded; loads and
/// writes can be made to fail through the shared switches.
#[derive(Default)]
pub struct StubGateway {
    pub points: Vec<Point>,
    pub fail_load: Arc<Mutex<bool>>,
    pub fail_writes: Arc<Mutex<bool>>,
    pub writes: Arc<Mutex<Vec<Write>>>,
}

impl StubGateway {
    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    fn record(&self, write: Write) -> Result<()> {
        self.writes.lock().expect("writes lock").push(write);
        if *self.fail_writes.lock().expect("fail lock") {
            return Err(anyhow!("503 service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for StubGateway {
    async fn points(&self) -> Result<Vec<Point>> {
        if *self.fail_load.lock().expect("fail lock") {
            return Err(anyhow!("points endpoint unavailable"));
        }
        Ok(self.points.clone())
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>> {
        Ok(offers())
    }

    async fn destinations(&self) -> Result<Vec<Destination>> {
        Ok(destinations())
    }

    async fn add_point(&self, draft: &PointDraft) -> Result<Point> {
        self.record(Write::Add(draft.clone()))?;
        Ok(Point::from_draft(PointId::new("created-1"), draft.clone()))
    }

    async fn update_point(&self, point: &Point) -> Result<Point> {
        self.record(Write::Update(point.clone()))?;
        Ok(point.clone())
    }

    async fn delete_point(&self, point: &Point) -> Result<()> {
        self.record(Write::Delete(point.id.clone()))
    }
}
