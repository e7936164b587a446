use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{
    domain::{DestinationId, OfferId, PointId},
    protocol::{Destination, Offer, OfferGroup, Point, PointDraft},
};

use crate::RemoteGateway;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 8, 0, 0).single().expect("valid epoch")
}

pub fn at_hours(hours: i64) -> DateTime<Utc> {
    epoch() + Duration::hours(hours)
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
    ["Amsterdam", "Chamonix", "Geneva", "Paris"]
        .into_iter()
        .map(|name| Destination {
            id: DestinationId::new(name.to_ascii_lowercase()),
            name: name.to_string(),
            description: format!("{name} is a lovely place."),
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

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Points,
    Offers,
    Destinations,
    Add(PointDraft),
    Update(Point),
    Delete(PointId),
}

/// Scripted gateway that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingGateway {
    pub points: Vec<Point>,
    pub offers: Vec<OfferGroup>,
    pub destinations: Vec<Destination>,
    pub fail_offers: bool,
    pub fail_writes: bool,
    pub calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl RecordingGateway {
    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            points,
            offers: offers(),
            destinations: destinations(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn write_guard(&self) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for RecordingGateway {
    async fn points(&self) -> Result<Vec<Point>> {
        self.record(GatewayCall::Points);
        Ok(self.points.clone())
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>> {
        self.record(GatewayCall::Offers);
        if self.fail_offers {
            return Err(anyhow!("offers endpoint unavailable"));
        }
        Ok(self.offers.clone())
    }

    async fn destinations(&self) -> Result<Vec<Destination>> {
        self.record(GatewayCall::Destinations);
        Ok(self.destinations.clone())
    }

    async fn add_point(&self, draft: &PointDraft) -> Result<Point> {
        self.record(GatewayCall::Add(draft.clone()));
        self.write_guard()?;
        Ok(Point::from_draft(PointId::new("server-1"), draft.clone()))
    }

    async fn update_point(&self, point: &Point) -> Result<Point> {
        self.record(GatewayCall::Update(point.clone()));
        self.write_guard()?;
        Ok(point.clone())
    }

    async fn delete_point(&self, point: &Point) -> Result<()> {
        self.record(GatewayCall::Delete(point.id.clone()));
        self.write_guard()
    }
}
