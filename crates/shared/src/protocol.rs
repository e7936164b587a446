use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DestinationId, OfferId, PointId};

/// Point type preselected on a fresh creation form.
pub const DEFAULT_POINT_TYPE: &str = "flight";

/// A route point exactly as the remote API exchanges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(rename = "type")]
    pub point_type: String,
    pub destination: DestinationId,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    pub base_price: i64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub offers: Vec<OfferId>,
}

impl Point {
    pub fn from_draft(id: PointId, draft: PointDraft) -> Self {
        Self {
            id,
            point_type: draft.point_type,
            destination: draft.destination,
            date_from: draft.date_from,
            date_to: draft.date_to,
            base_price: draft.base_price,
            is_favorite: draft.is_favorite,
            offers: draft.offers,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => Some(to - from),
            _ => None,
        }
    }
}

/// Point payload sent to the create endpoint; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDraft {
    #[serde(rename = "type")]
    pub point_type: String,
    pub destination: DestinationId,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    pub base_price: i64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub offers: Vec<OfferId>,
}

impl Default for PointDraft {
    fn default() -> Self {
        Self {
            point_type: DEFAULT_POINT_TYPE.to_string(),
            destination: DestinationId::default(),
            date_from: None,
            date_to: None,
            base_price: 0,
            is_favorite: false,
            offers: Vec::new(),
        }
    }
}

impl From<&Point> for PointDraft {
    fn from(point: &Point) -> Self {
        Self {
            point_type: point.point_type.clone(),
            destination: point.destination.clone(),
            date_from: point.date_from,
            date_to: point.date_to,
            base_price: point.base_price,
            is_favorite: point.is_favorite,
            offers: point.offers.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: i64,
}

/// All offers available for one point type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub point_type: String,
    #[serde(default)]
    pub offers: Vec<Offer>,
}
