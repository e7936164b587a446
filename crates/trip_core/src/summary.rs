//! Trip header: route title, overall dates and total cost.

use chrono::Datelike;
use shared::protocol::{Destination, OfferGroup, Point};

use crate::policy::compare_start;

const MAX_TITLE_CITIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    pub title: String,
    pub dates: String,
    pub total_cost: i64,
}

/// Builds the header for `points`, or `None` when there is nothing to summarize.
pub fn trip_summary(
    points: &[Point],
    destinations: &[Destination],
    offers: &[OfferGroup],
) -> Option<TripSummary> {
    if points.is_empty() {
        return None;
    }
    let mut ordered = points.to_vec();
    ordered.sort_by(compare_start);

    Some(TripSummary {
        title: route_title(&ordered, destinations),
        dates: route_dates(&ordered),
        total_cost: ordered.iter().map(|point| point_cost(point, offers)).sum(),
    })
}

/// Base price plus every selected offer available for the point's type.
pub fn point_cost(point: &Point, offers: &[OfferGroup]) -> i64 {
    let extras: i64 = offers
        .iter()
        .filter(|group| group.point_type == point.point_type)
        .flat_map(|group| group.offers.iter())
        .filter(|offer| point.offers.contains(&offer.id))
        .map(|offer| offer.price)
        .sum();
    point.base_price + extras
}

fn route_title(ordered: &[Point], destinations: &[Destination]) -> String {
    let names: Vec<&str> = ordered
        .iter()
        .map(|point| {
            destinations
                .iter()
                .find(|destination| destination.id == point.destination)
                .map(|destination| destination.name.as_str())
                .unwrap_or("")
        })
        .collect();

    if names.len() > MAX_TITLE_CITIES {
        format!("{} — … — {}", names[0], names[names.len() - 1])
    } else {
        names.join(" — ")
    }
}

fn route_dates(ordered: &[Point]) -> String {
    let start = ordered.iter().find_map(|point| point.date_from);
    let end = ordered.iter().filter_map(|point| point.date_to).max();
    match (start, end) {
        (Some(start), Some(end)) => {
            let start_month = start.format("%b").to_string().to_uppercase();
            let end_month = end.format("%b").to_string().to_uppercase();
            if start.year() == end.year() && start.month() == end.month() {
                format!("{} — {} {}", start.day(), end.day(), end_month)
            } else {
                format!("{} {} — {} {}", start.day(), start_month, end.day(), end_month)
            }
        }
        (Some(start), None) => format!(
            "{} {}",
            start.day(),
            start.format("%b").to_string().to_uppercase()
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/summary_tests.rs"]
mod tests;
