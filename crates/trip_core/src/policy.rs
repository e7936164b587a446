//! Pure filtering and ordering rules over point lists.
//!
//! Nothing here mutates its input: every function returns a fresh `Vec`.
//! The evaluation instant is always passed in by the caller.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use shared::{
    domain::{FilterKind, SortKind},
    protocol::Point,
};

/// Ascending by `date_from`; points without a start date go last.
pub fn compare_start(a: &Point, b: &Point) -> Ordering {
    match (a.date_from, b.date_from) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn matches_filter(filter: FilterKind, point: &Point, now: DateTime<Utc>) -> bool {
    match filter {
        FilterKind::Everything => true,
        FilterKind::Future => point.date_from.is_some_and(|from| from > now),
        FilterKind::Present => match (point.date_from, point.date_to) {
            (Some(from), Some(to)) => from <= now && now < to,
            _ => false,
        },
        FilterKind::Past => point.date_to.is_some_and(|to| to <= now),
    }
}

pub fn filter_points(filter: FilterKind, points: &[Point], now: DateTime<Utc>) -> Vec<Point> {
    points
        .iter()
        .filter(|point| matches_filter(filter, point, now))
        .cloned()
        .collect()
}

pub fn sort_points(sort: SortKind, points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    match sort {
        SortKind::Day => sorted.sort_by(compare_start),
        SortKind::Time => sorted.sort_by(|a, b| match (a.duration(), b.duration()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKind::Price => sorted.sort_by(|a, b| b.base_price.cmp(&a.base_price)),
    }
    sorted
}

/// Whether a point carries enough data to be shown in the list.
pub fn is_displayable(point: &Point) -> bool {
    !point.id.is_empty()
        && point.base_price > 0
        && point.date_from.is_some()
        && point.date_to.is_some()
        && !point.point_type.trim().is_empty()
}

/// Displayable points that pass `filter`, in input order.
pub fn visible_points(filter: FilterKind, points: &[Point], now: DateTime<Utc>) -> Vec<Point> {
    points
        .iter()
        .filter(|point| is_displayable(point) && matches_filter(filter, point, now))
        .cloned()
        .collect()
}

/// Number of displayable points per filter, in [`FilterKind::ALL`] order.
pub fn filter_counts(points: &[Point], now: DateTime<Utc>) -> Vec<(FilterKind, usize)> {
    FilterKind::ALL
        .into_iter()
        .map(|filter| {
            let count = points
                .iter()
                .filter(|point| is_displayable(point) && matches_filter(filter, point, now))
                .count();
            (filter, count)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/policy_tests.rs"]
mod tests;
