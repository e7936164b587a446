//! View payloads: what each rendered element shows.

use std::fmt;

use shared::{
    domain::{DestinationId, FilterKind, OfferId, PointId, SortKind},
    protocol::{Destination, Offer, OfferGroup, Point, PointDraft},
};
use trip_core::{
    format::{format_day_label, format_duration, format_form_datetime, format_iso, format_time},
    TripSummary,
};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const FAILURE_MESSAGE: &str = "Failed to load latest route information";

pub fn empty_list_message(filter: FilterKind) -> &'static str {
    match filter {
        FilterKind::Everything => "Click New Event to create your first point",
        FilterKind::Future => "There are no future events now",
        FilterKind::Present => "There are no present events now",
        FilterKind::Past => "There are no past events now",
    }
}

/// Reference data shared by every presenter once the model has loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub destinations: Vec<Destination>,
    pub offers: Vec<OfferGroup>,
}

impl Catalog {
    pub fn destination(&self, id: &DestinationId) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| &destination.id == id)
    }

    pub fn offers_for(&self, point_type: &str) -> &[Offer] {
        self.offers
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointCard {
    pub point_id: PointId,
    pub day: String,
    /// Machine-readable forms of `day`, `start_time` and `end_time`.
    pub day_datetime: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub point_type: String,
    pub destination: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub price: i64,
    pub offers: Vec<(String, i64)>,
    pub is_favorite: bool,
}

impl PointCard {
    pub fn build(point: &Point, catalog: &Catalog) -> Self {
        let offers = catalog
            .offers_for(&point.point_type)
            .iter()
            .filter(|offer| point.offers.contains(&offer.id))
            .map(|offer| (offer.title.clone(), offer.price))
            .collect();

        Self {
            point_id: point.id.clone(),
            day: point.date_from.map(format_day_label).unwrap_or_default(),
            day_datetime: point
                .date_from
                .map(|date| format_iso(date, false))
                .unwrap_or_default(),
            start_datetime: point
                .date_from
                .map(|date| format_iso(date, true))
                .unwrap_or_default(),
            end_datetime: point
                .date_to
                .map(|date| format_iso(date, true))
                .unwrap_or_default(),
            point_type: point.point_type.clone(),
            destination: destination_name(catalog, &point.destination),
            start_time: point.date_from.map(format_time).unwrap_or_default(),
            end_time: point.date_to.map(format_time).unwrap_or_default(),
            duration: point.duration().map(format_duration).unwrap_or_default(),
            price: point.base_price,
            offers,
            is_favorite: point.is_favorite,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Saving,
    Deleting,
    /// A request failed; controls are usable again.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Edit,
    Create,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferChoice {
    pub id: OfferId,
    pub title: String,
    pub price: i64,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointForm {
    pub kind: FormKind,
    pub point_id: Option<PointId>,
    pub point_type: String,
    pub destination: String,
    pub description: String,
    pub date_from: String,
    pub date_to: String,
    pub price: i64,
    pub offers: Vec<OfferChoice>,
    pub state: FormState,
}

impl PointForm {
    pub fn edit(point: &Point, catalog: &Catalog, state: FormState) -> Self {
        let mut form = Self::create(&PointDraft::from(point), catalog, state);
        form.kind = FormKind::Edit;
        form.point_id = Some(point.id.clone());
        form
    }

    pub fn create(draft: &PointDraft, catalog: &Catalog, state: FormState) -> Self {
        let destination = catalog.destination(&draft.destination);
        Self {
            kind: FormKind::Create,
            point_id: None,
            point_type: draft.point_type.clone(),
            destination: destination
                .map(|destination| destination.name.clone())
                .unwrap_or_default(),
            description: destination
                .map(|destination| destination.description.clone())
                .unwrap_or_default(),
            date_from: draft.date_from.map(format_form_datetime).unwrap_or_default(),
            date_to: draft.date_to.map(format_form_datetime).unwrap_or_default(),
            price: draft.base_price,
            offers: catalog
                .offers_for(&draft.point_type)
                .iter()
                .map(|offer| OfferChoice {
                    id: offer.id.clone(),
                    title: offer.title.clone(),
                    price: offer.price,
                    checked: draft.offers.contains(&offer.id),
                })
                .collect(),
            state,
        }
    }

    pub fn controls_disabled(&self) -> bool {
        matches!(self.state, FormState::Saving | FormState::Deleting)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    EventList,
    Point(PointCard),
    Form(PointForm),
    Sort { active: SortKind },
    Filters {
        active: FilterKind,
        counts: Vec<(FilterKind, usize)>,
    },
    TripInfo(TripSummary),
    NewPointButton { disabled: bool },
    Message(String),
}

impl Component {
    pub fn point_id(&self) -> Option<&PointId> {
        match self {
            Component::Point(card) => Some(&card.point_id),
            Component::Form(form) => form.point_id.as_ref(),
            _ => None,
        }
    }
}

fn destination_name(catalog: &Catalog, id: &DestinationId) -> String {
    catalog
        .destination(id)
        .map(|destination| destination.name.clone())
        .unwrap_or_default()
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::EventList => f.write_str("<event list>"),
            Component::Point(card) => {
                write!(
                    f,
                    "{} {} {} {}-{} ({}) €{}",
                    card.day,
                    card.point_type,
                    card.destination,
                    card.start_time,
                    card.end_time,
                    card.duration,
                    card.price
                )?;
                for (title, price) in &card.offers {
                    write!(f, " +{title} €{price}")?;
                }
                if card.is_favorite {
                    f.write_str(" ★")?;
                }
                Ok(())
            }
            Component::Form(form) => {
                let label = match form.kind {
                    FormKind::Edit => "edit",
                    FormKind::Create => "new",
                };
                write!(
                    f,
                    "[{label} {} {} {} — {} €{}",
                    form.point_type, form.destination, form.date_from, form.date_to, form.price
                )?;
                match form.state {
                    FormState::Idle => {}
                    FormState::Saving => f.write_str(" saving...")?,
                    FormState::Deleting => f.write_str(" deleting...")?,
                    FormState::Aborted => f.write_str(" failed, retry")?,
                }
                f.write_str("]")
            }
            Component::Sort { active } => write!(f, "sort: {}", active.as_str()),
            Component::Filters { active, counts } => {
                f.write_str("filters:")?;
                for (filter, count) in counts {
                    let marker = if filter == active { "*" } else { "" };
                    write!(f, " {marker}{}({count})", filter.as_str())?;
                }
                Ok(())
            }
            Component::TripInfo(summary) => write!(
                f,
                "{} | {} | total €{}",
                summary.title, summary.dates, summary.total_cost
            ),
            Component::NewPointButton { disabled } => {
                if *disabled {
                    f.write_str("(New event)")
                } else {
                    f.write_str("[New event]")
                }
            }
            Component::Message(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
#[path = "tests/components_tests.rs"]
mod tests;
