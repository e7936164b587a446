use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(PointId);
id_newtype!(DestinationId);
id_newtype!(OfferId);

/// Classification of points relative to the current instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Everything,
        FilterKind::Future,
        FilterKind::Present,
        FilterKind::Past,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Everything => "everything",
            FilterKind::Future => "future",
            FilterKind::Present => "present",
            FilterKind::Past => "past",
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown filter `{value}`"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    #[default]
    Day,
    Time,
    Price,
}

impl SortKind {
    pub const ALL: [SortKind; 3] = [SortKind::Day, SortKind::Time, SortKind::Price];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKind::Day => "day",
            SortKind::Time => "time",
            SortKind::Price => "price",
        }
    }
}

impl FromStr for SortKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown sort `{value}`"))
    }
}

/// How much of the UI a model change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Init,
    Patch,
    Minor,
    Major,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    UpdatePoint,
    AddPoint,
    DeletePoint,
}
