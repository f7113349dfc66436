mod grouping;
mod reservation;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use derive_more::{Deref, Display, Error, From};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

pub use self::grouping::*;
pub use self::reservation::*;

/// 時刻（`HH:MM`）
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Deref, SerializeDisplay,
    DeserializeFromStr,
)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn from_hm(hour: u32, min: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, min, 0).map(Self)
    }
}

impl FromStr for SlotTime {
    type Err = SlotTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(Self)
            .map_err(|_| SlotTimeError::Malformed {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.second() {
            0 => write!(f, "{}", self.0.format("%H:%M")),
            _ => write!(f, "{}", self.0.format("%H:%M:%S")),
        }
    }
}

#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum SlotTimeError {
    #[display(fmt = "Malformed time of day: {:?}", value)]
    Malformed { value: String },
}

/// 料金
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Hash,
    Serialize,
    Deserialize,
    From,
    Deref,
)]
pub struct Price(u64);

impl Price {
    pub fn saturating_add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_formatted_string(&Locale::en))
    }
}
