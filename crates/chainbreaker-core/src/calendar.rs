//! Local-calendar day keys and week arithmetic.
//!
//! Every aggregate in this crate is keyed by the local calendar day. The
//! [`DayKey`] value type pins the canonical `YYYY-MM-DD` form in one place
//! so that the ledger, the stats pass and the persisted document cannot
//! drift apart on formatting. Weeks are Sunday-start, seven days long.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One local calendar day, totally ordered, displayed as `YYYY-MM-DD`.
///
/// Two instants map to the same `DayKey` iff they fall on the same local
/// calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The current local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The local calendar day an instant falls on.
    pub fn from_timestamp(instant: DateTime<Utc>) -> Self {
        Self(instant.with_timezone(&Local).date_naive())
    }

    /// Build a key from calendar components. `None` for invalid dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Calendar arithmetic with month/year rollover.
    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn pred(self) -> Self {
        self.add_days(-1)
    }

    pub fn succ(self) -> Self {
        self.add_days(1)
    }

    /// The Sunday on or before this day.
    pub fn week_start(self) -> Self {
        let back = self.0.weekday().num_days_from_sunday() as i64;
        self.add_days(-back)
    }

    /// The first day of this day's month.
    pub fn month_start(self) -> Self {
        // Day 1 always exists for a valid year/month.
        Self(NaiveDate::from_ymd_opt(self.0.year(), self.0.month(), 1).unwrap())
    }

    /// Whether both keys fall in the same calendar month.
    pub fn same_month(self, other: Self) -> bool {
        self.0.year() == other.0.year() && self.0.month() == other.0.month()
    }

    /// Local midnight of this day as a UTC instant.
    ///
    /// Used when backfilling a habit's creation timestamp from a ledger
    /// day-key, so its activation day round-trips to the same key. Falls
    /// back to the earliest valid local time on DST-gap days.
    pub fn local_midnight_utc(self) -> DateTime<Utc> {
        let midnight = self.0.and_hms_opt(0, 0, 0).unwrap();
        match Local.from_local_datetime(&midnight).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&midnight),
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DayKeyVisitor;

        impl Visitor<'_> for DayKeyVisitor {
            type Value = DayKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a YYYY-MM-DD day key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DayKey, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DayKeyVisitor)
    }
}
