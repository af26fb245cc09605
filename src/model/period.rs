//! The `Period` type: a (month, year) pair identifying one ledger cycle.

use anyhow::bail;
use chrono::{Datelike, Local, Month};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month of a specific year. Its `period_ref`, e.g. `July-2025`, is the key that ledger
/// entries and period markers are stored under.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Period {
    #[serde(with = "month_name")]
    month: Month,
    year: i32,
}

impl Period {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// The period containing today's date on the local clock.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        // `month0` is always in 0..12
        let month = month_from_index(today.month0()).unwrap_or(Month::January);
        Self::new(month, today.year())
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The canonical month name, e.g. `July`.
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    /// Zero-based month index, January is 0.
    pub fn month_index(&self) -> i32 {
        self.month.number_from_month() as i32 - 1
    }

    /// The storage key, e.g. `July-2025`.
    pub fn period_ref(&self) -> String {
        format!("{}-{}", self.month_name(), self.year)
    }

    /// The number of months from `start` to `self`. Negative when `start` is later than `self`.
    pub fn months_since(&self, start: &Period) -> i64 {
        i64::from(self.year - start.year) * 12 + i64::from(self.month_index() - start.month_index())
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.month_name(), self.year)
    }
}

fn month_from_index(index0: u32) -> Option<Month> {
    u8::try_from(index0 + 1)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
}

/// Parses a month given as a full name (`July`), a three-letter abbreviation (`jul`) or a number
/// (`7`). Names are case-insensitive.
pub fn parse_month(s: &str) -> anyhow::Result<Month> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return match Month::try_from(n) {
            Ok(month) => Ok(month),
            Err(_) => bail!("Month number must be between 1 and 12, got {n}"),
        };
    }
    match Month::from_str(s) {
        Ok(month) => Ok(month),
        Err(_) => bail!("'{s}' is not a month name"),
    }
}

/// Returns the month if `name` is exactly one of the twelve canonical month names. Stored rows
/// must use the canonical form; anything else is treated as malformed.
pub(crate) fn canonical_month(name: &str) -> Option<Month> {
    Month::from_str(name).ok().filter(|m| m.name() == name)
}

mod month_name {
    use super::canonical_month;
    use chrono::Month;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(month: &Month, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(month.name())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Month, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        canonical_month(&s).ok_or_else(|| serde::de::Error::custom(format!("bad month '{s}'")))
    }
}
