use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Meteorological season used to bucket flowering records.
///
/// Seasons order in calendar order within a year: Spring, Summer, Fall, Winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    /// Month and day the season starts on, as used in prediction request dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomscope_types::season::Season;
    ///
    /// assert_eq!(Season::Fall.start_month_day(), "09-01");
    /// ```
    pub fn start_month_day(&self) -> &'static str {
        match self {
            Season::Spring => "03-01",
            Season::Summer => "06-01",
            Season::Fall => "09-01",
            Season::Winter => "12-01",
        }
    }

    /// ISO date (`YYYY-MM-DD`) on which this season starts in `year`.
    pub fn start_date(&self, year: i32) -> String {
        format!("{:04}-{}", year, self.start_month_day())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeasonError(pub String);

impl fmt::Display for ParseSeasonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown season: {:?}", self.0)
    }
}

impl std::error::Error for ParseSeasonError {}

impl FromStr for Season {
    type Err = ParseSeasonError;

    /// Case-insensitive; `autumn` is accepted as [`Season::Fall`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(ParseSeasonError(s.to_string())),
        }
    }
}
